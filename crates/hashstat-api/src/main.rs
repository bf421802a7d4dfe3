//! hashstat CLI and HTTP service entry point.
//!
//! Binary name: `hashstat`
//!
//! Parses CLI arguments, loads configuration, initializes the entry store and
//! service, then dispatches to the command handler or starts the HTTP server.
//! `hashstat hash` only needs the hasher and never opens the store.

mod cli;
mod http;
mod scheduler;
mod state;

use std::future::IntoFuture;
use std::time::Duration;

use clap::Parser;
use hashstat_infra::config::{load_config_file, load_service_config, resolve_data_dir, resolve_database_url};
use hashstat_infra::crypto::hash::Sha512ContentHasher;
use hashstat_observe::tracing_setup::{TracingOptions, filter_for_verbosity, init_tracing, shutdown_tracing};
use hashstat_types::config::{LogFormat, ServiceConfig};
use tokio_util::sync::CancellationToken;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = resolve_data_dir();
    let mut config = match &cli.config {
        Some(path) => load_config_file(path).await?,
        None => load_service_config(&data_dir).await,
    };
    cli.apply_overrides(&mut config);

    let options = TracingOptions::new(filter_for_verbosity(cli.verbose, cli.quiet))
        .json(config.log_format == LogFormat::Json)
        .otel(config.otel);
    init_tracing(&options).map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = match cli.command {
        Commands::Hash { value } => cli::entry::hash_value(&Sha512ContentHasher::new(), &value, cli.json),
        command => {
            if config.database_url.is_none() {
                tokio::fs::create_dir_all(&data_dir).await?;
            }
            let database_url = resolve_database_url(&config, &data_dir);
            run(command, cli.json, config, &database_url).await
        }
    };
    shutdown_tracing();
    result
}

/// Run a command that needs the entry store.
async fn run(command: Commands, json: bool, config: ServiceConfig, database_url: &str) -> anyhow::Result<()> {
    let state = AppState::init(config, database_url).await?;

    let result = match command {
        Commands::Serve { .. } => serve(state.clone()).await,
        Commands::Get { id } => cli::entry::get_entry(&state, id, json).await,
        Commands::Stats => cli::entry::show_stats(&state, json).await,
        Commands::Hash { value } => cli::entry::hash_value(&Sha512ContentHasher::new(), &value, json),
        Commands::Clear { force } => cli::entry::clear(&state, force, json).await,
    };

    state.close().await;
    result
}

/// Serve HTTP until `/shutdown`, Ctrl+C or SIGTERM.
///
/// Once shutdown starts, in-flight requests get `shutdown_timeout_ms` to
/// finish before the server is dropped.
async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", state.config.host, state.config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let shutdown = state.shutdown.clone();
    let deadline = Duration::from_millis(state.config.shutdown_timeout_ms);

    tracing::info!(
        addr = %addr,
        finalize_delay_ms = state.config.finalize_delay_ms,
        "hashstat listening"
    );

    let router = http::router::build_router(state);
    let server = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .into_future();

    let forced = async {
        shutdown.cancelled().await;
        tokio::time::sleep(deadline).await;
    };

    tokio::select! {
        result = server => result?,
        _ = forced => {
            tracing::warn!(
                timeout_ms = deadline.as_millis() as u64,
                "in-flight requests did not finish before the shutdown deadline"
            );
        }
    }

    tracing::info!("server stopped");
    Ok(())
}

/// Wait for `/shutdown`, Ctrl+C or SIGTERM.
///
/// A signal also cancels `token` so the shutdown deadline starts counting.
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C"),
        _ = terminate => tracing::info!("received SIGTERM"),
        _ = token.cancelled() => {},
    }

    token.cancel();
}
