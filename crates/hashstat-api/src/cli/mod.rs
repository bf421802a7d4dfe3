//! CLI command definitions for the `hashstat` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod entry;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hashstat_types::config::ServiceConfig;

/// Hash values asynchronously and keep timing statistics.
#[derive(Parser)]
#[command(name = "hashstat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of `{data_dir}/config.toml`.
    #[arg(long, global = true, env = "HASHSTAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// SQLite database URL.
    #[arg(long, global = true, env = "HASHSTAT_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Table holding the entries.
    #[arg(long, global = true)]
    pub table: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP service.
    Serve {
        /// Interface to bind.
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on.
        #[arg(short, long)]
        port: Option<u16>,

        /// Delay before a submitted value is hashed, in milliseconds.
        #[arg(long)]
        finalize_delay_ms: Option<u64>,
    },

    /// Show a stored digest.
    Get {
        /// Entry id returned by `POST /hash`.
        id: i64,
    },

    /// Show entry count and average hashing time.
    Stats,

    /// Hash a value locally without storing it.
    Hash {
        value: String,
    },

    /// Delete every stored entry.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// Apply command-line overrides on top of file configuration.
    pub fn apply_overrides(&self, config: &mut ServiceConfig) {
        if let Some(url) = &self.database_url {
            config.database_url = Some(url.clone());
        }
        if let Some(table) = &self.table {
            config.table_name = table.clone();
        }
        if let Commands::Serve {
            host,
            port,
            finalize_delay_ms,
        } = &self.command
        {
            if let Some(host) = host {
                config.host = host.clone();
            }
            if let Some(port) = port {
                config.port = *port;
            }
            if let Some(delay) = finalize_delay_ms {
                config.finalize_delay_ms = *delay;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::parse_from([
            "hashstat",
            "--table",
            "digests",
            "serve",
            "--port",
            "9999",
            "--finalize-delay-ms",
            "10",
        ]);
        let mut config = ServiceConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.table_name, "digests");
        assert_eq!(config.port, 9999);
        assert_eq!(config.finalize_delay_ms, 10);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["hashstat", "stats", "--json", "-vv"]);
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Stats));
    }

    #[test]
    fn test_non_serve_command_keeps_listen_config() {
        let cli = Cli::parse_from(["hashstat", "get", "5"]);
        let mut config = ServiceConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config, ServiceConfig::default());
    }
}
