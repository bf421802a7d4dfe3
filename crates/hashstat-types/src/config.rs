//! Service configuration types for hashstat.
//!
//! `ServiceConfig` represents the optional `config.toml` that controls the
//! listen address, the SQLite location and table, and the finalize delay.

use serde::{Deserialize, Serialize};

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Top-level configuration for the hashstat service.
///
/// Loaded from `~/.hashstat/config.toml`. All fields have defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Interface the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// SQLite connection URL. `None` means `{data_dir}/hashstat.db`.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Name of the table holding entries.
    #[serde(default = "default_table_name")]
    pub table_name: String,

    /// Delay between answering `POST /hash` and computing the digest.
    #[serde(default = "default_finalize_delay_ms")]
    pub finalize_delay_ms: u64,

    /// Deadline for in-flight requests once shutdown is requested.
    #[serde(default = "default_shutdown_timeout_ms")]
    pub shutdown_timeout_ms: u64,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Export spans to stdout through OpenTelemetry.
    #[serde(default)]
    pub otel: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_table_name() -> String {
    "hashes".to_string()
}

fn default_finalize_delay_ms() -> u64 {
    5_000
}

fn default_shutdown_timeout_ms() -> u64 {
    500
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: None,
            table_name: default_table_name(),
            finalize_delay_ms: default_finalize_delay_ms(),
            shutdown_timeout_ms: default_shutdown_timeout_ms(),
            log_format: LogFormat::default(),
            otel: false,
        }
    }
}
