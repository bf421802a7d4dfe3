//! Service configuration loader for hashstat.
//!
//! Reads `config.toml` from the data directory (`~/.hashstat/` by default)
//! and deserializes it into [`ServiceConfig`]. The implicit file falls back to
//! defaults when missing or malformed; a file named explicitly on the command
//! line must parse.

use std::path::{Path, PathBuf};

use hashstat_types::config::ServiceConfig;
use hashstat_types::error::ConfigError;

use crate::sqlite::pool::database_url_for;

/// Resolve the data directory from `HASHSTAT_DATA_DIR`, falling back to
/// `~/.hashstat`.
pub fn resolve_data_dir() -> PathBuf {
    match std::env::var("HASHSTAT_DATA_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".hashstat")
        }
    }
}

/// Load `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ServiceConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and returns the default.
pub async fn load_service_config(data_dir: &Path) -> ServiceConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ServiceConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ServiceConfig::default();
        }
    };

    match toml::from_str::<ServiceConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ServiceConfig::default()
        }
    }
}

/// Load an explicitly named config file. Any failure is an error.
pub async fn load_config_file(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// The database URL to use: the configured one, or the data-dir default.
pub fn resolve_database_url(config: &ServiceConfig, data_dir: &Path) -> String {
    config
        .database_url
        .clone()
        .unwrap_or_else(|| database_url_for(data_dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_service_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_service_config(tmp.path()).await;
        assert_eq!(config, ServiceConfig::default());
    }

    #[tokio::test]
    async fn load_service_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
port = 9000
finalize_delay_ms = 250
database_url = "sqlite:///var/lib/hashstat/db.sqlite"
"#,
        )
        .await
        .unwrap();

        let config = load_service_config(tmp.path()).await;
        assert_eq!(config.port, 9000);
        assert_eq!(config.finalize_delay_ms, 250);
        assert_eq!(
            config.database_url.as_deref(),
            Some("sqlite:///var/lib/hashstat/db.sqlite")
        );
        assert_eq!(config.table_name, "hashes");
    }

    #[tokio::test]
    async fn load_service_config_malformed_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "port = \"not a number\"")
            .await
            .unwrap();

        let config = load_service_config(tmp.path()).await;
        assert_eq!(config, ServiceConfig::default());
    }

    #[tokio::test]
    async fn load_config_file_reports_parse_errors() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        tokio::fs::write(&path, "port = [1, 2]").await.unwrap();

        let err = load_config_file(&path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[tokio::test]
    async fn load_config_file_reports_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = load_config_file(&tmp.path().join("absent.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn resolve_database_url_prefers_configured_value() {
        let config = ServiceConfig {
            database_url: Some("sqlite://elsewhere.db".to_string()),
            ..ServiceConfig::default()
        };
        assert_eq!(
            resolve_database_url(&config, Path::new("/data")),
            "sqlite://elsewhere.db"
        );
    }

    #[test]
    fn resolve_database_url_defaults_to_data_dir() {
        let url = resolve_database_url(&ServiceConfig::default(), Path::new("/data"));
        assert!(url.contains("/data"));
        assert!(url.contains("hashstat.db"));
    }
}
