//! Application state wiring the service together.
//!
//! AppState holds the concrete service instance used by both CLI and HTTP
//! handlers. The service is generic over repository/hasher traits, but
//! AppState pins it to the concrete infra implementations.

use std::sync::Arc;
use std::time::Duration;

use hashstat_core::service::hash_stats::HashStatsService;
use hashstat_infra::crypto::hash::Sha512ContentHasher;
use hashstat_infra::sqlite::entry::SqliteEntryRepository;
use hashstat_infra::sqlite::pool::DatabasePool;
use hashstat_types::config::ServiceConfig;
use tokio_util::sync::CancellationToken;

use crate::scheduler::FinalizeScheduler;

/// Concrete type alias for the service generics pinned to infra implementations.
pub type ConcreteHashStatsService = HashStatsService<SqliteEntryRepository, Sha512ContentHasher>;

/// Shared application state.
///
/// Cloned into every request handler; all fields are cheap handles.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ConcreteHashStatsService>,
    pub scheduler: FinalizeScheduler,
    /// Cancelled when a client hits `/shutdown` or the process gets a signal.
    pub shutdown: CancellationToken,
    pub config: Arc<ServiceConfig>,
}

impl AppState {
    /// Connect to the database at `database_url`, ensure the entry table
    /// exists, and wire the service.
    pub async fn init(config: ServiceConfig, database_url: &str) -> anyhow::Result<Self> {
        let pool = DatabasePool::new(database_url).await?;
        let repo = SqliteEntryRepository::open(pool, config.table_name.clone()).await?;

        tracing::info!(
            table = %repo.table_name(),
            "entry store ready"
        );

        let service = HashStatsService::new(repo, Sha512ContentHasher::new());
        Ok(Self::from_service(Arc::new(service), config))
    }

    pub fn from_service(service: Arc<ConcreteHashStatsService>, config: ServiceConfig) -> Self {
        let scheduler = FinalizeScheduler::new(
            Arc::clone(&service),
            Duration::from_millis(config.finalize_delay_ms),
        );

        Self {
            service,
            scheduler,
            shutdown: CancellationToken::new(),
            config: Arc::new(config),
        }
    }

    /// Cancel outstanding finalizations and close the store.
    pub async fn close(&self) {
        let cancelled = self.scheduler.cancel_all();
        if cancelled > 0 {
            tracing::warn!(cancelled, "dropping pending finalizations on shutdown");
        }
        self.service.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashstat_core::repository::entry::EntryRepository;
    use hashstat_infra::sqlite::pool::database_url_for;
    use hashstat_types::error::RepositoryError;

    #[tokio::test]
    async fn test_close_cancels_finalizations_and_closes_store() {
        let dir = tempfile::tempdir().unwrap();
        let url = database_url_for(dir.path());
        let config = ServiceConfig {
            finalize_delay_ms: 60_000,
            ..ServiceConfig::default()
        };
        let state = AppState::init(config, &url).await.unwrap();

        let id = state.service.create_pending_entry().await.unwrap();
        let handle = state.scheduler.schedule(id, "angryMonkey".to_string());
        assert_eq!(state.scheduler.pending_count(), 1);

        state.close().await;
        handle.await.unwrap();

        assert_eq!(state.scheduler.pending_count(), 0);
        assert!(matches!(
            state.service.get_entry(id).await,
            Err(RepositoryError::Storage(_))
        ));

        // Reopened, the entry is still pending.
        let pool = DatabasePool::new(&url).await.unwrap();
        let repo = SqliteEntryRepository::open(pool, "hashes").await.unwrap();
        assert!(!repo.get(id).await.unwrap().is_finalized());
        repo.close().await;
    }
}
