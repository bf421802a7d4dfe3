//! Delayed finalization of reserved entries.
//!
//! `POST /hash` answers with the new id right away and hands the value to
//! the scheduler, which finalizes the entry after the configured delay on a
//! background task. Each scheduled finalization owns a `CancellationToken`
//! kept in a map by entry id, so it can be cancelled individually or all at
//! once on shutdown. A cancelled entry stays pending.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use hashstat_types::entry::EntryId;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::state::ConcreteHashStatsService;

/// Spawns and tracks delayed `finalize_with_value` calls.
#[derive(Clone)]
pub struct FinalizeScheduler {
    service: Arc<ConcreteHashStatsService>,
    delay: Duration,
    pending: Arc<DashMap<EntryId, CancellationToken>>,
}

impl FinalizeScheduler {
    pub fn new(service: Arc<ConcreteHashStatsService>, delay: Duration) -> Self {
        Self {
            service,
            delay,
            pending: Arc::new(DashMap::new()),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Finalize `id` with `value` once the delay has elapsed.
    ///
    /// The returned handle resolves when the task finishes, whether it
    /// finalized, failed, or was cancelled.
    ///
    /// When the delay elapses the task removes its map entry before it
    /// writes, so a finalization that has started can no longer be cancelled.
    pub fn schedule(&self, id: EntryId, value: String) -> JoinHandle<()> {
        let token = CancellationToken::new();
        self.pending.insert(id, token.clone());

        let service = Arc::clone(&self.service);
        let pending = Arc::clone(&self.pending);
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::info!(id = %id, "finalization cancelled, entry left pending");
                }
                _ = tokio::time::sleep(delay) => {
                    if pending.remove(&id).is_none() {
                        // Lost the race against `cancel`.
                        return;
                    }
                    match service.finalize_with_value(id, &value).await {
                        Ok(()) => tracing::info!(id = %id, "entry finalized"),
                        Err(e) => tracing::error!(id = %id, error = %e, "finalization failed"),
                    }
                }
            }
        })
    }

    /// Cancel the pending finalization of `id`. Returns false if nothing was
    /// scheduled for it, or its finalization has already started.
    pub fn cancel(&self, id: EntryId) -> bool {
        match self.pending.remove(&id) {
            Some((_, token)) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel every pending finalization and return how many there were.
    pub fn cancel_all(&self) -> usize {
        let ids: Vec<EntryId> = self.pending.iter().map(|item| *item.key()).collect();
        ids.into_iter().filter(|id| self.cancel(*id)).count()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashstat_core::service::hash_stats::HashStatsService;
    use hashstat_infra::crypto::hash::Sha512ContentHasher;
    use hashstat_infra::sqlite::entry::SqliteEntryRepository;
    use hashstat_infra::sqlite::pool::{DatabasePool, database_url_for};
    use tempfile::TempDir;

    async fn test_service() -> (TempDir, DatabasePool, Arc<ConcreteHashStatsService>) {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::new(&database_url_for(dir.path())).await.unwrap();
        let repo = SqliteEntryRepository::open(pool.clone(), "hashes").await.unwrap();
        let service = Arc::new(HashStatsService::new(repo, Sha512ContentHasher::new()));
        (dir, pool, service)
    }

    #[tokio::test]
    async fn test_scheduled_finalization_runs_after_delay() {
        let (_dir, _pool, service) = test_service().await;
        let scheduler = FinalizeScheduler::new(Arc::clone(&service), Duration::from_millis(20));

        let id = service.create_pending_entry().await.unwrap();
        let handle = scheduler.schedule(id, "angryMonkey".to_string());
        assert_eq!(scheduler.pending_count(), 1);
        assert!(!service.get_entry(id).await.unwrap().is_finalized());

        handle.await.unwrap();

        let entry = service.get_entry(id).await.unwrap();
        assert_eq!(
            entry.digest.as_deref(),
            Some("ZEHhWB65gUlzdVwtDQArEyx+KVLzp/aTaRaPlBzYRIFj6vjFdqEb0Q5B8zVKCZ0vKbZPZklJz0Fd7su2A+gf7Q==")
        );
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_finalization_leaves_entry_pending() {
        let (_dir, _pool, service) = test_service().await;
        let scheduler = FinalizeScheduler::new(Arc::clone(&service), Duration::from_secs(60));

        let id = service.create_pending_entry().await.unwrap();
        let handle = scheduler.schedule(id, "value".to_string());

        assert!(scheduler.cancel(id));
        handle.await.unwrap();

        assert!(!service.get_entry(id).await.unwrap().is_finalized());
        assert!(!scheduler.cancel(id));
    }

    #[tokio::test]
    async fn test_cancel_all() {
        let (_dir, _pool, service) = test_service().await;
        let scheduler = FinalizeScheduler::new(Arc::clone(&service), Duration::from_secs(60));

        let mut handles = Vec::new();
        for _ in 0..3 {
            let id = service.create_pending_entry().await.unwrap();
            handles.push(scheduler.schedule(id, "value".to_string()));
        }

        assert_eq!(scheduler.cancel_all(), 3);
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(scheduler.pending_count(), 0);

        let stats = service.get_aggregate().await.unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.average_duration, 0.0);
    }

    #[tokio::test]
    async fn test_failed_finalization_is_logged_not_panicked() {
        let (_dir, _pool, service) = test_service().await;
        let scheduler = FinalizeScheduler::new(Arc::clone(&service), Duration::ZERO);

        // Never reserved: finalize reports NotFound inside the task.
        scheduler.schedule(EntryId(999), "value".to_string()).await.unwrap();
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_cancel_after_finalization_started_is_refused() {
        let (_dir, pool, service) = test_service().await;
        let scheduler = FinalizeScheduler::new(Arc::clone(&service), Duration::ZERO);
        let id = service.create_pending_entry().await.unwrap();

        // Hold the only writer connection so the finalize blocks mid-flight.
        let writer = pool.writer.acquire().await.unwrap();
        let handle = scheduler.schedule(id, "angryMonkey".to_string());
        while scheduler.pending_count() > 0 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        assert!(!scheduler.cancel(id));
        assert_eq!(scheduler.cancel_all(), 0);

        drop(writer);
        handle.await.unwrap();
        assert!(service.get_entry(id).await.unwrap().is_finalized());
    }
}
