//! Hash-and-stats orchestration service.
//!
//! Splits a digest request into two independent calls: reserving an entry
//! (cheap, answered immediately) and computing + recording the digest (done
//! later by whoever the caller hands the work to). The service itself never
//! spawns tasks or sleeps.

use hashstat_types::entry::{AggregateStats, Entry, EntryId};
use hashstat_types::error::RepositoryError;

use crate::repository::entry::EntryRepository;
use crate::service::hash::{ContentHasher, DigestOutcome};

/// Service orchestrating entry reservation, finalization and statistics.
///
/// Generic over the repository and hasher traits to maintain clean
/// architecture -- hashstat-core never depends on hashstat-infra.
pub struct HashStatsService<R: EntryRepository, H: ContentHasher> {
    repo: R,
    hasher: H,
}

impl<R: EntryRepository, H: ContentHasher> HashStatsService<R, H> {
    pub fn new(repo: R, hasher: H) -> Self {
        Self { repo, hasher }
    }

    /// Reserve a pending entry and return its id.
    pub async fn create_pending_entry(&self) -> Result<EntryId, RepositoryError> {
        let id = self.repo.reserve().await?;
        tracing::debug!(id = %id, "reserved pending entry");
        Ok(id)
    }

    /// Hash `value` and record the digest against a previously reserved id.
    pub async fn finalize_with_value(&self, id: EntryId, value: &str) -> Result<(), RepositoryError> {
        let outcome = self.hasher.compute(value);
        let micros = outcome.elapsed_micros();

        self.repo.finalize(id, &outcome.digest, micros).await?;
        tracing::debug!(id = %id, duration_micros = micros, "finalized entry");
        Ok(())
    }

    pub async fn get_entry(&self, id: EntryId) -> Result<Entry, RepositoryError> {
        self.repo.get(id).await
    }

    pub async fn get_aggregate(&self) -> Result<AggregateStats, RepositoryError> {
        self.repo.aggregate().await
    }

    /// Compute a digest without storing anything.
    pub fn digest_of(&self, value: &str) -> DigestOutcome {
        self.hasher.compute(value)
    }

    /// Drop every stored entry. Meant for tests and manual resets.
    pub async fn reset(&self) -> Result<(), RepositoryError> {
        self.repo.clear().await?;
        tracing::info!("entry store cleared");
        Ok(())
    }

    /// Release the underlying store. The service should not be used afterwards.
    pub async fn shutdown(&self) {
        self.repo.close().await;
        tracing::info!("entry store closed");
    }
}
