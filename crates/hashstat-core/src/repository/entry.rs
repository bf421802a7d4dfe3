//! Entry repository trait definition.

use hashstat_types::entry::{AggregateStats, Entry, EntryId};
use hashstat_types::error::RepositoryError;

/// Repository trait for entry persistence and the aggregate query.
///
/// Implementations live in hashstat-infra (e.g., SqliteEntryRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait EntryRepository: Send + Sync {
    /// Ensure the backing table exists. Idempotent; never touches existing rows.
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Insert a pending entry and return its identifier.
    ///
    /// Identifier uniqueness comes from the backend's own key assignment, so
    /// concurrent reservations never collide.
    fn reserve(&self) -> impl std::future::Future<Output = Result<EntryId, RepositoryError>> + Send;

    /// Record the digest and compute duration of a pending entry.
    ///
    /// Returns `NotFound` for an unknown id and `AlreadyFinalized` if the
    /// entry already carries a digest.
    fn finalize(
        &self,
        id: EntryId,
        digest: &str,
        duration_micros: i64,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Fetch an entry in whatever state it currently is.
    fn get(
        &self,
        id: EntryId,
    ) -> impl std::future::Future<Output = Result<Entry, RepositoryError>> + Send;

    /// Count all entries and average the durations of finalized ones.
    fn aggregate(
        &self,
    ) -> impl std::future::Future<Output = Result<AggregateStats, RepositoryError>> + Send;

    /// Remove every entry. Safe on an empty or missing table.
    ///
    /// Id assignment may start over afterwards, so ids handed out before a
    /// reset can be reused.
    fn clear(&self) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Release backend resources. Later calls on this repository may fail.
    fn close(&self) -> impl std::future::Future<Output = ()> + Send;
}
