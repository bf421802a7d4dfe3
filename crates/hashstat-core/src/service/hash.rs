//! ContentHasher trait for computing digests.
//!
//! Defined in hashstat-core so the orchestration service can hash values
//! without coupling to a specific algorithm. The `Sha512ContentHasher`
//! adapter lives in hashstat-infra.

use std::time::Duration;

/// A computed digest and the time it took to produce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestOutcome {
    pub digest: String,
    /// Wall-clock time spent hashing and encoding.
    pub elapsed: Duration,
}

impl DigestOutcome {
    /// Elapsed time in whole microseconds, saturating at `i64::MAX`.
    pub fn elapsed_micros(&self) -> i64 {
        i64::try_from(self.elapsed.as_micros()).unwrap_or(i64::MAX)
    }
}

/// Abstraction over digest computation.
///
/// Implementations must be deterministic and infallible for any input,
/// including the empty string.
pub trait ContentHasher: Send + Sync {
    fn compute(&self, input: &str) -> DigestOutcome;
}
