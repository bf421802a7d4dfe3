//! Entry and aggregate statistics types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a stored entry.
///
/// Assigned by the store at reservation time. Values increase in reservation
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub i64);

impl EntryId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for EntryId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Lifecycle state of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryState {
    /// Identifier reserved, digest not yet computed.
    Pending,
    /// Digest and compute duration recorded.
    Finalized,
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryState::Pending => write!(f, "pending"),
            EntryState::Finalized => write!(f, "finalized"),
        }
    }
}

/// One reservation plus (eventually) its computed digest.
///
/// `digest` and `duration_micros` are either both `None` (pending) or both
/// `Some` (finalized). The store writes them together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    /// Base64-encoded SHA-512 digest of the submitted value.
    pub digest: Option<String>,
    /// Time spent computing the digest, in microseconds.
    pub duration_micros: Option<i64>,
}

impl Entry {
    /// A freshly reserved entry with nothing recorded yet.
    pub fn pending(id: EntryId) -> Self {
        Self {
            id,
            digest: None,
            duration_micros: None,
        }
    }

    pub fn state(&self) -> EntryState {
        match (&self.digest, self.duration_micros) {
            (Some(_), Some(_)) => EntryState::Finalized,
            _ => EntryState::Pending,
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.state() == EntryState::Finalized
    }
}

/// Count and mean compute time across all stored entries.
///
/// Derived on demand, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Total number of entries, pending or finalized.
    pub count: i64,
    /// Mean `duration_micros` over finalized entries. `0.0` when none are
    /// finalized.
    pub average_duration: f64,
}

impl AggregateStats {
    /// Stats for a store with no finalized entries.
    pub fn empty(count: i64) -> Self {
        Self {
            count,
            average_duration: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_entry_state() {
        let entry = Entry::pending(EntryId(7));
        assert_eq!(entry.state(), EntryState::Pending);
        assert!(!entry.is_finalized());
    }

    #[test]
    fn test_finalized_entry_state() {
        let entry = Entry {
            id: EntryId(1),
            digest: Some("abc=".to_string()),
            duration_micros: Some(12),
        };
        assert_eq!(entry.state(), EntryState::Finalized);
    }

    #[test]
    fn test_entry_id_parse() {
        assert_eq!("42".parse::<EntryId>().unwrap(), EntryId(42));
        assert_eq!(" 3 ".parse::<EntryId>().unwrap(), EntryId(3));
        assert!("abc".parse::<EntryId>().is_err());
    }

    #[test]
    fn test_entry_id_serializes_as_plain_integer() {
        let json = serde_json::to_string(&EntryId(5)).unwrap();
        assert_eq!(json, "5");
    }

    #[test]
    fn test_aggregate_stats_field_names() {
        let stats = AggregateStats {
            count: 6,
            average_duration: 12.5,
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["count"], 6);
        assert_eq!(json["average_duration"], 12.5);
    }

    #[test]
    fn test_empty_stats_average_is_zero() {
        let stats = AggregateStats::empty(0);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.average_duration, 0.0);
    }
}
