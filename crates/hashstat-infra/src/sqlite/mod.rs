//! SQLite storage layer.
//!
//! Entry repository backed by SQLite with WAL mode and split read/write
//! connection pools.

pub mod entry;
pub mod pool;
