//! Shared domain types for hashstat.
//!
//! Entries, aggregate statistics, service configuration and the error types
//! shared by the core and infrastructure crates.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod entry;
pub mod error;
