//! Infrastructure layer for hashstat.
//!
//! Contains implementations of the ports defined in `hashstat-core`:
//! SQLite entry storage, SHA-512 content hashing, and the config file loader.

pub mod config;
pub mod crypto;
pub mod sqlite;
