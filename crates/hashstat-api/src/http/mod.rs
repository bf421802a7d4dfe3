//! HTTP layer for hashstat.
//!
//! Axum routes for submitting values, reading digests and stats, and
//! requesting a graceful shutdown.

pub mod error;
pub mod handlers;
pub mod router;
