//! Orchestration service and repository trait definitions for hashstat.
//!
//! This crate defines the "ports" (store and hasher traits) that the
//! infrastructure layer implements. It depends only on `hashstat-types` --
//! never on `hashstat-infra` or any database/crypto crate.

pub mod repository;
pub mod service;
