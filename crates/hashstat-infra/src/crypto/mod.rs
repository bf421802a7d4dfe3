//! Cryptographic operations for hashstat.
//!
//! - `hash`: SHA-512 digests encoded as standard base64

pub mod hash;
