//! SHA-512 content hashing.
//!
//! Implements the `ContentHasher` trait from `hashstat-core` using the
//! `sha2` crate (RustCrypto ecosystem) and standard padded base64.

use std::time::Instant;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha512};

use hashstat_core::service::hash::{ContentHasher, DigestOutcome};

/// SHA-512 implementation of `ContentHasher`.
///
/// The reported elapsed time covers hashing and base64 encoding only.
pub struct Sha512ContentHasher;

impl Sha512ContentHasher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Sha512ContentHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentHasher for Sha512ContentHasher {
    fn compute(&self, input: &str) -> DigestOutcome {
        let start = Instant::now();
        let digest = STANDARD.encode(Sha512::digest(input.as_bytes()));
        DigestOutcome {
            digest,
            elapsed: start.elapsed(),
        }
    }
}
