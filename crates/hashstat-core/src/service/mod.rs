//! Business logic services (use cases).
//!
//! Services orchestrate repository calls and digest computation. They depend
//! on traits (ports) -- never on concrete infrastructure implementations.

pub mod hash;
pub mod hash_stats;
