//! Request handlers, one module per resource.

pub mod hash;
pub mod shutdown;
pub mod stats;
