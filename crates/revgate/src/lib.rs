//! Top-level facade crate for revgate.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use revgate_core::*;
}

pub mod gateway {
    pub use revgate_gateway::*;
}
