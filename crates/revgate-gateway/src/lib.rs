//! revgate gateway library entry.
//!
//! Wires configuration, the experiment policy, the model service client, and
//! the metrics registry into an axum router. Consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod policy;
pub mod router;
pub mod upstream;
