//! Experiment policy layer.
//!
//! Pure decision logic evaluated per request before anything is forwarded to
//! the model service. Counting rejections is left to the caller.

pub mod engine;

pub use engine::{evaluate, Decision, RejectReason};
