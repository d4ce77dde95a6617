//! revgate core: transport-agnostic review contracts and the shared error surface.
//!
//! This crate defines the payloads exchanged with clients and with the model
//! service, plus the error taxonomy shared by the gateway. It intentionally
//! carries no transport or runtime dependencies so it can be reused by tests
//! and tooling without pulling in axum or reqwest.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `GatewayError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod review;

/// Shared result type.
pub use error::{Result, GatewayError};
