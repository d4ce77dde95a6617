//! Downstream model service access.
//!
//! `ModelService` is the seam the API handlers depend on; `ModelServiceClient`
//! is the reqwest-backed implementation used in production.

pub mod client;

pub use client::{
    AnalysisError, ModelService, ModelServiceClient, TimedAnalysis, VERSION_UNAVAILABLE,
};
