//! JSON API consumed by the review frontend.
//!
//! - `GET  /api/version`  : app + model versions (never fails)
//! - `POST /api/analyze`  : short-review gate, forward, augment
//! - `POST /api/feedback` : validated acknowledgement, nothing stored

pub mod analyze;
pub mod calls;
pub mod error;
pub mod feedback;
pub mod version;

pub use error::ApiError;
