use axum::Json;
use bytes::Bytes;

use revgate_core::review::{FeedbackAck, FeedbackSubmission};

use super::ApiError;

/// Validate and acknowledge. Feedback is not persisted.
pub async fn feedback(body: Bytes) -> Result<Json<FeedbackAck>, ApiError> {
    let submission = FeedbackSubmission::from_slice(&body)?;
    tracing::debug!(review_id = ?submission.review_id, "feedback received");
    Ok(Json(FeedbackAck::default()))
}
