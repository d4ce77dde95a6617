//! `POST /api/analyze`.
//!
//! Metric side effects happen in a fixed order:
//! 1. review length/count for the experiment version (every valid body)
//! 2. short-review warning (rejections only, no downstream call)
//! 3. response time (every downstream attempt, failures included)
//! 4. prediction count and positive running gauge (successes only)

use axum::{extract::State, Json};
use bytes::Bytes;

use revgate_core::error::GatewayError;
use revgate_core::review::{AugmentedAnalysis, ReviewSubmission, Sentiment};

use super::ApiError;
use crate::app_state::AppState;
use crate::policy;

pub async fn analyze(State(state): State<AppState>, body: Bytes) -> Result<Json<AugmentedAnalysis>, ApiError> {
    let submission = ReviewSubmission::from_slice(&body)?;
    let text = submission.text()?;

    let exp = state.experiment();
    let metrics = state.metrics();
    let decision = policy::evaluate(text, exp);

    let version = [("version", exp.experiment_version.as_str())];
    metrics.review_length.add(&version, decision.word_count as u64);
    metrics.review_count.inc(&version);

    if let Some(rejection) = decision.rejection() {
        metrics.short_review_warnings.inc(&[]);
        tracing::debug!(word_count = decision.word_count, min_words = exp.min_words, "short review rejected");
        return Err(rejection.into());
    }

    let timed = state.model_service().analyze(text).await;
    metrics.model_response_time.observe(&[], timed.elapsed);

    let result = match timed.outcome {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(error = %e, elapsed_ms = timed.elapsed.as_millis() as u64, "model service call failed");
            return Err(GatewayError::from(e).into());
        }
    };

    let label = result.label();
    metrics.sentiment_predictions.inc(&[("sentiment", label.as_label())]);
    if label == Sentiment::Positive {
        // Running positive count despite the name; not normalized by total.
        metrics.sentiment_ratio.inc(&[]);
    }

    Ok(Json(result.augment()))
}
