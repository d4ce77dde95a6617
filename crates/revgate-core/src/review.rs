//! Review payloads exchanged with clients and with the model service.
//!
//! Inbound bodies are parsed leniently (every field optional) so that a
//! missing field is reported as a client error by the handler instead of a
//! generic deserialization failure.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{GatewayError, Result};

/// Emoji attached to positive predictions.
pub const POSITIVE_EMOJI: &str = "😊";
/// Emoji attached to negative predictions.
pub const NEGATIVE_EMOJI: &str = "😔";

/// Number of non-empty whitespace-delimited tokens in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Body of `POST /api/analyze`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewSubmission {
    #[serde(default)]
    pub review: Option<Value>,
}

impl ReviewSubmission {
    /// Parse a raw request body.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body)
            .map_err(|_| GatewayError::BadRequest("Missing review text".into()))
    }

    /// The review text, or a client error when it is absent or not a string.
    pub fn text(&self) -> Result<&str> {
        match &self.review {
            Some(Value::String(s)) => Ok(s.as_str()),
            _ => Err(GatewayError::BadRequest("Missing review text".into())),
        }
    }
}

/// Body of `POST /api/feedback`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackSubmission {
    #[serde(default)]
    pub review_id: Option<Value>,
    #[serde(default)]
    pub correct_sentiment: Option<Value>,
}

impl FeedbackSubmission {
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let parsed: Self = serde_json::from_slice(body).map_err(|_| missing_feedback())?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Both fields must be present and non-null.
    pub fn validate(&self) -> Result<()> {
        if self.review_id.is_none() || self.correct_sentiment.is_none() {
            return Err(missing_feedback());
        }
        Ok(())
    }
}

fn missing_feedback() -> GatewayError {
    GatewayError::BadRequest("Missing review_id or correct_sentiment".into())
}

/// Fixed acknowledgement for accepted feedback.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FeedbackAck {
    pub status: &'static str,
    pub message: &'static str,
}

impl Default for FeedbackAck {
    fn default() -> Self {
        Self { status: "success", message: "Feedback received" }
    }
}

/// Body sent to the model service's `/analyze`.
#[derive(Debug, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub review: &'a str,
}

/// Model service `/analyze` response.
///
/// `sentiment` is required; `confidence` is optional. Any other fields the
/// model returns are kept in `extra` and passed through to the client.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub sentiment: bool,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Closed label set for `sentiment_predictions_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    pub fn as_label(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Sentiment::Positive => POSITIVE_EMOJI,
            Sentiment::Negative => NEGATIVE_EMOJI,
        }
    }
}

impl From<bool> for Sentiment {
    fn from(v: bool) -> Self {
        if v { Sentiment::Positive } else { Sentiment::Negative }
    }
}

/// What the gateway returns for a successful analysis.
///
/// `confidence` always serializes, as `null` when the model omitted it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AugmentedAnalysis {
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    pub sentiment: bool,
    pub confidence: Option<f64>,
    pub emoji: &'static str,
}

impl AnalysisResult {
    pub fn label(&self) -> Sentiment {
        Sentiment::from(self.sentiment)
    }

    /// Attach the emoji and normalize `confidence`.
    pub fn augment(self) -> AugmentedAnalysis {
        let emoji = self.label().emoji();
        let mut extra = self.extra;
        // Reserved keys always come from the typed fields.
        for k in ["sentiment", "confidence", "emoji"] {
            extra.remove(k);
        }
        AugmentedAnalysis {
            extra,
            sentiment: self.sentiment,
            confidence: self.confidence,
            emoji,
        }
    }
}

/// Model service `/version` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelVersion {
    pub model_version: String,
}

/// Body of `GET /api/version`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VersionReport {
    pub app: AppVersion,
    pub model_service: ModelServiceVersion,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AppVersion {
    pub app_version: String,
    pub experiment_version: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ModelServiceVersion {
    pub model_version: String,
}
