use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use revgate_core::error::{GatewayError, Result};
use revgate_core::review::{AnalysisResult, AnalyzeRequest, ModelVersion};

use crate::config::ModelServiceSection;

/// Reported model version when the service cannot be asked.
pub const VERSION_UNAVAILABLE: &str = "unavailable";

/// Failure modes of a single `/analyze` call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalysisError {
    /// Connect, send, timeout, or body read failure.
    #[error("model service unreachable: {0}")]
    Unreachable(String),
    /// Answered with something other than 200.
    #[error("model service returned status {0}")]
    UpstreamStatus(u16),
    /// 200 with a body that does not match the contract.
    #[error("model service returned an invalid body: {0}")]
    InvalidBody(String),
}

impl From<AnalysisError> for GatewayError {
    fn from(e: AnalysisError) -> Self {
        match e {
            AnalysisError::Unreachable(msg) => GatewayError::UpstreamUnavailable(msg),
            AnalysisError::UpstreamStatus(code) => GatewayError::UpstreamStatus(code),
            AnalysisError::InvalidBody(msg) => GatewayError::UpstreamInvalid(msg),
        }
    }
}

/// Outcome of `/analyze` together with the wall-clock time it took.
///
/// `elapsed` is measured for failures too.
#[derive(Debug, Clone)]
pub struct TimedAnalysis {
    pub elapsed: Duration,
    pub outcome: std::result::Result<AnalysisResult, AnalysisError>,
}

#[async_trait]
pub trait ModelService: Send + Sync {
    /// Best-effort version lookup. Never fails; returns [`VERSION_UNAVAILABLE`] instead.
    async fn model_version(&self) -> String;

    /// Forward one review. Never retries.
    async fn analyze(&self, review: &str) -> TimedAnalysis;
}

/// HTTP client for the model service.
#[derive(Debug, Clone)]
pub struct ModelServiceClient {
    http: reqwest::Client,
    base_url: String,
    version_timeout: Duration,
    analyze_timeout: Duration,
}

impl ModelServiceClient {
    pub fn new(cfg: &ModelServiceSection) -> Result<Self> {
        let http = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| GatewayError::Config(format!("http client build failed: {e}")))?;

        Ok(Self {
            http,
            base_url: cfg.url.trim_end_matches('/').to_string(),
            version_timeout: Duration::from_millis(cfg.version_timeout_ms),
            analyze_timeout: Duration::from_millis(cfg.analyze_timeout_ms),
        })
    }

    async fn fetch_version(&self) -> std::result::Result<String, String> {
        let resp = self
            .http
            .get(format!("{}/version", self.base_url))
            .timeout(self.version_timeout)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if resp.status() != StatusCode::OK {
            return Err(format!("status {}", resp.status().as_u16()));
        }

        let body: ModelVersion = resp.json().await.map_err(|e| e.to_string())?;
        Ok(body.model_version)
    }

    async fn post_analyze(&self, review: &str) -> std::result::Result<AnalysisResult, AnalysisError> {
        let resp = self
            .http
            .post(format!("{}/analyze", self.base_url))
            .timeout(self.analyze_timeout)
            .json(&AnalyzeRequest { review })
            .send()
            .await
            .map_err(|e| AnalysisError::Unreachable(e.to_string()))?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(AnalysisError::UpstreamStatus(status.as_u16()));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| AnalysisError::Unreachable(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| AnalysisError::InvalidBody(e.to_string()))
    }
}

#[async_trait]
impl ModelService for ModelServiceClient {
    async fn model_version(&self) -> String {
        match self.fetch_version().await {
            Ok(v) => v,
            Err(reason) => {
                tracing::debug!(%reason, url=%self.base_url, "model version lookup failed");
                VERSION_UNAVAILABLE.to_string()
            }
        }
    }

    async fn analyze(&self, review: &str) -> TimedAnalysis {
        let started = Instant::now();
        let outcome = self.post_analyze(review).await;
        TimedAnalysis { elapsed: started.elapsed(), outcome }
    }
}
