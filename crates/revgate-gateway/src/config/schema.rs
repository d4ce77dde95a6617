use std::net::SocketAddr;

use serde::Deserialize;
use revgate_core::error::{GatewayError, Result};

/// Minimum review length enforced by the short-review gate.
pub const MIN_REVIEW_WORDS: usize = 10;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub model_service: ModelServiceSection,

    #[serde(default)]
    pub app: AppSection,

    #[serde(default)]
    pub experiment: ExperimentConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            version: 1,
            gateway: GatewaySection::default(),
            model_service: ModelServiceSection::default(),
            app: AppSection::default(),
            experiment: ExperimentConfig::default(),
        }
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(GatewayError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.gateway.validate()?;
        self.model_service.validate()?;
        self.experiment.validate()?;

        Ok(())
    }

    /// Overlay the documented environment variables.
    pub fn apply_env<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("LISTEN_ADDR") {
            self.gateway.listen = v;
        }
        if let Some(v) = lookup("MODEL_SERVICE_URL") {
            self.model_service.url = v;
        }
        if let Some(v) = lookup("APP_VERSION") {
            self.app.app_version = v;
        }
        if let Some(v) = lookup("EXPERIMENT_VERSION") {
            self.experiment.experiment_version = v;
        }
        if let Some(v) = lookup("ENABLE_SHORT_REVIEW_WARNING") {
            self.experiment.warning_enabled = v.eq_ignore_ascii_case("true");
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            GatewayError::Config(format!("gateway.listen must be a valid SocketAddr: {}", self.listen))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelServiceSection {
    #[serde(default = "default_model_url")]
    pub url: String,

    #[serde(default = "default_version_timeout_ms")]
    pub version_timeout_ms: u64,

    #[serde(default = "default_analyze_timeout_ms")]
    pub analyze_timeout_ms: u64,
}

impl Default for ModelServiceSection {
    fn default() -> Self {
        Self {
            url: default_model_url(),
            version_timeout_ms: default_version_timeout_ms(),
            analyze_timeout_ms: default_analyze_timeout_ms(),
        }
    }
}

impl ModelServiceSection {
    pub fn validate(&self) -> Result<()> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(GatewayError::Config(format!(
                "model_service.url must be an http(s) URL: {}",
                self.url
            )));
        }
        for (name, v) in [
            ("version_timeout_ms", self.version_timeout_ms),
            ("analyze_timeout_ms", self.analyze_timeout_ms),
        ] {
            if !(100..=60_000).contains(&v) {
                return Err(GatewayError::Config(format!(
                    "model_service.{name} must be between 100 and 60000"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppSection {
    #[serde(default = "default_app_version")]
    pub app_version: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self { app_version: default_app_version() }
    }
}

/// Experiment switches. Read-only after startup.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExperimentConfig {
    #[serde(default = "default_experiment_version")]
    pub experiment_version: String,

    #[serde(default)]
    pub warning_enabled: bool,

    #[serde(default = "default_min_words")]
    pub min_words: usize,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            experiment_version: default_experiment_version(),
            warning_enabled: false,
            min_words: default_min_words(),
        }
    }
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_words == 0 {
            return Err(GatewayError::Config("experiment.min_words must be at least 1".into()));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:5001".into()
}
fn default_model_url() -> String {
    "http://localhost:5000".into()
}
fn default_version_timeout_ms() -> u64 {
    5_000
}
fn default_analyze_timeout_ms() -> u64 {
    10_000
}
fn default_app_version() -> String {
    "unknown".into()
}
fn default_experiment_version() -> String {
    "control".into()
}
fn default_min_words() -> usize {
    MIN_REVIEW_WORDS
}
