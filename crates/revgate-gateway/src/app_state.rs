//! Shared application state for the revgate gateway.
//!
//! Built once at startup. Everything inside is either immutable (config) or
//! internally synchronized (metrics), so handlers clone the `Arc` freely.

use std::sync::Arc;

use revgate_core::error::Result;

use crate::config::{ExperimentConfig, GatewayConfig};
use crate::obs::GatewayMetrics;
use crate::upstream::{ModelService, ModelServiceClient};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    metrics: GatewayMetrics,
    model: Arc<dyn ModelService>,
}

impl AppState {
    /// Build application state with the reqwest-backed model client.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        let model = ModelServiceClient::new(&cfg.model_service)?;
        Self::with_model_service(cfg, Arc::new(model))
    }

    /// Build application state around any model service implementation.
    pub fn with_model_service(cfg: GatewayConfig, model: Arc<dyn ModelService>) -> Result<Self> {
        cfg.validate()?;
        let metrics = GatewayMetrics::register(&cfg.app.app_version)?;

        tracing::info!(
            app_version = %cfg.app.app_version,
            experiment = %cfg.experiment.experiment_version,
            short_review_warning = cfg.experiment.warning_enabled,
            min_words = cfg.experiment.min_words,
            model_service = %cfg.model_service.url,
            "gateway state ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, metrics, model }),
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn experiment(&self) -> &ExperimentConfig {
        &self.inner.cfg.experiment
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.inner.metrics
    }

    pub fn model_service(&self) -> Arc<dyn ModelService> {
        Arc::clone(&self.inner.model)
    }

    pub fn is_draining(&self) -> bool {
        self.inner.metrics.is_draining()
    }

    pub fn set_draining(&self) {
        self.inner.metrics.set_draining();
    }
}
