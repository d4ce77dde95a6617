//! Gateway config loader (strict YAML file + environment overlay).
//!
//! Configuration is assembled once at startup and never re-read. Environment
//! access goes through an injected lookup so tests stay hermetic.

pub mod schema;

use std::fs;

use revgate_core::error::{GatewayError, Result};

pub use schema::{
    AppSection, ExperimentConfig, GatewayConfig, GatewaySection, ModelServiceSection,
    MIN_REVIEW_WORDS,
};

/// Names a YAML file to start from instead of built-in defaults.
pub const CONFIG_PATH_ENV: &str = "REVGATE_CONFIG";

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| GatewayError::Config(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| GatewayError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Build the process config: optional file, then environment overrides, then validation.
pub fn load<F>(lookup: F) -> Result<GatewayConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = match lookup(CONFIG_PATH_ENV) {
        Some(path) => load_from_file(&path)?,
        None => GatewayConfig::default(),
    };
    cfg.apply_env(&lookup);
    cfg.validate()?;
    Ok(cfg)
}

/// `load` against the real process environment.
pub fn load_from_env() -> Result<GatewayConfig> {
    load(|k| std::env::var(k).ok())
}
