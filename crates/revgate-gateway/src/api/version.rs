use axum::{extract::State, Json};

use revgate_core::review::{AppVersion, ModelServiceVersion, VersionReport};

use crate::app_state::AppState;

/// Always 200; model unavailability is reported in-band.
pub async fn version(State(state): State<AppState>) -> Json<VersionReport> {
    let model_version = state.model_service().model_version().await;
    let cfg = state.cfg();

    Json(VersionReport {
        app: AppVersion {
            app_version: cfg.app.app_version.clone(),
            experiment_version: cfg.experiment.experiment_version.clone(),
        },
        model_service: ModelServiceVersion { model_version },
    })
}
