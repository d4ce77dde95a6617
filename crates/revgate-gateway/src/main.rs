//! revgate gateway binary.
//!
//! Reads configuration from the environment (optionally seeded by the YAML
//! file named in `REVGATE_CONFIG`), serves the API, and drains on Ctrl-C.

use tracing_subscriber::{fmt, EnvFilter};

use revgate_gateway::{app_state::AppState, config, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "gateway failed");
        std::process::exit(1);
    }
}

async fn run() -> revgate_core::Result<()> {
    let cfg = config::load_from_env()?;
    let listen = cfg.gateway.listen_addr()?;

    let state = AppState::new(cfg)?;
    let app = router::build_router(state.clone());

    tracing::info!(%listen, "revgate-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| revgate_core::GatewayError::Config(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .map_err(|e| revgate_core::GatewayError::Internal(format!("server failed: {e}")))
}

async fn shutdown_signal(state: AppState) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl_c listener failed; shutting down");
    }
    state.set_draining();
    tracing::info!("draining: finishing in-flight requests");
}
