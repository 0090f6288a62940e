//! Reporta API server

use reporta_api::{build_router, ApiConfig, ApiState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env().inspect_err(|e| tracing::error!(error = %e, "invalid configuration"))?;
    let addr = config.bind_addr;
    let workflow = config.workflow;
    let state = ApiState::from_config(config).inspect_err(|e| tracing::error!(error = %e, "store setup failed"))?;
    let app = build_router(state);

    tracing::info!(%addr, %workflow, "Reporta API listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
