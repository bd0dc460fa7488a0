//! Serve command - run the dashboard API server

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use beacon_api::build_router;
use beacon_config::Config;

use crate::cmd::build_state;

/// Run the server until interrupted
pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config);

    let app = build_router(state).layer(TraceLayer::new_for_http()).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    );

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(
        addr = %addr,
        environment = %config.server.environment,
        "beacon listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
