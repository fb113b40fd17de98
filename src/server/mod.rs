//! HTTP surface for the workflow engine
//!
//! Thin axum glue over the execution coordinator: request parsing, route
//! wiring, CORS, and request tracing live here; all workflow behavior is in
//! [`crate::engine`].

pub mod api;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::core::{AutoflowError, Config, Result};
use crate::engine::Coordinator;

/// Shared state accessible by all API handlers
pub type AppState = Arc<Coordinator>;

/// Start the workflow server from configuration
///
/// Builds the coordinator (probing for the vision helper and picking the
/// plan backend) and returns the address the server is listening on.
pub async fn start_server(config: Config) -> Result<SocketAddr> {
    let state: AppState = Arc::new(Coordinator::from_config(&config).await);
    start_server_with_state(&config, state).await
}

/// Start the HTTP server with a pre-built coordinator
///
/// This variant is useful for tests and for embedding the engine with
/// custom plan-generation or interaction backends.
pub async fn start_server_with_state(config: &Config, state: AppState) -> Result<SocketAddr> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api", api::api_router())
        .route("/health", axum::routing::get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AutoflowError::server(format!("Failed to bind to {}: {}", addr, e)))?;

    let local_addr = listener
        .local_addr()
        .map_err(|e| AutoflowError::server(format!("Failed to get local address: {}", e)))?;

    tracing::info!("Workflow server listening on {}", local_addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok(local_addr)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
