//! Liveness endpoint for external uptime checks.

use std::net::SocketAddr;

use axum::{Router, response::Json, routing::get};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Serve `GET /health` with a fixed 200 response. Shares nothing with the
/// dispatcher beyond process liveness.
pub async fn serve(port: u16) {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new().route("/health", get(health_handler));

    log::info!("Starting health endpoint on http://{}", addr);

    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("Failed to bind health endpoint on {}: {}", addr, e);
            return;
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        log::error!("Health endpoint terminated: {}", e);
    }
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
