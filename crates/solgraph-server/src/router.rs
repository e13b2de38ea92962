//! Axum router setup

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;

use crate::{
    ServerState,
    handlers::{get_solution, health_check},
    websocket::ws_handler,
};

pub fn create_router(state: Arc<ServerState>) -> Router {
    Router::new()
        // Live report updates
        .route("/ws", get(ws_handler))
        .route("/api/solution", get(get_solution))
        .route("/api/health", get(health_check))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
