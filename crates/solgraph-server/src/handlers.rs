//! REST API handlers

use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use solgraph_core::SolutionReport;

use crate::ServerState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Current report: levels, orphans and problems.
pub async fn get_solution(State(state): State<Arc<ServerState>>) -> Json<SolutionReport> {
    let report = state.report.read().await;
    Json(report.clone())
}

pub async fn health_check() -> impl IntoResponse {
    let health = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    Json(health)
}
