//! Liveness and configuration status endpoints.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use taskscribe_types::config::ConfigStatus;
use taskscribe_types::job::JobCounts;

use crate::state::AppState;

/// Service name reported by `GET /`.
pub const SERVICE_NAME: &str = "Notion Transcript Automation";

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub config: ConfigStatus,
    pub jobs: JobCounts,
}

/// GET / - Liveness.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        status: "healthy",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /health - Which settings are present, plus job counters.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        config: state.config.status(),
        jobs: state.jobs.counts(),
    })
}
