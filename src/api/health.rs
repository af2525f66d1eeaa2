//! Health check and statistics endpoints.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::notification::DispatcherStatsSnapshot;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub store: BackendHealthResponse,
    pub mail: BackendHealthResponse,
}

#[derive(Debug, Serialize)]
pub struct BackendHealthResponse {
    pub backend: String,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub notifications: DispatcherStatsSnapshot,
    pub audit_entries: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        store: BackendHealthResponse {
            backend: state.config_store.backend_name().to_string(),
        },
        mail: BackendHealthResponse {
            backend: state.dispatcher.mailer().transport_name().to_string(),
        },
    })
}

pub async fn stats(State(state): State<AppState>) -> crate::error::Result<Json<StatsResponse>> {
    let audit_entries = state.audit.list().await?.len();

    Ok(Json(StatsResponse {
        notifications: state.dispatcher.stats(),
        audit_entries,
    }))
}
