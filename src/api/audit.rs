use axum::{extract::State, Json};
use serde::Serialize;

use crate::audit::AuditEntry;
use crate::error::Result;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct AuditLogResponse {
    pub entries: Vec<AuditEntry>,
    pub total: usize,
}

/// GET /api/v1/notifications/log - Audit entries, oldest first
#[tracing::instrument(name = "http.list_audit_log", skip(state))]
pub async fn list_audit_log(State(state): State<AppState>) -> Result<Json<AuditLogResponse>> {
    let entries = state.audit.list().await?;
    let total = entries.len();

    Ok(Json(AuditLogResponse { entries, total }))
}
