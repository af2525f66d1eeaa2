use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::notification::{ineligibility_reason, Ineligible, SEND_NOTIFICATION_ACTION};
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct NotificationLinkResponse {
    pub content_id: u64,
    pub title: String,
    /// Relative trigger URL; the client appends `&comment=<percent-encoded>`
    pub url: String,
    /// Whether a dispatch under current settings would reach the fan-out
    pub eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ineligible_reason: Option<Ineligible>,
}

/// GET /api/v1/content/{id}/notification-link
#[tracing::instrument(name = "http.notification_link", skip(state))]
pub async fn notification_link(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<NotificationLinkResponse>> {
    let item = state
        .content
        .get_content(id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .ok_or_else(|| AppError::NotFound(format!("Content {}", id)))?;

    if !item.accepts_notifications() {
        return Err(AppError::Validation(
            "Only published posts and pages can send notifications".to_string(),
        ));
    }

    let settings = state.notification_settings.load().await?;
    let reason = ineligibility_reason(&item, &settings);
    let token = state.tokens.issue(SEND_NOTIFICATION_ACTION, item.id)?;

    Ok(Json(NotificationLinkResponse {
        content_id: item.id,
        title: item.title,
        url: format!(
            "/admin/actions?action={}&content_id={}&token={}",
            SEND_NOTIFICATION_ACTION, item.id, token
        ),
        eligible: reason.is_none(),
        ineligible_reason: reason,
    }))
}
