//! Trigger link target: `GET /admin/actions`.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;

use crate::error::Result;
use crate::notification::{DeliveryFailure, DispatchRequest, SkipReason};
use crate::server::AppState;

pub const SUCCESS_MESSAGE: &str = "Notification email sent successfully!";

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub sent: usize,
    pub failed: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<DeliveryFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<SkipReason>,
    pub message: String,
}

/// GET /admin/actions?action=send_notification&content_id=..&token=..&comment=..
#[tracing::instrument(
    name = "http.send_notification",
    skip(state, request),
    fields(content_id = request.content_id)
)]
pub async fn send_notification(
    State(state): State<AppState>,
    Query(request): Query<DispatchRequest>,
) -> Result<Json<ActionResponse>> {
    let result = state.action.handle(request).await?;

    let message = match result.skipped {
        Some(SkipReason::Disabled) => "Notifications are disabled; nothing was sent.".to_string(),
        Some(SkipReason::Ineligible) => {
            "Content does not qualify for notifications; nothing was sent.".to_string()
        }
        None => SUCCESS_MESSAGE.to_string(),
    };

    Ok(Json(ActionResponse {
        success: true,
        sent: result.sent_count,
        failed: result.failure_count,
        failures: result.failures,
        skipped: result.skipped,
        message,
    }))
}
