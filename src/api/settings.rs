//! Notification settings endpoints.

use axum::{extract::State, Json};

use crate::error::{AppError, Result};
use crate::notification::{NotificationSettings, SettingsError, SettingsUpdate};
use crate::server::AppState;

impl From<SettingsError> for AppError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::Store(e) => AppError::Store(e),
            other => AppError::Validation(other.to_string()),
        }
    }
}

/// GET /api/v1/settings
#[tracing::instrument(name = "http.get_settings", skip(state))]
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<NotificationSettings>> {
    Ok(Json(state.notification_settings.load().await?))
}

/// PUT /api/v1/settings - Validate, sanitize and replace the settings
#[tracing::instrument(name = "http.update_settings", skip(state, update))]
pub async fn update_settings(
    State(state): State<AppState>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<NotificationSettings>> {
    Ok(Json(state.notification_settings.save(update).await?))
}

/// DELETE /api/v1/settings - Restore defaults
#[tracing::instrument(name = "http.reset_settings", skip(state))]
pub async fn reset_settings(State(state): State<AppState>) -> Result<Json<NotificationSettings>> {
    Ok(Json(state.notification_settings.reset().await?))
}
