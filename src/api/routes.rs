use axum::{middleware, routing::get, Router};

use crate::server::{api_key_auth, AppState};

use super::action::send_notification;
use super::audit::list_audit_log;
use super::health::{health, stats};
use super::links::notification_link;
use super::metrics::prometheus_metrics;
use super::settings::{get_settings, reset_settings, update_settings};

pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health & Stats
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/metrics", get(prometheus_metrics))
        // Trigger link target; the action token is the credential
        .route("/admin/actions", get(send_notification))
        // Management API
        .nest(
            "/api/v1",
            Router::new()
                .route(
                    "/settings",
                    get(get_settings).put(update_settings).delete(reset_settings),
                )
                .route("/notifications/log", get(list_audit_log))
                .route("/content/{id}/notification-link", get(notification_link))
                .layer(middleware::from_fn_with_state(state, api_key_auth)),
        )
}
