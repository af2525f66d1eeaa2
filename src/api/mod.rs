//! API layer - HTTP endpoint handlers organized by concern.

mod action;
mod audit;
mod health;
mod links;
mod metrics;
mod routes;
mod settings;

// Re-export all handlers for use in server/app.rs
pub use action::{send_notification, ActionResponse, SUCCESS_MESSAGE};
pub use audit::{list_audit_log, AuditLogResponse};
pub use health::{health, stats};
pub use links::{notification_link, NotificationLinkResponse};
pub use metrics::prometheus_metrics;
pub use routes::api_routes;
pub use settings::{get_settings, reset_settings, update_settings};
