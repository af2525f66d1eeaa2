//! Notification dispatch pipeline.
//!
//! # Pipeline
//!
//! ```text
//! NotificationAction::handle
//!   -> token + comment + content checks
//!   -> NotificationDispatcher::dispatch
//!        -> enabled?           (skip: disabled)
//!        -> is_eligible        (skip: ineligible)
//!        -> bind template once, HTML content-type scope
//!        -> select_recipients  (test address or directory)
//!        -> render + send per recipient, failures collected
//!        -> one audit entry
//! ```

mod action;
mod dispatcher;
mod eligibility;
mod recipients;
mod settings;
mod types;

pub use action::NotificationAction;
pub use dispatcher::NotificationDispatcher;
pub use eligibility::{ineligibility_reason, is_eligible, Ineligible};
pub use recipients::{recipient_source, select_recipients, Recipient, RecipientSource};
pub use settings::{
    NotificationSettings, SettingsError, SettingsStore, SettingsUpdate, SETTINGS_KEY,
};
pub use types::{
    DeliveryFailure, DispatchError, DispatchRequest, DispatchResult, DispatcherStats,
    DispatcherStatsSnapshot, SkipReason, SEND_NOTIFICATION_ACTION,
};
