//! Notification email templates.
//!
//! This module provides:
//! - The fixed placeholder set (`{{username}}`, `{{post_url}}`, `{{post_title}}`, `{{comments}}`)
//! - A single-pass renderer with partial binding for per-recipient fan-out
//! - HTML escaping for substituted values and sanitizing for stored templates
//!
//! # Example
//!
//! ```ignore
//! let base = CompiledTemplate::parse(&settings.template)
//!     .bind(&TemplateBindings::for_content(&item, comment));
//!
//! for recipient in recipients {
//!     let body = base.render(&TemplateBindings::with_username(&recipient.name));
//!     // send body ...
//! }
//! ```

mod render;
mod sanitize;
mod types;

pub use render::{render, CompiledTemplate};
pub use sanitize::{escape_html, sanitize_template};
pub use types::{TemplateBindings, Token};

/// Template used until an editor saves their own
pub const DEFAULT_TEMPLATE: &str = "<p>Hello {{username}},</p>\n\
<p><a href=\"{{post_url}}\">{{post_title}}</a> has been updated.</p>\n\
<p>{{comments}}</p>";
