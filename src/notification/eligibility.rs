//! Whether a content item qualifies for a notification.

use serde::Serialize;

use crate::content::ContentItem;

use super::settings::NotificationSettings;

/// Rule a content item failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ineligible {
    NotPublished,
    NoMatchingCategory,
}

impl Ineligible {
    pub fn as_str(self) -> &'static str {
        match self {
            Ineligible::NotPublished => "not_published",
            Ineligible::NoMatchingCategory => "no_matching_category",
        }
    }
}

/// First rule `item` fails, checked in order: publication state, then
/// category overlap. An empty category selection matches nothing.
pub fn ineligibility_reason(
    item: &ContentItem,
    settings: &NotificationSettings,
) -> Option<Ineligible> {
    if !item.is_published() {
        return Some(Ineligible::NotPublished);
    }

    if settings.selected_categories.is_disjoint(&item.categories) {
        return Some(Ineligible::NoMatchingCategory);
    }

    None
}

pub fn is_eligible(item: &ContentItem, settings: &NotificationSettings) -> bool {
    ineligibility_reason(item, settings).is_none()
}
