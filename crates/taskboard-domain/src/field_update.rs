use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::card::{Card, CardPriority, CardStatus};

/// Partial card update sent to storage.
///
/// Each field is either `Some(new value)` or `None` (leave unchanged).
/// Absent fields are omitted on the wire so a status-only update carries
/// nothing but the status.
///
/// # Example
///
/// ```
/// use taskboard_domain::{CardStatus, CardUpdate};
///
/// let update = CardUpdate::status(CardStatus::Done);
/// assert_eq!(update.status, Some(CardStatus::Done));
/// assert!(update.name.is_none());
/// assert!(!update.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<CardPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CardStatus>,
}

impl CardUpdate {
    pub fn status(status: CardStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.tags.is_none()
            && self.status.is_none()
    }

    pub fn apply_to(&self, card: &mut Card) {
        if let Some(name) = &self.name {
            card.name = name.clone();
        }
        if let Some(description) = &self.description {
            card.description = description.clone();
        }
        if let Some(priority) = self.priority {
            card.priority = priority;
        }
        if let Some(tags) = &self.tags {
            card.tags = tags.clone();
        }
        if let Some(status) = self.status {
            card.status = status;
        }
    }
}
