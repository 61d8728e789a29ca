use crate::field_update::CardUpdate;
use crate::tag::TagVocabulary;
use crate::{Card, CardPriority, CardStatus, NewCard, ProjectId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use taskboard_core::{Editable, TaskboardError, TaskboardResult};

/// Edit-form buffer for a card. Copied from the stored card when the editor
/// opens and only written back on save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDraft {
    pub name: String,
    pub description: String,
    pub priority: CardPriority,
    pub tags: BTreeSet<String>,
    pub status: CardStatus,
}

impl CardDraft {
    /// Blank form for a new card: todo, medium priority, no tags.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            priority: CardPriority::default(),
            tags: BTreeSet::new(),
            status: CardStatus::default(),
        }
    }

    pub fn into_new_card(self, project_id: ProjectId, created_by: Option<UserId>) -> NewCard {
        NewCard {
            project_id,
            name: self.name.trim().to_string(),
            description: self.description,
            priority: self.priority,
            tags: self.tags,
            status: self.status,
            created_by,
        }
    }

    pub fn validate(&self, vocabulary: &TagVocabulary) -> TaskboardResult<()> {
        if self.name.trim().is_empty() {
            return Err(TaskboardError::validation("name", "must not be blank"));
        }
        vocabulary.check(&self.tags)
    }

    /// Fields that differ from `card`, ready for a partial update.
    pub fn diff(&self, card: &Card) -> CardUpdate {
        let name = self.name.trim();
        CardUpdate {
            name: (name != card.name).then(|| name.to_string()),
            description: (self.description != card.description).then(|| self.description.clone()),
            priority: (self.priority != card.priority).then_some(self.priority),
            tags: (self.tags != card.tags).then(|| self.tags.clone()),
            status: (self.status != card.status).then_some(self.status),
        }
    }

    pub fn toggle_tag(&mut self, tag: &str) {
        let tag = tag.trim().to_lowercase();
        if !self.tags.remove(&tag) {
            self.tags.insert(tag);
        }
    }
}

impl Editable<Card> for CardDraft {
    fn from_entity(card: &Card) -> Self {
        Self {
            name: card.name.clone(),
            description: card.description.clone(),
            priority: card.priority,
            tags: card.tags.clone(),
            status: card.status,
        }
    }

    fn apply_to(self, card: &mut Card) {
        card.name = self.name.trim().to_string();
        card.description = self.description;
        card.priority = self.priority;
        card.tags = self.tags;
        card.status = self.status;
    }
}
