use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use taskboard_core::{TaskboardError, TaskboardResult};
use uuid::Uuid;

use crate::tag::TagVocabulary;

pub type CardId = Uuid;
pub type ProjectId = Uuid;
pub type UserId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardPriority {
    Low,
    Medium,
    High,
}

impl Default for CardPriority {
    fn default() -> Self {
        CardPriority::Medium
    }
}

impl fmt::Display for CardPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CardPriority::Low => "low",
            CardPriority::Medium => "medium",
            CardPriority::High => "high",
        };
        f.write_str(s)
    }
}

impl FromStr for CardPriority {
    type Err = TaskboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(CardPriority::Low),
            "medium" => Ok(CardPriority::Medium),
            "high" => Ok(CardPriority::High),
            other => Err(TaskboardError::validation(
                "priority",
                format!("unknown priority '{other}'"),
            )),
        }
    }
}

/// Column membership of a card. Declaration order is the board's column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    Todo,
    #[serde(alias = "inprogress")]
    InProgress,
    Done,
}

impl CardStatus {
    pub const ALL: [CardStatus; 3] = [CardStatus::Todo, CardStatus::InProgress, CardStatus::Done];

    /// Position in the fixed column ordering.
    pub fn order(self) -> usize {
        match self {
            CardStatus::Todo => 0,
            CardStatus::InProgress => 1,
            CardStatus::Done => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CardStatus::Todo => "todo",
            CardStatus::InProgress => "in_progress",
            CardStatus::Done => "done",
        }
    }
}

impl Default for CardStatus {
    fn default() -> Self {
        CardStatus::Todo
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardStatus {
    type Err = TaskboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-', ' '], "").as_str() {
            "todo" => Ok(CardStatus::Todo),
            "inprogress" => Ok(CardStatus::InProgress),
            "done" => Ok(CardStatus::Done),
            _ => Err(TaskboardError::validation(
                "status",
                format!("unknown status '{}'", s.trim()),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub project_id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: CardPriority,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub status: CardStatus,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl Card {
    /// Materialises a validated create request. Storage backends call this
    /// after assigning the id.
    pub fn from_new(id: CardId, new_card: NewCard, created_by: UserId) -> Self {
        Self {
            id,
            project_id: new_card.project_id,
            name: new_card.name.trim().to_string(),
            description: new_card.description,
            priority: new_card.priority,
            tags: new_card.tags,
            status: new_card.status,
            created_by,
            created_at: Utc::now(),
        }
    }

    pub fn move_to(&mut self, status: CardStatus) {
        self.status = status;
    }
}

/// Create payload; the server assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCard {
    pub project_id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: CardPriority,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub status: CardStatus,
    pub created_by: Option<UserId>,
}

impl NewCard {
    pub fn new(project_id: ProjectId, name: impl Into<String>, created_by: Option<UserId>) -> Self {
        Self {
            project_id,
            name: name.into(),
            description: String::new(),
            priority: CardPriority::Medium,
            tags: BTreeSet::new(),
            status: CardStatus::Todo,
            created_by,
        }
    }

    /// Checks required fields and returns the author on success.
    pub fn validate(&self, vocabulary: &TagVocabulary) -> TaskboardResult<UserId> {
        if self.project_id.is_nil() {
            return Err(TaskboardError::validation(
                "project_id",
                "card must belong to a project",
            ));
        }
        if self.name.trim().is_empty() {
            return Err(TaskboardError::validation("name", "must not be blank"));
        }
        vocabulary.check(&self.tags)?;
        self.created_by
            .filter(|id| !id.is_nil())
            .ok_or_else(|| TaskboardError::validation("created_by", "card needs an author"))
    }
}
