use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskboard_core::{TaskboardError, TaskboardResult};
use uuid::Uuid;

use crate::card::{CardId, UserId};

pub type CommentId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub card_id: CardId,
    pub author: UserId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn from_new(id: CommentId, new_comment: NewComment) -> Self {
        Self {
            id,
            card_id: new_comment.card_id,
            author: new_comment.author,
            text: new_comment.text.trim().to_string(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub card_id: CardId,
    pub author: UserId,
    pub text: String,
}

impl NewComment {
    pub fn new(card_id: CardId, author: UserId, text: impl Into<String>) -> Self {
        Self {
            card_id,
            author,
            text: text.into(),
        }
    }

    pub fn validate(&self) -> TaskboardResult<()> {
        if self.card_id.is_nil() {
            return Err(TaskboardError::validation("card_id", "comment needs a card"));
        }
        if self.author.is_nil() {
            return Err(TaskboardError::validation("author", "comment needs an author"));
        }
        if self.text.trim().is_empty() {
            return Err(TaskboardError::validation("text", "must not be blank"));
        }
        Ok(())
    }
}
