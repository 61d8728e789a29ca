use taskboard_core::{Editable, TaskboardError};
use taskboard_domain::{Card, CardDraft, CardId};

/// Inline error shown in the open editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorError {
    pub field: Option<String>,
    pub message: String,
}

impl From<&TaskboardError> for EditorError {
    fn from(err: &TaskboardError) -> Self {
        match err {
            TaskboardError::Validation { field, message } => Self {
                field: Some(field.clone()),
                message: message.clone(),
            },
            other => Self {
                field: None,
                message: other.to_string(),
            },
        }
    }
}

/// The card currently open for editing, with its unsaved draft.
#[derive(Debug, Clone)]
pub struct CardEditor {
    pub card_id: CardId,
    pub draft: CardDraft,
    pub error: Option<EditorError>,
}

impl CardEditor {
    pub fn open(card: &Card) -> Self {
        Self {
            card_id: card.id,
            draft: CardDraft::from_entity(card),
            error: None,
        }
    }

    pub fn fail(&mut self, err: &TaskboardError) {
        self.error = Some(EditorError::from(err));
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeSet;
    use taskboard_domain::{CardPriority, CardStatus};
    use uuid::Uuid;

    #[test]
    fn test_editor_error_keeps_validation_field() {
        let card = Card {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            name: "Card".into(),
            description: String::new(),
            priority: CardPriority::Low,
            tags: BTreeSet::new(),
            status: CardStatus::Todo,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        let mut editor = CardEditor::open(&card);
        assert_eq!(editor.draft.name, "Card");

        editor.fail(&TaskboardError::validation("name", "must not be blank"));
        let error = editor.error.clone().unwrap();
        assert_eq!(error.field.as_deref(), Some("name"));

        editor.fail(&TaskboardError::StorageUnavailable("offline".into()));
        assert_eq!(editor.error.as_ref().unwrap().field, None);

        editor.clear_error();
        assert!(editor.error.is_none());
    }
}
