use serde::{Deserialize, Serialize};
use taskboard_core::{TaskboardError, TaskboardResult};
use taskboard_domain::{
    Card, CardId, CardUpdate, Comment, CommentId, NewCard, NewComment, ProjectId, TagVocabulary,
};
use uuid::Uuid;

pub const DOCUMENT_VERSION: u32 = 1;

/// Everything a storage backend holds, with the storage-side rules applied
/// (id assignment, validation, cascade delete). Backends differ only in
/// where the document lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardDocument {
    pub version: u32,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Default for BoardDocument {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            cards: Vec::new(),
            comments: Vec::new(),
        }
    }
}

impl BoardDocument {
    pub fn cards_for(&self, project_id: ProjectId) -> Vec<Card> {
        self.cards
            .iter()
            .filter(|c| c.project_id == project_id)
            .cloned()
            .collect()
    }

    pub fn create_card(
        &mut self,
        new_card: NewCard,
        vocabulary: &TagVocabulary,
    ) -> TaskboardResult<Card> {
        let author = new_card.validate(vocabulary)?;
        let card = Card::from_new(Uuid::new_v4(), new_card, author);
        self.cards.push(card.clone());
        Ok(card)
    }

    pub fn update_card(
        &mut self,
        id: CardId,
        fields: &CardUpdate,
        vocabulary: &TagVocabulary,
    ) -> TaskboardResult<()> {
        if let Some(name) = &fields.name {
            if name.trim().is_empty() {
                return Err(TaskboardError::validation("name", "must not be blank"));
            }
        }
        if let Some(tags) = &fields.tags {
            vocabulary.check(tags)?;
        }
        let card = self
            .cards
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| TaskboardError::not_found(format!("card {id}")))?;
        fields.apply_to(card);
        Ok(())
    }

    pub fn delete_card(&mut self, id: CardId) -> TaskboardResult<()> {
        let before = self.cards.len();
        self.cards.retain(|c| c.id != id);
        if self.cards.len() == before {
            return Err(TaskboardError::not_found(format!("card {id}")));
        }
        self.comments.retain(|c| c.card_id != id);
        Ok(())
    }

    /// Comments of a card, oldest first.
    pub fn comments_for(&self, card_id: CardId) -> Vec<Comment> {
        let mut comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|c| c.card_id == card_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| c.created_at);
        comments
    }

    pub fn create_comment(&mut self, new_comment: NewComment) -> TaskboardResult<Comment> {
        new_comment.validate()?;
        if !self.cards.iter().any(|c| c.id == new_comment.card_id) {
            return Err(TaskboardError::not_found(format!(
                "card {}",
                new_comment.card_id
            )));
        }
        let comment = Comment::from_new(Uuid::new_v4(), new_comment);
        self.comments.push(comment.clone());
        Ok(comment)
    }

    pub fn delete_comment(&mut self, id: CommentId) -> TaskboardResult<()> {
        let before = self.comments.len();
        self.comments.retain(|c| c.id != id);
        if self.comments.len() == before {
            return Err(TaskboardError::not_found(format!("comment {id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_domain::CardStatus;

    fn document_with_card() -> (BoardDocument, Card) {
        let mut doc = BoardDocument::default();
        let card = doc
            .create_card(
                NewCard::new(Uuid::new_v4(), "Card", Some(Uuid::new_v4())),
                &TagVocabulary::default(),
            )
            .unwrap();
        (doc, card)
    }

    #[test]
    fn test_create_assigns_id_and_defaults() {
        let (doc, card) = document_with_card();
        assert!(!card.id.is_nil());
        assert_eq!(card.status, CardStatus::Todo);
        assert_eq!(doc.cards_for(card.project_id), vec![card.clone()]);
        assert!(doc.cards_for(Uuid::new_v4()).is_empty());
    }

    #[test]
    fn test_create_rejects_invalid_card() {
        let mut doc = BoardDocument::default();
        let err = doc
            .create_card(NewCard::new(Uuid::new_v4(), "", Some(Uuid::new_v4())), &TagVocabulary::default())
            .unwrap_err();
        assert_eq!(err.field(), Some("name"));
        assert!(doc.cards.is_empty());
    }

    #[test]
    fn test_update_unknown_card_is_not_found() {
        let mut doc = BoardDocument::default();
        let err = doc
            .update_card(
                Uuid::new_v4(),
                &CardUpdate::status(CardStatus::Done),
                &TagVocabulary::default(),
            )
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_update_validates_fields() {
        let (mut doc, card) = document_with_card();
        let update = CardUpdate {
            name: Some(" ".into()),
            ..Default::default()
        };
        let err = doc
            .update_card(card.id, &update, &TagVocabulary::default())
            .unwrap_err();
        assert_eq!(err.field(), Some("name"));
        assert_eq!(doc.cards[0].name, "Card");
    }

    #[test]
    fn test_delete_cascades_comments() {
        let (mut doc, card) = document_with_card();
        let author = Uuid::new_v4();
        doc.create_comment(NewComment::new(card.id, author, "one")).unwrap();
        doc.create_comment(NewComment::new(card.id, author, "two")).unwrap();
        assert_eq!(doc.comments_for(card.id).len(), 2);

        doc.delete_card(card.id).unwrap();
        assert!(doc.comments.is_empty());
        assert!(doc.delete_card(card.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_comment_requires_existing_card() {
        let mut doc = BoardDocument::default();
        let err = doc
            .create_comment(NewComment::new(Uuid::new_v4(), Uuid::new_v4(), "hi"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_comment() {
        let (mut doc, card) = document_with_card();
        let comment = doc
            .create_comment(NewComment::new(card.id, Uuid::new_v4(), "hi"))
            .unwrap();
        doc.delete_comment(comment.id).unwrap();
        assert!(doc.comments_for(card.id).is_empty());
        assert!(doc.delete_comment(comment.id).unwrap_err().is_not_found());
    }
}
