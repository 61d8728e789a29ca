use async_trait::async_trait;
use std::collections::HashMap;
use taskboard_core::TaskboardResult;

use crate::{Card, CardId, CardUpdate, Comment, CommentId, NewCard, NewComment, ProjectId, UserId};

/// The only path to durable storage for cards and comments.
///
/// Implementations must be safe to call from spawned tasks: the board
/// session issues drag commits without awaiting them inline.
#[async_trait]
pub trait BoardGateway: Send + Sync {
    /// All cards of a project. An empty list is a valid board, not an error.
    async fn fetch_cards(&self, project_id: ProjectId) -> TaskboardResult<Vec<Card>>;

    /// Persists a new card; storage assigns the id.
    async fn create_card(&self, card: NewCard) -> TaskboardResult<Card>;

    /// Partial update. Last write wins; there is no concurrency token.
    async fn update_card(&self, id: CardId, fields: CardUpdate) -> TaskboardResult<()>;

    /// Deletes a card and every comment attached to it.
    async fn delete_card(&self, id: CardId) -> TaskboardResult<()>;

    async fn fetch_comments(&self, card_id: CardId) -> TaskboardResult<Vec<Comment>>;

    async fn create_comment(&self, comment: NewComment) -> TaskboardResult<Comment>;

    async fn delete_comment(&self, id: CommentId) -> TaskboardResult<()>;
}

/// Who is using the board right now.
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<UserId>;
}

/// Best-effort lookup of display names for user ids.
#[async_trait]
pub trait NameResolver: Send + Sync {
    async fn resolve_names(&self, ids: &[UserId]) -> TaskboardResult<HashMap<UserId, String>>;
}
