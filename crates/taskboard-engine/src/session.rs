use std::collections::HashMap;
use std::sync::Arc;
use taskboard_core::{BoardConfig, Editable, Notice, TaskboardError, TaskboardResult};
use taskboard_domain::{
    BoardGateway, BoardLayout, BoardView, Card, CardDraft, CardId, CardStatus, CardStore, Comment,
    CommentId, DragController, DragOutcome, HoverChange, IdentityProvider, LayoutMetrics,
    MoveIntent, NameResolver, NewComment, ObserverId, Point, ProjectId, StoreObserver,
    TagVocabulary, UserId,
};

use crate::editor::CardEditor;
use crate::names::NameCache;
use crate::sync::{Completion, SyncOutcome, SyncTracker};

/// A comment paired with its author's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    pub comment: Comment,
    pub author_name: String,
}

/// One user's live view of a project board.
///
/// The session owns the store and is its only writer. Pointer input drives
/// the drag controller; committed moves are written to the store at once and
/// persisted in the background, with failures reported through
/// [`BoardSession::poll_sync`] or [`BoardSession::settle`].
pub struct BoardSession {
    project_id: ProjectId,
    gateway: Arc<dyn BoardGateway>,
    identity: Arc<dyn IdentityProvider>,
    store: CardStore,
    drag: DragController,
    sync: SyncTracker,
    editor: Option<CardEditor>,
    names: NameCache,
    vocabulary: TagVocabulary,
    notices: Vec<Notice>,
}

impl BoardSession {
    pub fn new(
        project_id: ProjectId,
        gateway: Arc<dyn BoardGateway>,
        identity: Arc<dyn IdentityProvider>,
        names: Arc<dyn NameResolver>,
        config: &BoardConfig,
    ) -> Self {
        Self {
            project_id,
            sync: SyncTracker::new(gateway.clone()),
            gateway,
            identity,
            store: CardStore::new(),
            drag: DragController::new(config.effective_activation_distance()),
            editor: None,
            names: NameCache::new(names, config.effective_display_id_len()),
            vocabulary: TagVocabulary::from_config(config),
            notices: Vec::new(),
        }
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn view(&self) -> &BoardView {
        self.store.view()
    }

    pub fn store(&self) -> &CardStore {
        &self.store
    }

    pub fn vocabulary(&self) -> &TagVocabulary {
        &self.vocabulary
    }

    pub fn layout(&self, metrics: LayoutMetrics) -> BoardLayout {
        BoardLayout::uniform(self.store.view(), metrics)
    }

    pub fn subscribe(&mut self, observer: impl StoreObserver + 'static) -> ObserverId {
        self.store.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.store.unsubscribe(id)
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, notice: Notice) {
        if notice.is_error() {
            tracing::warn!("{}", notice.message);
        } else {
            tracing::info!("{}", notice.message);
        }
        self.notices.push(notice);
    }

    /// Reloads all cards of the project.
    ///
    /// On failure the local board is kept as-is and a notice is raised.
    /// Moves still awaiting confirmation are re-applied on top of the fetched
    /// cards so an in-flight drag does not flicker back.
    pub async fn refresh(&mut self) -> TaskboardResult<()> {
        let mut cards = match self.gateway.fetch_cards(self.project_id).await {
            Ok(cards) => cards,
            Err(e) => {
                self.notify(Notice::error(
                    format!("Could not load board: {}", e),
                    e.is_retryable(),
                ));
                return Err(e);
            }
        };
        tracing::info!("Loaded {} cards for project {}", cards.len(), self.project_id);

        let unconfirmed: HashMap<CardId, CardStatus> = self.sync.unconfirmed().collect();
        for card in cards.iter_mut() {
            if let Some(&status) = unconfirmed.get(&card.id) {
                card.status = status;
            }
        }
        self.store.replace_all(cards)?;

        if let Some(card_id) = self.open_card_id() {
            if self.store.card(card_id).is_none() {
                tracing::info!("Open card {} no longer exists, closing editor", card_id);
                self.editor = None;
            }
        }
        Ok(())
    }

    // Drag and drop

    pub fn highlight(&self) -> Option<CardStatus> {
        self.drag.highlight()
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Starts a press on a card. Returns false for unknown cards or when a
    /// gesture is already in progress.
    pub fn press(&mut self, card_id: CardId, at: Point) -> bool {
        let Some((origin, _)) = self.store.view().find(card_id) else {
            return false;
        };
        self.drag.press(card_id, origin, at)
    }

    pub fn pointer_move(&mut self, at: Point, layout: &BoardLayout) -> Option<HoverChange> {
        let change = self.drag.pointer_move(at, layout);
        if let Some(change) = change {
            tracing::debug!("Drop target {:?} -> {:?}", change.previous, change.current);
        }
        change
    }

    /// Ends the gesture. A click opens the card; a move is committed to the
    /// store immediately and its persistence is started without waiting.
    pub async fn release(&mut self, at: Point, layout: &BoardLayout) -> TaskboardResult<DragOutcome> {
        let outcome = self.drag.release(at, layout);
        match outcome {
            DragOutcome::Click { card_id } => {
                if let Err(e) = self.open_card(card_id).await {
                    tracing::warn!("Could not open card {}: {}", card_id, e);
                }
            }
            DragOutcome::Move(intent) => self.commit_move(intent)?,
            DragOutcome::NoOp { card_id } => {
                tracing::debug!("Card {} dropped on its own column", card_id);
            }
            DragOutcome::Cancelled { card_id } => {
                tracing::debug!("Drag of card {} cancelled", card_id);
            }
            DragOutcome::Ignored => {}
        }
        Ok(outcome)
    }

    pub fn cancel_drag(&mut self) -> DragOutcome {
        self.drag.cancel()
    }

    fn commit_move(&mut self, intent: MoveIntent) -> TaskboardResult<()> {
        tracing::debug!(
            "Moving card {} from {} to {}",
            intent.card_id,
            intent.from,
            intent.to
        );
        self.store.set_status(intent.card_id, intent.to)?;
        self.sync.dispatch(intent.card_id, intent.from, intent.to);
        Ok(())
    }

    /// Number of drag commits still waiting for storage, in flight or queued.
    pub fn pending_syncs(&self) -> usize {
        self.sync.pending()
    }

    /// Applies every sync result that has already arrived. Never waits.
    pub fn poll_sync(&mut self) -> TaskboardResult<usize> {
        let mut applied = 0;
        while let Some(outcome) = self.sync.try_next() {
            self.apply_sync(outcome)?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Waits for every in-flight drag commit and applies its result.
    pub async fn settle(&mut self) -> TaskboardResult<()> {
        while let Some(outcome) = self.sync.next().await {
            self.apply_sync(outcome)?;
        }
        Ok(())
    }

    fn apply_sync(&mut self, outcome: SyncOutcome) -> TaskboardResult<()> {
        let completion = self.sync.complete(&outcome);
        let pending = outcome.pending;
        match (outcome.result, completion) {
            (Ok(()), _) => {
                tracing::debug!("Card {} saved as {}", pending.card_id, pending.to);
            }
            (Err(e), Completion::Stale) => {
                tracing::debug!(
                    "Ignoring failed move of untracked card {}: {}",
                    pending.card_id,
                    e
                );
            }
            (Err(e), _) if e.is_not_found() => {
                self.store.remove(pending.card_id)?;
                self.close_if_open(pending.card_id);
                self.notify(Notice::info("Card was deleted elsewhere"));
            }
            (Err(e), Completion::Superseded) => {
                tracing::warn!(
                    "Superseded move of card {} to {} failed: {}",
                    pending.card_id,
                    pending.to,
                    e
                );
            }
            (Err(e), Completion::Settled { confirmed }) => {
                let still_moved = self
                    .store
                    .card(pending.card_id)
                    .is_some_and(|c| c.status == pending.to);
                if still_moved && pending.to != confirmed {
                    self.store.set_status(pending.card_id, confirmed)?;
                }
                tracing::error!(
                    "Move of card {} to {} failed, reverted to {}: {}",
                    pending.card_id,
                    pending.to,
                    confirmed,
                    e
                );
                self.notify(Notice::error(
                    format!("Could not move card: {}", e),
                    e.is_retryable(),
                ));
            }
        }
        Ok(())
    }

    // Editor

    pub fn editor(&self) -> Option<&CardEditor> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut CardEditor> {
        self.editor.as_mut()
    }

    pub fn open_card_id(&self) -> Option<CardId> {
        self.editor.as_ref().map(|e| e.card_id)
    }

    /// Opens the editor on a card and loads its comment thread.
    pub async fn open_card(&mut self, card_id: CardId) -> TaskboardResult<()> {
        let card = self
            .store
            .card(card_id)
            .ok_or_else(|| TaskboardError::not_found(format!("card {}", card_id)))?;
        self.editor = Some(CardEditor::open(card));
        tracing::debug!("Opened card {}", card_id);

        if let Err(e) = self.load_comments(card_id).await {
            tracing::debug!("Card {} opened without comments: {}", card_id, e);
        }
        Ok(())
    }

    /// Discards the draft. The store is left untouched.
    pub fn close_card(&mut self) {
        if let Some(editor) = self.editor.take() {
            tracing::debug!("Closed card {}", editor.card_id);
        }
    }

    fn close_if_open(&mut self, card_id: CardId) {
        if self.open_card_id() == Some(card_id) {
            self.editor = None;
        }
    }

    fn fail_editor(&mut self, err: &TaskboardError) {
        if let Some(editor) = self.editor.as_mut() {
            editor.fail(err);
        }
    }

    /// Writes the draft back. On failure the editor stays open with an
    /// inline error and the store is not changed.
    pub async fn save_edit(&mut self) -> TaskboardResult<Card> {
        let Some(editor) = self.editor.as_ref() else {
            return Err(TaskboardError::Internal("no card is open".into()));
        };
        let card_id = editor.card_id;
        let draft = editor.draft.clone();

        if let Err(e) = draft.validate(&self.vocabulary) {
            self.fail_editor(&e);
            return Err(e);
        }
        let Some(card) = self.store.card(card_id).cloned() else {
            let e = TaskboardError::not_found(format!("card {}", card_id));
            self.fail_editor(&e);
            return Err(e);
        };

        let update = draft.diff(&card);
        if !update.is_empty() {
            if let Err(e) = self.gateway.update_card(card_id, update).await {
                tracing::warn!("Saving card {} failed: {}", card_id, e);
                self.fail_editor(&e);
                return Err(e);
            }
        }

        let mut saved = card;
        draft.apply_to(&mut saved);
        self.store.upsert(saved.clone())?;
        self.editor = None;
        tracing::debug!("Saved card {}", card_id);
        Ok(saved)
    }

    /// Deletes a card with its comments. A card that is already gone counts
    /// as deleted.
    pub async fn delete_card(&mut self, card_id: CardId) -> TaskboardResult<()> {
        match self.gateway.delete_card(card_id).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                tracing::debug!("Card {} was already deleted", card_id);
            }
            Err(e) => {
                if self.open_card_id() == Some(card_id) {
                    self.fail_editor(&e);
                } else {
                    self.notify(Notice::error(
                        format!("Could not delete card: {}", e),
                        e.is_retryable(),
                    ));
                }
                return Err(e);
            }
        }

        self.sync.forget(card_id);
        self.store.remove(card_id)?;
        self.close_if_open(card_id);
        tracing::info!("Deleted card {}", card_id);
        Ok(())
    }

    /// Creates a card authored by the current user.
    pub async fn create_card(&mut self, draft: CardDraft) -> TaskboardResult<Card> {
        let Some(user) = self.identity.current_user() else {
            return Err(TaskboardError::validation(
                "created_by",
                "no user is signed in",
            ));
        };
        draft.validate(&self.vocabulary)?;

        let card = self
            .gateway
            .create_card(draft.into_new_card(self.project_id, Some(user)))
            .await?;
        self.store.upsert(card.clone())?;
        tracing::info!("Created card {} in {}", card.id, card.status);
        Ok(card)
    }

    // Comments

    /// Comments of the open card, oldest first.
    pub fn comments(&self) -> &[Comment] {
        match self.open_card_id() {
            Some(card_id) => self.store.comments(card_id),
            None => &[],
        }
    }

    pub fn comment_views(&self) -> Vec<CommentView> {
        self.comments()
            .iter()
            .map(|comment| CommentView {
                author_name: self.names.display_name(comment.author),
                comment: comment.clone(),
            })
            .collect()
    }

    pub fn author_name(&self, user_id: UserId) -> String {
        self.names.display_name(user_id)
    }

    /// Re-fetches the open card's thread. Does nothing when no card is open.
    pub async fn refresh_comments(&mut self) -> TaskboardResult<()> {
        match self.open_card_id() {
            Some(card_id) => self.load_comments(card_id).await,
            None => Ok(()),
        }
    }

    async fn load_comments(&mut self, card_id: CardId) -> TaskboardResult<()> {
        let comments = match self.gateway.fetch_comments(card_id).await {
            Ok(comments) => comments,
            Err(e) => {
                self.notify(Notice::error(
                    format!("Could not load comments: {}", e),
                    e.is_retryable(),
                ));
                return Err(e);
            }
        };

        let authors: Vec<_> = comments.iter().map(|c| c.author).collect();
        self.names.resolve(&authors).await;

        // The thread may have been closed while the fetch was in flight.
        if self.open_card_id() != Some(card_id) {
            return Ok(());
        }
        self.store.set_comments(card_id, comments)?;
        Ok(())
    }

    /// Posts a comment on the open card as the current user, then reloads
    /// the thread.
    pub async fn add_comment(&mut self, text: &str) -> TaskboardResult<Comment> {
        let Some(card_id) = self.open_card_id() else {
            return Err(TaskboardError::validation("card_id", "no card is open"));
        };
        let Some(author) = self.identity.current_user() else {
            return Err(TaskboardError::validation("author", "no user is signed in"));
        };
        let new_comment = NewComment::new(card_id, author, text);
        new_comment.validate()?;

        let comment = match self.gateway.create_comment(new_comment).await {
            Ok(comment) => comment,
            Err(e) => {
                self.notify(Notice::error(
                    format!("Could not post comment: {}", e),
                    e.is_retryable(),
                ));
                return Err(e);
            }
        };

        let mut thread = self.store.comments(card_id).to_vec();
        thread.push(comment.clone());
        self.store.set_comments(card_id, thread)?;
        self.names.resolve(&[author]).await;

        if let Err(e) = self.load_comments(card_id).await {
            tracing::debug!("Keeping local thread of card {}: {}", card_id, e);
        }
        Ok(comment)
    }

    /// Removes a comment. One that is already gone counts as removed.
    pub async fn delete_comment(&mut self, comment_id: CommentId) -> TaskboardResult<()> {
        match self.gateway.delete_comment(comment_id).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                tracing::debug!("Comment {} was already deleted", comment_id);
            }
            Err(e) => {
                self.notify(Notice::error(
                    format!("Could not delete comment: {}", e),
                    e.is_retryable(),
                ));
                return Err(e);
            }
        }

        let Some(card_id) = self.open_card_id() else {
            return Ok(());
        };
        let thread: Vec<Comment> = self
            .store
            .comments(card_id)
            .iter()
            .filter(|c| c.id != comment_id)
            .cloned()
            .collect();
        self.store.set_comments(card_id, thread)?;

        if let Err(e) = self.load_comments(card_id).await {
            tracing::debug!("Keeping local thread of card {}: {}", card_id, e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_domain::NewCard;
    use taskboard_persistence::{InMemoryGateway, StaticDirectory};
    use uuid::Uuid;

    async fn session_with_card(status: CardStatus) -> (BoardSession, InMemoryGateway, CardId) {
        let project = Uuid::new_v4();
        let user = Uuid::new_v4();
        let gateway = InMemoryGateway::new();
        let mut new_card = NewCard::new(project, "Card", Some(user));
        new_card.status = status;
        let card = gateway.create_card(new_card).await.unwrap();

        let directory = Arc::new(StaticDirectory::default().with_current_user(Some(user)));
        let mut session = BoardSession::new(
            project,
            Arc::new(gateway.clone()),
            directory.clone(),
            directory,
            &BoardConfig::default(),
        );
        session.refresh().await.unwrap();
        gateway.clear_calls();
        (session, gateway, card.id)
    }

    #[tokio::test]
    async fn test_press_on_unknown_card_is_refused() {
        let (mut session, _, _) = session_with_card(CardStatus::Todo).await;
        assert!(!session.press(Uuid::new_v4(), Point::new(0.0, 0.0)));
    }

    #[tokio::test]
    async fn test_refresh_reapplies_unconfirmed_move() {
        let (mut session, gateway, card_id) = session_with_card(CardStatus::Todo).await;
        session
            .commit_move(MoveIntent {
                card_id,
                from: CardStatus::Todo,
                to: CardStatus::Done,
                index: 0,
            })
            .unwrap();

        // Refresh before the sync result is applied; storage may still say todo.
        session.refresh().await.unwrap();
        assert_eq!(session.store().card(card_id).unwrap().status, CardStatus::Done);

        session.settle().await.unwrap();
        assert_eq!(session.pending_syncs(), 0);
        assert_eq!(gateway.card(card_id).unwrap().status, CardStatus::Done);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_board_and_notifies() {
        let (mut session, gateway, card_id) = session_with_card(CardStatus::InProgress).await;
        gateway.set_available(false);

        assert!(session.refresh().await.is_err());
        assert!(session.store().card(card_id).is_some());
        assert_eq!(session.notices().len(), 1);
        assert!(session.notices()[0].retryable);
    }

    #[tokio::test]
    async fn test_refresh_closes_editor_of_vanished_card() {
        let (mut session, gateway, card_id) = session_with_card(CardStatus::Todo).await;
        session.open_card(card_id).await.unwrap();
        gateway.delete_card(card_id).await.unwrap();

        session.refresh().await.unwrap();
        assert!(session.editor().is_none());
    }

    #[tokio::test]
    async fn test_move_of_card_deleted_elsewhere_drops_it() {
        let (mut session, gateway, card_id) = session_with_card(CardStatus::Todo).await;
        gateway.delete_card(card_id).await.unwrap();

        session
            .commit_move(MoveIntent {
                card_id,
                from: CardStatus::Todo,
                to: CardStatus::InProgress,
                index: 0,
            })
            .unwrap();
        session.settle().await.unwrap();

        assert!(session.store().card(card_id).is_none());
        assert!(!session.notices()[0].is_error());
    }

    #[tokio::test]
    async fn test_create_card_requires_signed_in_user() {
        let project = Uuid::new_v4();
        let gateway = Arc::new(InMemoryGateway::new());
        let directory = Arc::new(StaticDirectory::default());
        let mut session = BoardSession::new(
            project,
            gateway.clone(),
            directory.clone(),
            directory,
            &BoardConfig::default(),
        );

        let err = session.create_card(CardDraft::new("New")).await.unwrap_err();
        assert_eq!(err.field(), Some("created_by"));
        assert!(gateway.calls().is_empty());
    }
}
