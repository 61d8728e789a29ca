use crate::store::document::BoardDocument;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use taskboard_core::{TaskboardError, TaskboardResult};
use taskboard_domain::{
    BoardGateway, Card, CardId, CardUpdate, Comment, CommentId, NewCard, NewComment, ProjectId,
    TagVocabulary,
};

/// Gateway operations, used to target injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOp {
    FetchCards,
    CreateCard,
    UpdateCard,
    DeleteCard,
    FetchComments,
    CreateComment,
    DeleteComment,
}

/// A recorded gateway invocation with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    FetchCards(ProjectId),
    CreateCard(NewCard),
    UpdateCard(CardId, CardUpdate),
    DeleteCard(CardId),
    FetchComments(CardId),
    CreateComment(NewComment),
    DeleteComment(CommentId),
}

impl GatewayCall {
    pub fn op(&self) -> GatewayOp {
        match self {
            GatewayCall::FetchCards(_) => GatewayOp::FetchCards,
            GatewayCall::CreateCard(_) => GatewayOp::CreateCard,
            GatewayCall::UpdateCard(..) => GatewayOp::UpdateCard,
            GatewayCall::DeleteCard(_) => GatewayOp::DeleteCard,
            GatewayCall::FetchComments(_) => GatewayOp::FetchComments,
            GatewayCall::CreateComment(_) => GatewayOp::CreateComment,
            GatewayCall::DeleteComment(_) => GatewayOp::DeleteComment,
        }
    }
}

#[derive(Default)]
struct Inner {
    document: BoardDocument,
    calls: Vec<GatewayCall>,
    unavailable: bool,
    failures: HashMap<GatewayOp, VecDeque<TaskboardError>>,
}

/// Process-local gateway backed by a shared document.
///
/// Clones share state, so a test can keep a handle while the session owns
/// another. Every call is recorded, and failures can be injected either
/// globally (`set_available(false)`) or for the next call of one operation.
#[derive(Clone, Default)]
pub struct InMemoryGateway {
    inner: Arc<Mutex<Inner>>,
    vocabulary: TagVocabulary,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vocabulary(vocabulary: TagVocabulary) -> Self {
        Self {
            inner: Arc::default(),
            vocabulary,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seeds a card directly, bypassing validation and call recording.
    pub fn insert_card(&self, card: Card) {
        self.lock().document.cards.push(card);
    }

    pub fn insert_comment(&self, comment: Comment) {
        self.lock().document.comments.push(comment);
    }

    pub fn cards(&self) -> Vec<Card> {
        self.lock().document.cards.clone()
    }

    pub fn card(&self, id: CardId) -> Option<Card> {
        self.lock().document.cards.iter().find(|c| c.id == id).cloned()
    }

    pub fn comments(&self) -> Vec<Comment> {
        self.lock().document.comments.clone()
    }

    pub fn set_available(&self, available: bool) {
        self.lock().unavailable = !available;
    }

    /// Makes the next call of `op` fail with `error`.
    pub fn fail_next(&self, op: GatewayOp, error: TaskboardError) {
        self.lock().failures.entry(op).or_default().push_back(error);
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.lock().calls.clone()
    }

    pub fn calls_of(&self, op: GatewayOp) -> Vec<GatewayCall> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.op() == op)
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Records the call and runs `f` against the document unless a failure
    /// is pending.
    fn dispatch<R>(
        &self,
        call: GatewayCall,
        f: impl FnOnce(&mut BoardDocument, &TagVocabulary) -> TaskboardResult<R>,
    ) -> TaskboardResult<R> {
        let mut inner = self.lock();
        let op = call.op();
        inner.calls.push(call);

        if let Some(error) = inner.failures.get_mut(&op).and_then(VecDeque::pop_front) {
            tracing::debug!("Injected failure for {:?}: {}", op, error);
            return Err(error);
        }
        if inner.unavailable {
            return Err(TaskboardError::StorageUnavailable(
                "in-memory backend is offline".to_string(),
            ));
        }
        f(&mut inner.document, &self.vocabulary)
    }
}

#[async_trait]
impl BoardGateway for InMemoryGateway {
    async fn fetch_cards(&self, project_id: ProjectId) -> TaskboardResult<Vec<Card>> {
        self.dispatch(GatewayCall::FetchCards(project_id), |doc, _| {
            Ok(doc.cards_for(project_id))
        })
    }

    async fn create_card(&self, card: NewCard) -> TaskboardResult<Card> {
        self.dispatch(GatewayCall::CreateCard(card.clone()), |doc, vocab| {
            doc.create_card(card, vocab)
        })
    }

    async fn update_card(&self, id: CardId, fields: CardUpdate) -> TaskboardResult<()> {
        self.dispatch(GatewayCall::UpdateCard(id, fields.clone()), |doc, vocab| {
            doc.update_card(id, &fields, vocab)
        })
    }

    async fn delete_card(&self, id: CardId) -> TaskboardResult<()> {
        self.dispatch(GatewayCall::DeleteCard(id), |doc, _| doc.delete_card(id))
    }

    async fn fetch_comments(&self, card_id: CardId) -> TaskboardResult<Vec<Comment>> {
        self.dispatch(GatewayCall::FetchComments(card_id), |doc, _| {
            Ok(doc.comments_for(card_id))
        })
    }

    async fn create_comment(&self, comment: NewComment) -> TaskboardResult<Comment> {
        self.dispatch(GatewayCall::CreateComment(comment.clone()), |doc, _| {
            doc.create_comment(comment)
        })
    }

    async fn delete_comment(&self, id: CommentId) -> TaskboardResult<()> {
        self.dispatch(GatewayCall::DeleteComment(id), |doc, _| doc.delete_comment(id))
    }
}
