use std::collections::HashMap;
use taskboard_core::TaskboardResult;

use crate::board_view::{group_by_column, BoardView};
use crate::commands::{
    Command, CommandContext, RemoveCard, ReplaceCards, SetCardStatus, SetComments, StoreChange,
    UpsertCard,
};
use crate::{Card, CardId, CardStatus, Comment};

/// Receives a notification after every store mutation.
pub trait StoreObserver: Send {
    fn on_change(&self, change: &StoreChange, view: &BoardView);
}

impl<F> StoreObserver for F
where
    F: Fn(&StoreChange, &BoardView) + Send,
{
    fn on_change(&self, change: &StoreChange, view: &BoardView) {
        self(change, view)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Local snapshot of a board's cards and the loaded comment threads.
///
/// The store does no validation. All writes go through [`CardStore::execute`],
/// which rebuilds the board view and notifies observers.
#[derive(Default)]
pub struct CardStore {
    cards: Vec<Card>,
    comments: HashMap<CardId, Vec<Comment>>,
    view: BoardView,
    observers: Vec<(ObserverId, Box<dyn StoreObserver>)>,
    next_observer_id: u64,
}

impl CardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single write entry point.
    pub fn execute(&mut self, command: Box<dyn Command>) -> TaskboardResult<StoreChange> {
        let description = command.description();
        tracing::debug!("Executing: {}", description);

        let mut context = CommandContext {
            cards: &mut self.cards,
            comments: &mut self.comments,
        };
        command.execute(&mut context)?;

        self.view = group_by_column(&self.cards);
        let change = command.change();
        for (_, observer) in &self.observers {
            observer.on_change(&change, &self.view);
        }
        Ok(change)
    }

    pub fn replace_all(&mut self, cards: Vec<Card>) -> TaskboardResult<StoreChange> {
        self.execute(Box::new(ReplaceCards { cards }))
    }

    pub fn upsert(&mut self, card: Card) -> TaskboardResult<StoreChange> {
        self.execute(Box::new(UpsertCard { card }))
    }

    pub fn remove(&mut self, card_id: CardId) -> TaskboardResult<StoreChange> {
        self.execute(Box::new(RemoveCard { card_id }))
    }

    pub fn set_status(&mut self, card_id: CardId, status: CardStatus) -> TaskboardResult<StoreChange> {
        self.execute(Box::new(SetCardStatus { card_id, status }))
    }

    pub fn set_comments(
        &mut self,
        card_id: CardId,
        comments: Vec<Comment>,
    ) -> TaskboardResult<StoreChange> {
        self.execute(Box::new(SetComments { card_id, comments }))
    }

    pub fn subscribe(&mut self, observer: impl StoreObserver + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, card_id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == card_id)
    }

    pub fn comments(&self, card_id: CardId) -> &[Comment] {
        self.comments
            .get(&card_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn has_comments_loaded(&self, card_id: CardId) -> bool {
        self.comments.contains_key(&card_id)
    }

    pub fn view(&self) -> &BoardView {
        &self.view
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
