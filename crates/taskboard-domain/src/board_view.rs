use serde::Serialize;

use crate::card::{Card, CardId, CardStatus};

/// Cards of one column, in store order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnView {
    pub status: CardStatus,
    pub cards: Vec<Card>,
}

impl ColumnView {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn position_of(&self, card_id: CardId) -> Option<usize> {
        self.cards.iter().position(|c| c.id == card_id)
    }
}

/// Per-column projection of the card store. Always rebuilt from the store,
/// never edited directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    columns: [ColumnView; 3],
}

impl Default for BoardView {
    fn default() -> Self {
        Self {
            columns: CardStatus::ALL.map(|status| ColumnView {
                status,
                cards: Vec::new(),
            }),
        }
    }
}

impl BoardView {
    pub fn column(&self, status: CardStatus) -> &ColumnView {
        &self.columns[status.order()]
    }

    pub fn columns(&self) -> impl Iterator<Item = &ColumnView> {
        self.columns.iter()
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(ColumnView::len).sum()
    }

    pub fn find(&self, card_id: CardId) -> Option<(CardStatus, usize)> {
        self.columns
            .iter()
            .find_map(|col| col.position_of(card_id).map(|idx| (col.status, idx)))
    }
}

pub fn group_by_column(cards: &[Card]) -> BoardView {
    let mut view = BoardView::default();
    for card in cards {
        view.columns[card.status.order()].cards.push(card.clone());
    }
    view
}
