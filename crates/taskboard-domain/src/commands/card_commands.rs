use super::{Command, CommandContext, StoreChange};
use crate::{Card, CardId, CardStatus};
use taskboard_core::TaskboardResult;

/// Replace every card with a freshly fetched list
pub struct ReplaceCards {
    pub cards: Vec<Card>,
}

impl Command for ReplaceCards {
    fn execute(&self, context: &mut CommandContext) -> TaskboardResult<()> {
        *context.cards = self.cards.clone();
        // Comments of cards that vanished cannot be shown anymore.
        context
            .comments
            .retain(|card_id, _| self.cards.iter().any(|c| c.id == *card_id));
        Ok(())
    }

    fn description(&self) -> String {
        format!("Replace all cards ({})", self.cards.len())
    }

    fn change(&self) -> StoreChange {
        StoreChange::CardsReplaced {
            count: self.cards.len(),
        }
    }
}

/// Insert a card, or overwrite it in place if the id is already present
pub struct UpsertCard {
    pub card: Card,
}

impl Command for UpsertCard {
    fn execute(&self, context: &mut CommandContext) -> TaskboardResult<()> {
        match context.cards.iter_mut().find(|c| c.id == self.card.id) {
            Some(existing) => *existing = self.card.clone(),
            None => context.cards.push(self.card.clone()),
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("Upsert card: '{}'", self.card.name)
    }

    fn change(&self) -> StoreChange {
        StoreChange::CardUpserted {
            card_id: self.card.id,
        }
    }
}

/// Remove a card together with its loaded comments
pub struct RemoveCard {
    pub card_id: CardId,
}

impl Command for RemoveCard {
    fn execute(&self, context: &mut CommandContext) -> TaskboardResult<()> {
        context.cards.retain(|c| c.id != self.card_id);
        context.comments.remove(&self.card_id);
        Ok(())
    }

    fn description(&self) -> String {
        format!("Remove card {}", self.card_id)
    }

    fn change(&self) -> StoreChange {
        StoreChange::CardRemoved {
            card_id: self.card_id,
        }
    }
}

/// Move a card to another column
pub struct SetCardStatus {
    pub card_id: CardId,
    pub status: CardStatus,
}

impl Command for SetCardStatus {
    fn execute(&self, context: &mut CommandContext) -> TaskboardResult<()> {
        if let Some(card) = context.cards.iter_mut().find(|c| c.id == self.card_id) {
            card.move_to(self.status);
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("Move card {} to {}", self.card_id, self.status)
    }

    fn change(&self) -> StoreChange {
        StoreChange::StatusChanged {
            card_id: self.card_id,
            status: self.status,
        }
    }
}
