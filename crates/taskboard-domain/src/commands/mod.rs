use std::collections::HashMap;
use taskboard_core::TaskboardResult;

use crate::{Card, CardId, CardStatus, Comment};

pub mod card_commands;
pub mod comment_commands;

pub use card_commands::*;
pub use comment_commands::*;

/// What a store mutation did, as seen by observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    CardsReplaced { count: usize },
    CardUpserted { card_id: CardId },
    CardRemoved { card_id: CardId },
    StatusChanged { card_id: CardId, status: CardStatus },
    CommentsSet { card_id: CardId, count: usize },
}

/// Trait for store mutations.
/// Every write to the card store is expressed as a command so that all
/// writers share one entry point.
pub trait Command: Send + Sync {
    /// Execute this command, mutating the store contents
    fn execute(&self, context: &mut CommandContext) -> TaskboardResult<()>;

    /// Human-readable description of what this command does
    fn description(&self) -> String;

    /// Change notification published after a successful execute
    fn change(&self) -> StoreChange;
}

/// Mutable view of the store contents handed to commands
pub struct CommandContext<'a> {
    pub cards: &'a mut Vec<Card>,
    pub comments: &'a mut HashMap<CardId, Vec<Comment>>,
}
