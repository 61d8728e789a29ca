use super::{Command, CommandContext, StoreChange};
use crate::{CardId, Comment};
use taskboard_core::TaskboardResult;

/// Replace the loaded comment thread of one card
pub struct SetComments {
    pub card_id: CardId,
    pub comments: Vec<Comment>,
}

impl Command for SetComments {
    fn execute(&self, context: &mut CommandContext) -> TaskboardResult<()> {
        context.comments.insert(self.card_id, self.comments.clone());
        Ok(())
    }

    fn description(&self) -> String {
        format!(
            "Set {} comments for card {}",
            self.comments.len(),
            self.card_id
        )
    }

    fn change(&self) -> StoreChange {
        StoreChange::CommentsSet {
            card_id: self.card_id,
            count: self.comments.len(),
        }
    }
}
