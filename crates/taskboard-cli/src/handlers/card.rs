use crate::cli::{AddArgs, EditArgs};
use crate::context::CliContext;
use crate::output;
use serde::Serialize;
use taskboard_domain::{Card, CardDraft, CardId, CardStatus, DragOutcome, LayoutMetrics};
use uuid::Uuid;

#[derive(Serialize)]
struct MoveResult {
    card: Card,
    moved: bool,
}

pub async fn handle_add(ctx: &mut CliContext, args: AddArgs) -> anyhow::Result<()> {
    let mut draft = CardDraft::new(args.name);
    if let Some(description) = args.description {
        draft.description = description;
    }
    if let Some(priority) = args.priority {
        draft.priority = priority;
    }
    if let Some(status) = args.status {
        draft.status = status;
    }
    for tag in &args.tags {
        draft.toggle_tag(tag);
    }

    let card = ctx.session.create_card(draft).await?;
    output::output_success(&card)
}

/// Moves a card the way a pointer would: press on the card, drag to the
/// middle of the destination column and release.
pub async fn handle_move(ctx: &mut CliContext, id: Uuid, to: CardStatus) -> anyhow::Result<()> {
    let layout = ctx.session.layout(LayoutMetrics::default());
    let start = layout
        .card_region(id)
        .map(|region| region.rect.center())
        .ok_or_else(|| anyhow::anyhow!("Card not found: {}", id))?;
    let target = layout
        .column_region(to)
        .map(|region| region.rect.center())
        .ok_or_else(|| anyhow::anyhow!("No column for {}", to))?;

    if !ctx.session.press(id, start) {
        anyhow::bail!("Card {} cannot be dragged right now", id);
    }
    ctx.session.pointer_move(target, &layout);
    let outcome = ctx.session.release(target, &layout).await?;
    ctx.session.settle().await?;

    if let Some(notice) = ctx.session.take_notices().into_iter().find(|n| n.is_error()) {
        anyhow::bail!(notice.message);
    }

    let moved = matches!(outcome, DragOutcome::Move(_));
    let card = current_card(ctx, id)?;
    output::output_success(MoveResult { card, moved })
}

pub async fn handle_edit(ctx: &mut CliContext, args: EditArgs) -> anyhow::Result<()> {
    ctx.session.open_card(args.id).await?;
    let editor = ctx
        .session
        .editor_mut()
        .ok_or_else(|| anyhow::anyhow!("Card {} could not be opened", args.id))?;

    if let Some(name) = args.name {
        editor.draft.name = name;
    }
    if let Some(description) = args.description {
        editor.draft.description = description;
    }
    if let Some(priority) = args.priority {
        editor.draft.priority = priority;
    }
    if let Some(status) = args.status {
        editor.draft.status = status;
    }
    for tag in &args.tags {
        editor.draft.toggle_tag(tag);
    }

    let card = ctx.session.save_edit().await?;
    output::output_success(&card)
}

pub async fn handle_delete(ctx: &mut CliContext, id: Uuid) -> anyhow::Result<()> {
    ctx.session.delete_card(id).await?;
    output::output_success(serde_json::json!({"deleted": id.to_string()}))
}

fn current_card(ctx: &CliContext, id: CardId) -> anyhow::Result<Card> {
    ctx.session
        .store()
        .card(id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Card not found: {}", id))
}
