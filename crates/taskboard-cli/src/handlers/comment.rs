use crate::context::CliContext;
use crate::output;
use chrono::{DateTime, Utc};
use serde::Serialize;
use taskboard_engine::CommentView;
use uuid::Uuid;

#[derive(Serialize)]
struct CommentOutput {
    id: Uuid,
    card_id: Uuid,
    author: Uuid,
    author_name: String,
    text: String,
    created_at: DateTime<Utc>,
}

impl From<CommentView> for CommentOutput {
    fn from(view: CommentView) -> Self {
        Self {
            id: view.comment.id,
            card_id: view.comment.card_id,
            author: view.comment.author,
            author_name: view.author_name,
            text: view.comment.text,
            created_at: view.comment.created_at,
        }
    }
}

pub async fn handle_list(ctx: &mut CliContext, card_id: Uuid) -> anyhow::Result<()> {
    ctx.session.open_card(card_id).await?;
    fail_on_error_notice(ctx)?;

    let comments: Vec<CommentOutput> = ctx
        .session
        .comment_views()
        .into_iter()
        .map(CommentOutput::from)
        .collect();
    output::output_list(comments)
}

pub async fn handle_add(ctx: &mut CliContext, card_id: Uuid, text: &str) -> anyhow::Result<()> {
    ctx.session.open_card(card_id).await?;
    let comment = ctx.session.add_comment(text).await?;
    let author_name = ctx.session.author_name(comment.author);
    output::output_success(CommentOutput::from(CommentView {
        comment,
        author_name,
    }))
}

pub async fn handle_delete(
    ctx: &mut CliContext,
    card_id: Uuid,
    comment_id: Uuid,
) -> anyhow::Result<()> {
    ctx.session.open_card(card_id).await?;
    ctx.session.delete_comment(comment_id).await?;
    output::output_success(serde_json::json!({
        "deleted": comment_id.to_string(),
        "remaining": ctx.session.comments().len(),
    }))
}

fn fail_on_error_notice(ctx: &mut CliContext) -> anyhow::Result<()> {
    match ctx.session.take_notices().into_iter().find(|n| n.is_error()) {
        Some(notice) => anyhow::bail!(notice.message),
        None => Ok(()),
    }
}
