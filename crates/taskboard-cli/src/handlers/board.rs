use crate::context::CliContext;
use crate::output;
use serde::Serialize;
use taskboard_domain::{BoardView, Card, CardStatus};
use taskboard_persistence::{ChangeDetector, FileWatcher};
use tokio::sync::broadcast::error::RecvError;

#[derive(Serialize)]
pub struct ColumnSummary<'a> {
    pub status: CardStatus,
    pub count: usize,
    pub cards: &'a [Card],
}

#[derive(Serialize)]
pub struct BoardSummary<'a> {
    pub columns: Vec<ColumnSummary<'a>>,
    pub total: usize,
}

pub fn summarize(view: &BoardView) -> BoardSummary<'_> {
    BoardSummary {
        columns: view
            .columns()
            .map(|column| ColumnSummary {
                status: column.status,
                count: column.len(),
                cards: &column.cards,
            })
            .collect(),
        total: view.card_count(),
    }
}

pub fn handle_show(ctx: &CliContext) -> anyhow::Result<()> {
    output::output_success(summarize(ctx.session.view()))
}

/// Prints the board, then reprints it after every external write until
/// interrupted.
pub async fn handle_watch(ctx: &mut CliContext) -> anyhow::Result<()> {
    if ctx.gateway.ensure_exists().await? {
        tracing::info!("Created new board file: {}", ctx.gateway.path().display());
    }

    let watcher = FileWatcher::new();
    let mut changes = watcher.subscribe();
    watcher
        .start_watching(ctx.gateway.path().to_path_buf())
        .await?;
    handle_show(ctx)?;

    loop {
        tokio::select! {
            event = changes.recv() => {
                match event {
                    Ok(event) => tracing::debug!("Change detected at {}", event.detected_at),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!("Coalesced {} change events", skipped)
                    }
                    Err(RecvError::Closed) => break,
                }
                if ctx.session.refresh().await.is_ok() {
                    handle_show(ctx)?;
                }
                for notice in ctx.session.take_notices() {
                    eprintln!("{}", notice.message);
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    watcher.stop_watching().await?;
    Ok(())
}
