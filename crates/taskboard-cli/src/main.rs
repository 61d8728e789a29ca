mod cli;
mod context;
mod handlers;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use context::CliContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("TASKBOARD_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::WARN)
            .init();
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        output::output_error(&format!("{:#}", e));
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut ctx = CliContext::load(&cli).await?;

    match cli.command {
        Commands::Show => handlers::board::handle_show(&ctx),
        Commands::Add(args) => handlers::card::handle_add(&mut ctx, args).await,
        Commands::Move { id, to } => handlers::card::handle_move(&mut ctx, id, to).await,
        Commands::Edit(args) => handlers::card::handle_edit(&mut ctx, args).await,
        Commands::Delete { id } => handlers::card::handle_delete(&mut ctx, id).await,
        Commands::Comments { card_id } => handlers::comment::handle_list(&mut ctx, card_id).await,
        Commands::Comment { card_id, text } => {
            handlers::comment::handle_add(&mut ctx, card_id, &text).await
        }
        Commands::Uncomment {
            card_id,
            comment_id,
        } => handlers::comment::handle_delete(&mut ctx, card_id, comment_id).await,
        Commands::Watch => handlers::board::handle_watch(&mut ctx).await,
    }
}
