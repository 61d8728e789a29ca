use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use taskboard_domain::{CardPriority, CardStatus};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "Drive a three-column task board from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the board data file (or set TASKBOARD_FILE env var)
    #[arg(long, short, value_name = "FILE", env = "TASKBOARD_FILE")]
    pub file: PathBuf,

    /// Project whose cards are shown
    #[arg(long, env = "TASKBOARD_PROJECT")]
    pub project: Uuid,

    /// Acting user; overrides `current_user` from the config file
    #[arg(long, env = "TASKBOARD_USER")]
    pub user: Option<Uuid>,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH", env = "TASKBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the board grouped by column
    Show,
    /// Create a card
    Add(AddArgs),
    /// Drag a card onto another column
    Move {
        id: Uuid,
        /// Destination column: todo, in_progress or done
        #[arg(long)]
        to: CardStatus,
    },
    /// Edit a card's fields
    Edit(EditArgs),
    /// Delete a card and its comments
    Delete { id: Uuid },
    /// List a card's comments
    Comments { card_id: Uuid },
    /// Comment on a card
    Comment {
        card_id: Uuid,
        #[arg(long)]
        text: String,
    },
    /// Remove a comment
    Uncomment {
        card_id: Uuid,
        #[arg(long)]
        comment_id: Uuid,
    },
    /// Reload the board whenever the data file changes
    Watch,
}

#[derive(Args)]
pub struct AddArgs {
    pub name: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub priority: Option<CardPriority>,
    /// Tag to attach; may be repeated
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    #[arg(long)]
    pub status: Option<CardStatus>,
}

#[derive(Args)]
pub struct EditArgs {
    pub id: Uuid,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub priority: Option<CardPriority>,
    /// Tag to toggle on or off; may be repeated
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    #[arg(long)]
    pub status: Option<CardStatus>,
}
