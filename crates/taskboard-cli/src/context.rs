use std::sync::Arc;
use taskboard_core::BoardConfig;
use taskboard_domain::TagVocabulary;
use taskboard_engine::BoardSession;
use taskboard_persistence::{JsonFileGateway, StaticDirectory};

use crate::cli::Cli;

/// Everything a subcommand needs: a loaded session over the board file.
pub struct CliContext {
    pub session: BoardSession,
    pub gateway: Arc<JsonFileGateway>,
}

impl CliContext {
    pub async fn load(cli: &Cli) -> anyhow::Result<Self> {
        let config = match &cli.config {
            Some(path) => BoardConfig::load_from(path),
            None => BoardConfig::load(),
        };

        let gateway = Arc::new(JsonFileGateway::with_vocabulary(
            &cli.file,
            TagVocabulary::from_config(&config),
        ));
        let directory =
            Arc::new(StaticDirectory::from_config(&config).with_current_user(cli.user));

        let mut session = BoardSession::new(
            cli.project,
            gateway.clone(),
            directory.clone(),
            directory,
            &config,
        );
        session.refresh().await?;
        tracing::debug!(
            "Loaded project {} from {}",
            cli.project,
            cli.file.display()
        );

        Ok(Self { session, gateway })
    }
}
