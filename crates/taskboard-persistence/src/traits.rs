use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use taskboard_core::TaskboardResult;

/// Detects writes to board storage made outside this session, so the
/// session can reconcile with a fresh fetch.
#[async_trait]
pub trait ChangeDetector: Send + Sync {
    async fn start_watching(&self, path: PathBuf) -> TaskboardResult<()>;

    async fn stop_watching(&self) -> TaskboardResult<()>;

    /// Receiver yielding one `ChangeEvent` per observed write.
    fn subscribe(&self) -> tokio::sync::broadcast::Receiver<ChangeEvent>;

    fn is_watching(&self) -> bool;
}

#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub detected_at: DateTime<Utc>,
}
