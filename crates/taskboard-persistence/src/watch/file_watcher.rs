use crate::traits::{ChangeDetector, ChangeEvent};
use chrono::Utc;
use notify::{EventKind, RecursiveMode, Watcher};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use taskboard_core::{TaskboardError, TaskboardResult};
use tokio::sync::{broadcast, Mutex};

/// Watches a board file for writes by other processes.
///
/// The parent directory is watched rather than the file itself because the
/// JSON gateway replaces the file by rename; a watch on the old inode would
/// go silent after the first save.
pub struct FileWatcher {
    tx: broadcast::Sender<ChangeEvent>,
    task_handle: Arc<Mutex<Option<tokio::task::JoinHandle<()>>>>,
    watching: Arc<AtomicBool>,
}

impl FileWatcher {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self {
            tx,
            task_handle: Arc::new(Mutex::new(None)),
            watching: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Default for FileWatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn is_write(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}

#[async_trait::async_trait]
impl ChangeDetector for FileWatcher {
    async fn start_watching(&self, path: PathBuf) -> TaskboardResult<()> {
        self.stop_watching().await?;

        let target = tokio::fs::canonicalize(&path).await?;
        let parent = target
            .parent()
            .map(PathBuf::from)
            .ok_or_else(|| TaskboardError::Internal(format!("{} has no parent", target.display())))?;

        let tx = self.tx.clone();
        let watch_path = target.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            match res {
                Ok(event) => {
                    if is_write(&event.kind) && event.paths.iter().any(|p| p == &watch_path) {
                        let _ = tx.send(ChangeEvent {
                            path: watch_path.clone(),
                            detected_at: Utc::now(),
                        });
                    }
                }
                Err(e) => tracing::warn!("File watcher error: {}", e),
            }
        })
        .map_err(|e| TaskboardError::Internal(format!("Failed to create watcher: {e}")))?;
        watcher
            .watch(&parent, RecursiveMode::NonRecursive)
            .map_err(|e| TaskboardError::Internal(format!("Failed to watch {}: {e}", parent.display())))?;

        tracing::info!("Watching {} for external changes", target.display());
        self.watching.store(true, Ordering::SeqCst);

        // The watcher stops when dropped; park it in a task that lives until aborted.
        let handle = tokio::spawn(async move {
            let _watcher = watcher;
            std::future::pending::<()>().await;
        });
        *self.task_handle.lock().await = Some(handle);
        Ok(())
    }

    async fn stop_watching(&self) -> TaskboardResult<()> {
        if let Some(handle) = self.task_handle.lock().await.take() {
            handle.abort();
            tracing::info!("Stopped file watching");
        }
        self.watching.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    fn is_watching(&self) -> bool {
        self.watching.load(Ordering::SeqCst)
    }
}
