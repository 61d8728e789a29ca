use crate::store::atomic_writer::AtomicWriter;
use crate::store::document::{BoardDocument, DOCUMENT_VERSION};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use taskboard_core::{TaskboardError, TaskboardResult};
use taskboard_domain::{
    BoardGateway, Card, CardId, CardUpdate, Comment, CommentId, NewCard, NewComment, ProjectId,
    TagVocabulary,
};
use tokio::sync::Mutex;

/// Gateway storing every project's cards and comments in one JSON file.
///
/// Each operation reads the file, applies the change and writes it back
/// atomically. Calls within one process are serialized; writes from other
/// processes are last-write-wins.
#[derive(Debug)]
pub struct JsonFileGateway {
    path: PathBuf,
    vocabulary: TagVocabulary,
    lock: Mutex<()>,
}

impl JsonFileGateway {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_vocabulary(path, TagVocabulary::default())
    }

    pub fn with_vocabulary(path: impl AsRef<Path>, vocabulary: TagVocabulary) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            vocabulary,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the document; a missing file is an empty board.
    pub async fn load(&self) -> TaskboardResult<BoardDocument> {
        let bytes = AtomicWriter::read_if_exists(&self.path)
            .await
            .map_err(|e| unavailable(&self.path, e))?;
        let Some(bytes) = bytes else {
            return Ok(BoardDocument::default());
        };

        let document: BoardDocument = serde_json::from_slice(&bytes).map_err(|e| {
            TaskboardError::StorageUnavailable(format!(
                "{} is not a valid board file: {}",
                self.path.display(),
                e
            ))
        })?;
        if document.version != DOCUMENT_VERSION {
            return Err(TaskboardError::StorageUnavailable(format!(
                "Unsupported board file version: {}",
                document.version
            )));
        }
        Ok(document)
    }

    /// Writes an empty board if the file does not exist yet. Returns true if
    /// a file was created.
    pub async fn ensure_exists(&self) -> TaskboardResult<bool> {
        let _guard = self.lock.lock().await;
        if tokio::fs::try_exists(&self.path).await? {
            return Ok(false);
        }
        self.store(&BoardDocument::default()).await?;
        Ok(true)
    }

    async fn store(&self, document: &BoardDocument) -> TaskboardResult<()> {
        let bytes = serde_json::to_vec_pretty(document)
            .map_err(|e| TaskboardError::Serialization(e.to_string()))?;
        AtomicWriter::write_atomic(&self.path, &bytes)
            .await
            .map_err(|e| unavailable(&self.path, e))?;
        tracing::info!("Saved {} bytes to {}", bytes.len(), self.path.display());
        Ok(())
    }

    async fn read<R>(&self, f: impl FnOnce(&BoardDocument) -> R) -> TaskboardResult<R> {
        let _guard = self.lock.lock().await;
        let document = self.load().await?;
        Ok(f(&document))
    }

    /// Load, mutate, save. Nothing is written when `f` fails.
    async fn write<R>(
        &self,
        f: impl FnOnce(&mut BoardDocument, &TagVocabulary) -> TaskboardResult<R>,
    ) -> TaskboardResult<R> {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;
        let result = f(&mut document, &self.vocabulary)?;
        self.store(&document).await?;
        Ok(result)
    }
}

fn unavailable(path: &Path, error: TaskboardError) -> TaskboardError {
    match error {
        TaskboardError::Io(e) => {
            TaskboardError::StorageUnavailable(format!("{}: {}", path.display(), e))
        }
        other => other,
    }
}

#[async_trait]
impl BoardGateway for JsonFileGateway {
    async fn fetch_cards(&self, project_id: ProjectId) -> TaskboardResult<Vec<Card>> {
        self.read(|doc| doc.cards_for(project_id)).await
    }

    async fn create_card(&self, card: NewCard) -> TaskboardResult<Card> {
        self.write(|doc, vocab| doc.create_card(card, vocab)).await
    }

    async fn update_card(&self, id: CardId, fields: CardUpdate) -> TaskboardResult<()> {
        self.write(|doc, vocab| doc.update_card(id, &fields, vocab)).await
    }

    async fn delete_card(&self, id: CardId) -> TaskboardResult<()> {
        self.write(|doc, _| doc.delete_card(id)).await
    }

    async fn fetch_comments(&self, card_id: CardId) -> TaskboardResult<Vec<Comment>> {
        self.read(|doc| doc.comments_for(card_id)).await
    }

    async fn create_comment(&self, comment: NewComment) -> TaskboardResult<Comment> {
        self.write(|doc, _| doc.create_comment(comment)).await
    }

    async fn delete_comment(&self, id: CommentId) -> TaskboardResult<()> {
        self.write(|doc, _| doc.delete_comment(id)).await
    }
}
