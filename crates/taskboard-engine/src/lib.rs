//! Board session: the single owner of a board's local state.
//!
//! [`BoardSession`] ties the card store, the drag controller and the
//! persistence gateway together. Drag commits are applied optimistically and
//! persisted in the background; edits, deletes and comments are awaited.

pub mod editor;
pub mod names;
pub mod session;
pub mod sync;

pub use editor::{CardEditor, EditorError};
pub use names::NameCache;
pub use session::{BoardSession, CommentView};
pub use sync::{PendingMove, SyncOutcome};
