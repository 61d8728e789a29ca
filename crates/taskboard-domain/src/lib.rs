pub mod board_view;
pub mod card;
pub mod commands;
pub mod comment;
pub mod drag;
pub mod editable;
pub mod field_update;
pub mod gateway;
pub mod geometry;
pub mod placement;
pub mod store;
pub mod tag;

pub use board_view::{group_by_column, BoardView, ColumnView};
pub use card::{Card, CardId, CardPriority, CardStatus, NewCard, ProjectId, UserId};
pub use commands::{Command, CommandContext, StoreChange};
pub use comment::{Comment, CommentId, NewComment};
pub use drag::{DragController, DragOutcome, DragPhase, HoverChange, MoveIntent};
pub use editable::CardDraft;
pub use field_update::CardUpdate;
pub use gateway::{BoardGateway, IdentityProvider, NameResolver};
pub use geometry::{Point, Rect};
pub use placement::{
    resolve_placement, BoardLayout, CardRegion, ColumnRegion, LayoutMetrics, Placement,
};
pub use store::{CardStore, ObserverId, StoreObserver};
pub use tag::TagVocabulary;
