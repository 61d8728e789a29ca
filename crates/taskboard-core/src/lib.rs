pub mod config;
pub mod error;
pub mod notice;
pub mod result;
pub mod traits;

pub use config::BoardConfig;
pub use error::TaskboardError;
pub use notice::{Notice, NoticeLevel};
pub use result::TaskboardResult;
pub use traits::Editable;
