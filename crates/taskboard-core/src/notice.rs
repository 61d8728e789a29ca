use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A non-blocking message for the user (toast / status line).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub timestamp: DateTime<Utc>,
    pub level: NoticeLevel,
    pub message: String,
    #[serde(default)]
    pub retryable: bool,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level: NoticeLevel::Info,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn error(message: impl Into<String>, retryable: bool) -> Self {
        Self {
            timestamp: Utc::now(),
            level: NoticeLevel::Error,
            message: message.into(),
            retryable,
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}
