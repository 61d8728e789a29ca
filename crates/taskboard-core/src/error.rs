use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskboardError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Validation error on '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TaskboardError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::NotFound(what.to_string())
    }

    /// Backend failures may succeed on retry; malformed input never will.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_) | Self::Io(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// The offending field for validation failures.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_carries_field() {
        let err = TaskboardError::validation("name", "must not be blank");
        assert_eq!(err.field(), Some("name"));
        assert_eq!(
            err.to_string(),
            "Validation error on 'name': must not be blank"
        );
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_storage_errors_are_retryable() {
        assert!(TaskboardError::StorageUnavailable("offline".into()).is_retryable());
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert!(TaskboardError::from(io).is_retryable());
        assert!(!TaskboardError::not_found("card").is_retryable());
    }

    #[test]
    fn test_not_found_helper() {
        let err = TaskboardError::not_found("card 42");
        assert!(err.is_not_found());
        assert_eq!(err.field(), None);
        assert_eq!(err.to_string(), "Not found: card 42");
    }
}
