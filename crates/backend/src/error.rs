//! Application-level error taxonomy.
//!
//! Service entry points return `Result<T, AppError>`. Storage failures are
//! flattened to their message alone; the host request layer decides how each
//! variant maps onto its response surface.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::search::SearchError;

/// Errors surfaced by the service layer.
#[derive(Debug, Error)]
pub enum AppError {
    /// Domain validation failed (e.g. overlapping opening hours).
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Underlying store failed. Only the message is kept.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// A filter date string was not a valid ISO date.
    #[error("invalid date: {0}")]
    InvalidDate(#[from] chrono::ParseError),

    /// Full-text index operation failed.
    #[error("search error: {0}")]
    Search(#[from] SearchError),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("record not found".to_string()),
            other => Self::Persistence(other.to_string()),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = AppError::Validation("overlapping opening hours".to_string());
        assert_eq!(err.to_string(), "validation error: overlapping opening hours");

        let err = AppError::NotFound("shop with id 4 not found".to_string());
        assert_eq!(err.to_string(), "not found: shop with id 4 not found");
    }

    #[test]
    fn test_repository_error_keeps_message_only() {
        let err: AppError = RepositoryError::DataCorruption("bad day index 9".to_string()).into();
        match err {
            AppError::Persistence(msg) => assert!(msg.contains("bad day index 9")),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_repository_not_found_maps_to_not_found() {
        let err: AppError = RepositoryError::NotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
