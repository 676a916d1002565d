//! Processing errors and their mapping to the HTTP-facing `AppError`.

use assetgate_core::AppError;
use assetgate_storage::StorageError;

use crate::validator::ValidationError;

/// Failures of the crop-rectangle computation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("Invalid dimensions: source {source_width}x{source_height}, target {target_width}x{target_height}")]
    InvalidDimensions {
        source_width: i64,
        source_height: i64,
        target_width: i64,
        target_height: i64,
    },

    #[error("Degenerate crop: {0}")]
    Degenerate(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Scratch staging failed: {0}")]
    Scratch(#[from] std::io::Error),

    #[error("Processing task failed: {0}")]
    Task(String),
}

impl ProcessingError {
    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        ProcessingError::Fetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for ProcessingError {
    fn from(err: tokio::task::JoinError) -> Self {
        ProcessingError::Task(err.to_string())
    }
}

impl From<ProcessingError> for AppError {
    fn from(err: ProcessingError) -> Self {
        let message = err.to_string();
        match err {
            ProcessingError::Geometry(_)
            | ProcessingError::Decode(_)
            | ProcessingError::Encode(_) => AppError::ImageProcessing(message),
            ProcessingError::Storage(StorageError::TooLarge(_)) => {
                AppError::StorageTooLarge(message)
            }
            ProcessingError::Storage(StorageError::InvalidKey(_)) => AppError::InvalidInput(message),
            ProcessingError::Storage(StorageError::NotFound(_)) => AppError::NotFound(message),
            ProcessingError::Storage(_) => AppError::Storage(message),
            ProcessingError::Fetch { .. } => AppError::Fetch(message),
            ProcessingError::Scratch(_) | ProcessingError::Task(_) => AppError::Internal(message),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::FileTooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            _ => AppError::InvalidInput(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetgate_core::ErrorMetadata;

    #[test]
    fn test_geometry_maps_to_bad_request() {
        let err: AppError = ProcessingError::from(GeometryError::Degenerate("0x5".into())).into();
        assert!(matches!(err, AppError::ImageProcessing(_)));
        assert_eq!(err.http_status_code(), 400);
    }

    #[test]
    fn test_storage_too_large_maps_to_413() {
        let err: AppError =
            ProcessingError::from(StorageError::TooLarge("EntityTooLarge".into())).into();
        assert_eq!(err.http_status_code(), 413);
    }

    #[test]
    fn test_fetch_message_names_url() {
        let err = ProcessingError::fetch("https://x.test/a.png", "HTTP 404");
        assert_eq!(err.to_string(), "Failed to fetch https://x.test/a.png: HTTP 404");
        let app: AppError = err.into();
        assert_eq!(app.error_code(), "FETCH_ERROR");
    }
}
