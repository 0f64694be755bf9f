//! Error types for the campaign slug refresh pipeline
//!
//! Provides unified error handling using thiserror. None of these errors
//! ever reach a reader of the slug cache; the coordinator absorbs them.

use thiserror::Error;

// == Refresh Error Enum ==
/// Failure of a single refresh cycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefreshError {
    /// Network failure, timeout or non-success status from the data source
    #[error("Campaign source unavailable: {0}")]
    SourceUnavailable(String),

    /// Payload could not be normalized into a slug set
    #[error("Malformed campaign response: {0}")]
    MalformedResponse(String),

    /// The isolated worker task could not be started or crashed
    #[error("Refresh worker failed: {0}")]
    WorkerDispatchFailure(String),

    /// Provider base URL rejected while building the client at startup
    #[error("Invalid campaign source URL: {0}")]
    InvalidSourceUrl(String),
}

impl RefreshError {
    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            RefreshError::SourceUnavailable(_) => "source_unavailable",
            RefreshError::MalformedResponse(_) => "malformed_response",
            RefreshError::WorkerDispatchFailure(_) => "worker_dispatch_failure",
            RefreshError::InvalidSourceUrl(_) => "invalid_source_url",
        }
    }
}

impl From<reqwest::Error> for RefreshError {
    fn from(err: reqwest::Error) -> Self {
        RefreshError::SourceUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for RefreshError {
    fn from(err: serde_json::Error) -> Self {
        RefreshError::MalformedResponse(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for refresh operations.
pub type Result<T> = std::result::Result<T, RefreshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            RefreshError::SourceUnavailable("x".into()).kind(),
            "source_unavailable"
        );
        assert_eq!(
            RefreshError::MalformedResponse("x".into()).kind(),
            "malformed_response"
        );
        assert_eq!(
            RefreshError::WorkerDispatchFailure("x".into()).kind(),
            "worker_dispatch_failure"
        );
        assert_eq!(
            RefreshError::InvalidSourceUrl("x".into()).kind(),
            "invalid_source_url"
        );
    }

    #[test]
    fn test_serde_error_is_malformed() {
        let err = serde_json::from_str::<Vec<String>>("{not json").unwrap_err();
        let refresh_err: RefreshError = err.into();
        assert!(matches!(refresh_err, RefreshError::MalformedResponse(_)));
    }
}
