use pitchside_types::{ClientError, ErrorClass, NormalizedError};
use thiserror::Error;

/// Failure surfaced by workflows and by [`crate::AsyncOperation`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OperationError {
    /// A classified request failure that the caller has not reported yet.
    #[error(transparent)]
    Request(#[from] NormalizedError),

    /// The failure was already shown to the user (field error or workflow
    /// notification); must not be reported again.
    #[error("validation error already reported")]
    AlreadyReported,

    /// Local failure (storage, malformed reply, missing state).
    #[error("{0}")]
    Failed(String),
}

impl OperationError {
    /// Returns `true` for the "already reported" sentinel.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::AlreadyReported)
    }

    #[must_use]
    pub fn class(&self) -> Option<ErrorClass> {
        match self {
            Self::Request(err) => Some(err.class()),
            Self::AlreadyReported => Some(ErrorClass::SentinelSuppressed),
            Self::Failed(_) => None,
        }
    }
}

impl From<ClientError> for OperationError {
    fn from(e: ClientError) -> Self {
        Self::Failed(e.to_string())
    }
}

impl From<serde_json::Error> for OperationError {
    fn from(e: serde_json::Error) -> Self {
        Self::Failed(format!("serialization error: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel() {
        assert!(OperationError::AlreadyReported.is_sentinel());
        assert!(!OperationError::Failed("x".into()).is_sentinel());
        assert_eq!(
            OperationError::AlreadyReported.class(),
            Some(ErrorClass::SentinelSuppressed)
        );
    }

    #[test]
    fn test_request_error_is_transparent() {
        let err: OperationError = NormalizedError::new(Some(404), "Resource not found.").into();
        assert_eq!(err.to_string(), "Resource not found.");
        assert_eq!(err.class(), Some(ErrorClass::HttpStatusFailure));
    }

    #[test]
    fn test_client_error_conversion() {
        let err: OperationError = ClientError::Storage("locked".into()).into();
        assert_eq!(err, OperationError::Failed("storage error: locked".into()));
    }
}
