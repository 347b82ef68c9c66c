//! Error types for the pitchside workspace.
//!
//! Two families live here:
//! - [`ClientError`] for infrastructure failures (storage, configuration,
//!   serialization) that never reach the UI as-is.
//! - [`NormalizedError`], the single representation every request failure is
//!   turned into before workflows see it.

use crate::FormField;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Enumerates infrastructure error kinds across pitchside crates.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Persistent credential storage failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// JSON serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration loading or validation error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A resource locator could not be resolved against the base URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// HTTP client construction failure.
    #[error("http error: {0}")]
    Http(String),
}

// ── Feature-gated From impls ──────────────────────────────────────────────────

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for ClientError {
    fn from(e: sqlx::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Coarse failure taxonomy shared by the classifier and the workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// No response was received at all.
    NetworkFailure,
    /// A response arrived with a 4xx/5xx status.
    HttpStatusFailure,
    /// The server rejected the input with a (possibly field-typed) message.
    ValidationFailure,
    /// The failure was already reported to the user by the caller.
    SentinelSuppressed,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetworkFailure => write!(f, "network_failure"),
            Self::HttpStatusFailure => write!(f, "http_status_failure"),
            Self::ValidationFailure => write!(f, "validation_failure"),
            Self::SentinelSuppressed => write!(f, "sentinel_suppressed"),
        }
    }
}

/// The classifier's uniform failure representation.
///
/// `message` is always non-empty. `kind` optionally names the form field the
/// failure targets; see [`NormalizedError::field`].
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct NormalizedError {
    /// HTTP status code, absent for pure network failures.
    pub code: Option<u16>,
    /// Human-readable description.
    pub message: String,
    /// Server-supplied error type, usually a form field name.
    pub kind: Option<String>,
    /// The original failure payload, if any.
    pub raw: Option<Value>,
}

/// Fallback used wherever a failure would otherwise carry an empty message.
pub(crate) const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

impl NormalizedError {
    /// Creates an error with the given status code and message.
    ///
    /// An empty `message` is replaced by a generic fallback so the
    /// non-empty invariant always holds.
    pub fn new(code: Option<u16>, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            message
        };
        Self {
            code,
            message,
            kind: None,
            raw: None,
        }
    }

    /// Attach a server-supplied error type.
    #[must_use]
    pub fn with_kind(mut self, kind: Option<String>) -> Self {
        self.kind = kind;
        self
    }

    /// Attach the original failure payload.
    #[must_use]
    pub fn with_raw(mut self, raw: Option<Value>) -> Self {
        self.raw = raw;
        self
    }

    /// Always `false`: a normalized error never represents success.
    #[must_use]
    pub const fn status(&self) -> bool {
        false
    }

    /// The recognized form field this error targets, if any.
    ///
    /// Unknown `kind` values yield `None` and are handled as generic errors.
    #[must_use]
    pub fn field(&self) -> Option<FormField> {
        self.kind.as_deref().and_then(|k| k.parse().ok())
    }

    /// Returns `true` for 401 and 403 responses.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.code, Some(401 | 403))
    }

    /// Network vs HTTP status failure.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        if self.code.is_some() {
            ErrorClass::HttpStatusFailure
        } else {
            ErrorClass::NetworkFailure
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_display() {
        let err = ClientError::Storage("disk full".to_string());
        assert_eq!(err.to_string(), "storage error: disk full");
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<Value>("invalid {{{").unwrap_err();
        let err: ClientError = json_err.into();
        assert!(matches!(err, ClientError::Serialization(_)));
    }

    #[test]
    fn test_empty_message_replaced() {
        let err = NormalizedError::new(Some(418), "   ");
        assert_eq!(err.message, FALLBACK_MESSAGE);
        assert!(!err.status());
    }

    #[test]
    fn test_display_is_message() {
        let err = NormalizedError::new(Some(404), "Resource not found.");
        assert_eq!(err.to_string(), "Resource not found.");
    }

    #[test]
    fn test_field_resolution() {
        let err = NormalizedError::new(Some(400), "taken").with_kind(Some("email".into()));
        assert_eq!(err.field(), Some(FormField::Email));

        let err = NormalizedError::new(Some(400), "nope").with_kind(Some("unknown".into()));
        assert_eq!(err.field(), None);
    }

    #[test]
    fn test_class_and_auth() {
        let network = NormalizedError::new(None, "offline");
        assert_eq!(network.class(), ErrorClass::NetworkFailure);
        assert!(!network.is_auth_failure());

        let forbidden = NormalizedError::new(Some(403), "no");
        assert_eq!(forbidden.class(), ErrorClass::HttpStatusFailure);
        assert!(forbidden.is_auth_failure());
        assert!(NormalizedError::new(Some(401), "no").is_auth_failure());
        assert!(!NormalizedError::new(Some(500), "no").is_auth_failure());
    }
}
