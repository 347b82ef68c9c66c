//! Error classifier: the single chokepoint turning transport failures into
//! [`NormalizedError`]s.

use crate::Session;
use pitchside_types::{NormalizedError, TransportError};
use serde_json::Value;

/// Message used when no response was received at all.
pub const NETWORK_MESSAGE: &str = "Network error! Please check your connection.";

/// Message used when the request body could not be encoded.
pub const INVALID_PAYLOAD_MESSAGE: &str = "Invalid request! Please check the submitted data.";

/// Default human-readable message for an HTTP status code.
#[must_use]
pub fn default_message(status: u16) -> &'static str {
    match status {
        400 => "Bad request! Please check your input.",
        401 => "Unauthorized! Please log in again.",
        403 => "Forbidden! You do not have access to this resource.",
        404 => "Resource not found.",
        408 => "Request timeout! Please try again.",
        429 => "Too many requests! Please slow down.",
        500 => "Server error! Please try again later.",
        502 => "Bad gateway! Please try again later.",
        503 => "Service unavailable! Please try again later.",
        _ => "Something went wrong. Please try again.",
    }
}

/// Classify without side effects.
///
/// The payload's own `message` (a string, or the `message` of a
/// `{type, message}` object) takes precedence over the status table.
#[must_use]
pub fn normalize(err: TransportError) -> NormalizedError {
    if err.invalid_payload {
        return NormalizedError::new(None, INVALID_PAYLOAD_MESSAGE);
    }
    let Some(response) = err.response else {
        return NormalizedError::new(None, NETWORK_MESSAGE);
    };
    let data = response.data;
    let message =
        payload_message(&data).unwrap_or_else(|| default_message(response.status).to_string());
    let raw = if data.is_null() { None } else { Some(data) };
    let kind = raw.as_ref().and_then(payload_kind);
    NormalizedError::new(Some(response.status), message)
        .with_kind(kind)
        .with_raw(raw)
}

/// Classify a transport failure and apply the authorization side effect.
///
/// On 401/403 the session is expired (credential removed, redirect to the
/// login path) no matter which call site triggered the request. Never fails.
pub async fn classify(err: TransportError, session: &Session) -> NormalizedError {
    let normalized = normalize(err);
    if normalized.is_auth_failure() {
        session.expire().await;
    }
    normalized
}

fn payload_message(data: &Value) -> Option<String> {
    let text = match data.get("message")? {
        Value::String(s) => s.as_str(),
        Value::Object(obj) => obj.get("message")?.as_str()?,
        _ => return None,
    };
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn payload_kind(data: &Value) -> Option<String> {
    data.get("type")
        .or_else(|| data.get("message").and_then(|m| m.get("type")))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingNavigator;
    use pitchside_config::SessionConfig;
    use pitchside_store::InMemoryCredentialStore;
    use pitchside_types::CredentialStore as _;
    use serde_json::json;
    use std::sync::Arc;

    const TABLE: [u16; 9] = [400, 401, 403, 404, 408, 429, 500, 502, 503];

    #[test]
    fn test_network_failure_has_no_code() {
        let err = normalize(TransportError::network("connection refused"));
        assert_eq!(err.code, None);
        assert_eq!(err.message, NETWORK_MESSAGE);
        assert!(err.kind.is_none());
        assert!(err.raw.is_none());
    }

    #[test]
    fn test_invalid_payload_is_not_a_network_failure() {
        let err = normalize(TransportError::invalid_payload("invalid mime type for avatar"));
        assert_eq!(err.code, None);
        assert_eq!(err.message, INVALID_PAYLOAD_MESSAGE);
        assert_ne!(err.message, NETWORK_MESSAGE);
    }

    #[test]
    fn test_table_defaults_without_payload_message() {
        for status in TABLE {
            let err = normalize(TransportError::status(status, Value::Null));
            assert_eq!(err.code, Some(status));
            assert_eq!(err.message, default_message(status));
        }
    }

    #[test]
    fn test_payload_message_preferred() {
        for status in TABLE {
            let err = normalize(TransportError::status(
                status,
                json!({ "message": "Team name already exists" }),
            ));
            assert_eq!(err.message, "Team name already exists");
        }
    }

    #[test]
    fn test_server_error_without_body() {
        let err = normalize(TransportError::status(500, Value::Null));
        assert_eq!(err.code, Some(500));
        assert_eq!(err.message, "Server error! Please try again later.");
    }

    #[test]
    fn test_unknown_status_falls_back() {
        let err = normalize(TransportError::status(418, json!("teapot")));
        assert_eq!(err.message, "Something went wrong. Please try again.");
        assert_eq!(err.raw, Some(json!("teapot")));
    }

    #[test]
    fn test_blank_payload_message_uses_table() {
        let err = normalize(TransportError::status(404, json!({ "message": "  " })));
        assert_eq!(err.message, "Resource not found.");
    }

    #[test]
    fn test_kind_from_top_level_type() {
        let err = normalize(TransportError::status(
            409,
            json!({ "type": "email", "message": "Email already registered" }),
        ));
        assert_eq!(err.kind.as_deref(), Some("email"));
        assert_eq!(err.message, "Email already registered");
    }

    #[test]
    fn test_kind_from_typed_message() {
        let payload = json!({
            "status": false,
            "message": { "type": "userName", "message": "Username taken" }
        });
        let err = normalize(TransportError::status(400, payload.clone()));
        assert_eq!(err.kind.as_deref(), Some("userName"));
        assert_eq!(err.message, "Username taken");
        assert_eq!(err.raw, Some(payload));
    }

    async fn signed_in() -> (Session, Arc<InMemoryCredentialStore>, Arc<RecordingNavigator>) {
        let store = Arc::new(InMemoryCredentialStore::new());
        let nav = Arc::new(RecordingNavigator::default());
        let session = Session::new(store.clone(), nav.clone(), &SessionConfig::default());
        session.sign_in("tok").await.unwrap();
        (session, store, nav)
    }

    #[tokio::test]
    async fn test_auth_failures_force_logout() {
        for status in [401, 403] {
            let (session, store, nav) = signed_in().await;
            let err = classify(TransportError::status(status, Value::Null), &session).await;
            assert_eq!(err.code, Some(status));
            assert!(store.get("token").await.unwrap().is_none());
            assert!(!session.is_authenticated());
            assert_eq!(nav.paths(), vec!["/login".to_string()]);
        }
    }

    #[tokio::test]
    async fn test_other_failures_keep_session() {
        for status in [400, 404, 408, 429, 500, 502, 503] {
            let (session, store, nav) = signed_in().await;
            classify(TransportError::status(status, Value::Null), &session).await;
            assert_eq!(store.get("token").await.unwrap().as_deref(), Some("tok"));
            assert!(nav.paths().is_empty());
        }
        let (session, _, nav) = signed_in().await;
        classify(TransportError::network("down"), &session).await;
        assert!(session.is_authenticated());
        assert!(nav.paths().is_empty());
    }
}
