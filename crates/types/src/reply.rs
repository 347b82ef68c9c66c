//! Server reply shape and its tagged-union interpretation.
//!
//! Mutation endpoints answer with `{ status, message, data? }` where `message`
//! is either a plain string or a `{ type, message }` object naming the form
//! field at fault. [`ServerReply::into_outcome`] turns that duck-typed shape
//! into [`MutationOutcome`].

use crate::{
    FormField, NormalizedError,
    error::{FALLBACK_MESSAGE, Result},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `message` member of a server reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReplyMessage {
    Text(String),
    Typed {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default)]
        message: String,
    },
}

impl ReplyMessage {
    /// The human-readable text, regardless of shape.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Typed { message: text, .. } => text,
        }
    }

    /// The error type, present only for typed messages.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::Typed { kind, .. } => Some(kind),
        }
    }
}

/// Raw mutation reply as sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerReply {
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<ReplyMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Why the server refused a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The failure concerns a single recognized form field.
    Field { field: FormField, message: String },
    /// Any other refusal; `message` is `None` when the server gave none.
    Generic { message: Option<String> },
}

impl Rejection {
    /// The server-supplied message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Field { message, .. } => Some(message),
            Self::Generic { message } => message.as_deref(),
        }
    }

    /// Recover a structured rejection from a classified request failure.
    ///
    /// Returns `Some` when the failure payload is itself a `status: false`
    /// reply, or when the classifier already resolved a known field. Pure
    /// transport failures (no payload, HTML error pages, ...) yield `None`.
    #[must_use]
    pub fn from_error(err: &NormalizedError) -> Option<Self> {
        if let Some(raw) = &err.raw
            && let Ok(reply) = serde_json::from_value::<ServerReply>(raw.clone())
            && !reply.status
            && let MutationOutcome::Rejected(rejection) = reply.into_outcome()
        {
            return Some(rejection);
        }
        err.field().map(|field| Self::Field {
            field,
            message: err.message.clone(),
        })
    }
}

/// Interpreted result of a mutation call.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    Accepted { data: Value },
    Rejected(Rejection),
}

impl MutationOutcome {
    /// Interpret a successful transport payload as a mutation reply.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ClientError::Serialization`] if the payload is not a
    /// reply object.
    pub fn from_value(value: Value) -> Result<Self> {
        let reply: ServerReply = serde_json::from_value(value)?;
        Ok(reply.into_outcome())
    }
}

impl ServerReply {
    /// Convert the duck-typed reply into a [`MutationOutcome`].
    #[must_use]
    pub fn into_outcome(self) -> MutationOutcome {
        if self.status {
            return MutationOutcome::Accepted {
                data: self.data.unwrap_or(Value::Null),
            };
        }
        let rejection = match self.message {
            Some(ReplyMessage::Typed { kind, message }) => match kind.parse::<FormField>() {
                Ok(field) => Rejection::Field {
                    field,
                    message: non_empty(message).unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
                },
                Err(_) => Rejection::Generic {
                    message: non_empty(message),
                },
            },
            Some(ReplyMessage::Text(message)) => Rejection::Generic {
                message: non_empty(message),
            },
            None => Rejection::Generic { message: None },
        };
        MutationOutcome::Rejected(rejection)
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepted_reply() {
        let outcome = MutationOutcome::from_value(json!({
            "status": true,
            "message": "ok",
            "data": { "token": "abc" }
        }))
        .unwrap();
        assert_eq!(
            outcome,
            MutationOutcome::Accepted {
                data: json!({ "token": "abc" })
            }
        );
    }

    #[test]
    fn test_accepted_without_data_is_null() {
        let outcome = MutationOutcome::from_value(json!({ "status": true })).unwrap();
        assert_eq!(outcome, MutationOutcome::Accepted { data: Value::Null });
    }

    #[test]
    fn test_typed_field_rejection() {
        let outcome = MutationOutcome::from_value(json!({
            "status": false,
            "message": { "type": "password", "message": "Incorrect password" }
        }))
        .unwrap();
        assert_eq!(
            outcome,
            MutationOutcome::Rejected(Rejection::Field {
                field: FormField::Password,
                message: "Incorrect password".into()
            })
        );
    }

    #[test]
    fn test_typed_field_rejection_without_text_gets_fallback() {
        let outcome = MutationOutcome::from_value(json!({
            "status": false,
            "message": { "type": "email" }
        }))
        .unwrap();
        let MutationOutcome::Rejected(rejection) = outcome else {
            panic!("expected rejection");
        };
        assert_eq!(
            rejection,
            Rejection::Field {
                field: FormField::Email,
                message: FALLBACK_MESSAGE.into()
            }
        );
        assert!(!rejection.message().unwrap().trim().is_empty());
    }

    #[test]
    fn test_typed_unknown_rejection_is_generic() {
        let outcome = MutationOutcome::from_value(json!({
            "status": false,
            "message": { "type": "unknown", "message": "Account locked" }
        }))
        .unwrap();
        assert_eq!(
            outcome,
            MutationOutcome::Rejected(Rejection::Generic {
                message: Some("Account locked".into())
            })
        );
    }

    #[test]
    fn test_plain_text_rejection() {
        let outcome = MutationOutcome::from_value(json!({
            "status": false,
            "message": "Tournament is closed"
        }))
        .unwrap();
        let MutationOutcome::Rejected(rejection) = outcome else {
            panic!("expected rejection");
        };
        assert_eq!(rejection.message(), Some("Tournament is closed"));
    }

    #[test]
    fn test_missing_message_rejection() {
        let outcome = MutationOutcome::from_value(json!({ "status": false })).unwrap();
        assert_eq!(
            outcome,
            MutationOutcome::Rejected(Rejection::Generic { message: None })
        );
    }

    #[test]
    fn test_non_reply_payload_errors() {
        assert!(MutationOutcome::from_value(json!([1, 2, 3])).is_err());
    }

    #[test]
    fn test_rejection_from_error_payload() {
        let err = NormalizedError::new(Some(400), "Phone already in use").with_raw(Some(json!({
            "status": false,
            "message": { "type": "phoneNumber", "message": "Phone already in use" }
        })));
        assert_eq!(
            Rejection::from_error(&err),
            Some(Rejection::Field {
                field: FormField::Phone,
                message: "Phone already in use".into()
            })
        );
    }

    #[test]
    fn test_rejection_from_error_kind_only() {
        let err = NormalizedError::new(Some(409), "Email taken")
            .with_kind(Some("email".into()))
            .with_raw(Some(json!({ "type": "email", "message": "Email taken" })));
        assert_eq!(
            Rejection::from_error(&err),
            Some(Rejection::Field {
                field: FormField::Email,
                message: "Email taken".into()
            })
        );
    }

    #[test]
    fn test_transport_failure_has_no_rejection() {
        let err = NormalizedError::new(Some(502), "Bad gateway! Please try again later.");
        assert_eq!(Rejection::from_error(&err), None);
        let err = NormalizedError::new(None, "offline");
        assert_eq!(Rejection::from_error(&err), None);
    }
}
