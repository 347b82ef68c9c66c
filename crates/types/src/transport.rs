//! Request payloads and transport failures.

use bytes::Bytes;
use serde_json::Value;
use thiserror::Error;

/// A single part of a multipart form payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text(String),
    File {
        file_name: String,
        mime: Option<String>,
        bytes: Bytes,
    },
}

/// An ordered multipart form payload (e.g. a profile edit with an avatar).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    parts: Vec<(String, FormPart)>,
}

impl FormPayload {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push((name.into(), FormPart::Text(value.into())));
        self
    }

    /// Append a file field.
    #[must_use]
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: Option<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        self.parts.push((
            name.into(),
            FormPart::File {
                file_name: file_name.into(),
                mime,
                bytes: bytes.into(),
            },
        ));
        self
    }

    #[must_use]
    pub fn parts(&self) -> &[(String, FormPart)] {
        &self.parts
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// The body of an outgoing request.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Payload {
    #[default]
    Empty,
    Json(Value),
    Form(FormPayload),
}

impl Payload {
    #[must_use]
    pub fn is_form(&self) -> bool {
        matches!(self, Self::Form(_))
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<FormPayload> for Payload {
    fn from(form: FormPayload) -> Self {
        Self::Form(form)
    }
}

/// The response envelope attached to an HTTP status failure.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    /// Decoded body: JSON when parseable, a string otherwise, `Null` if empty.
    pub data: Value,
}

/// A failed transport call.
///
/// `response` is `None` when nothing came back (DNS, refused connection,
/// TLS failure, ...) or when the request was never sent.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub response: Option<TransportResponse>,
    /// The payload could not be encoded, so nothing was sent.
    pub invalid_payload: bool,
    pub message: String,
}

impl TransportError {
    /// A failure with no response envelope.
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            response: None,
            invalid_payload: false,
            message: message.into(),
        }
    }

    /// A failure carrying an HTTP status and decoded body.
    pub fn status(status: u16, data: Value) -> Self {
        Self {
            response: Some(TransportResponse { status, data }),
            invalid_payload: false,
            message: format!("request failed with status {status}"),
        }
    }

    /// The request body was rejected locally before sending.
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self {
            response: None,
            invalid_payload: true,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_form_payload_builder_keeps_order() {
        let form = FormPayload::new()
            .text("userName", "striker9")
            .file("avatar", "me.png", Some("image/png".into()), vec![1u8, 2, 3]);
        let names: Vec<&str> = form.parts().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["userName", "avatar"]);
        assert!(Payload::from(form).is_form());
    }

    #[test]
    fn test_transport_error_constructors() {
        let err = TransportError::network("connection refused");
        assert!(err.response.is_none());
        assert!(!err.invalid_payload);
        assert_eq!(err.to_string(), "connection refused");

        let err = TransportError::invalid_payload("bad mime");
        assert!(err.response.is_none());
        assert!(err.invalid_payload);

        let err = TransportError::status(404, json!({ "message": "gone" }));
        let resp = err.response.unwrap();
        assert_eq!(resp.status, 404);
        assert_eq!(resp.data["message"], "gone");
    }
}
