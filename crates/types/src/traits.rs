//! Collaborator traits shared across all pitchside crates.
//!
//! Every external dependency of the request layer is expressed here so that
//! the client and workflow crates depend only on `pitchside-types`, never on a
//! concrete store, HTTP stack, or UI toolkit.

use crate::{FieldError, FormField, Notification, Payload, TransportError};
use async_trait::async_trait;
use http::HeaderMap;
use serde_json::Value;

pub use crate::error::Result;

/// Persistent string key-value storage (where the bearer token lives).
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;
    /// Store (or overwrite) `value` under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Delete `key`; removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// The raw "send request" primitive.
///
/// Implementations return the decoded success payload, or a
/// [`TransportError`] carrying the response envelope when one was received.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, headers: HeaderMap) -> std::result::Result<Value, TransportError>;

    async fn post(
        &self,
        url: &str,
        body: Payload,
        headers: HeaderMap,
    ) -> std::result::Result<Value, TransportError>;

    async fn put(
        &self,
        url: &str,
        body: Payload,
        headers: HeaderMap,
    ) -> std::result::Result<Value, TransportError>;

    async fn delete(
        &self,
        url: &str,
        body: Payload,
        headers: HeaderMap,
    ) -> std::result::Result<Value, TransportError>;
}

/// Receives toast notifications.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Client-side navigation.
pub trait Navigator: Send + Sync {
    fn redirect(&self, path: &str);
}

/// The form whose fields receive server-side validation errors.
pub trait FormModel: Send + Sync {
    fn set_error(&self, field: FormField, error: FieldError);
}
