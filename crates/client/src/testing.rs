//! Recording fakes for the collaborator traits.

use async_trait::async_trait;
use http::HeaderMap;
use pitchside_types::{Navigator, Notification, NotificationSink, Payload, Transport, TransportError};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Remembers every redirect.
#[derive(Default)]
pub struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().expect("navigator lock").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        self.paths
            .lock()
            .expect("navigator lock")
            .push(path.to_string());
    }
}

/// Remembers every notification.
#[derive(Default)]
pub struct RecordingSink {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().expect("sink lock").clone()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        self.seen.lock().expect("sink lock").push(notification);
    }
}

/// One call observed by [`ScriptedTransport`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: &'static str,
    pub url: String,
    pub body: Payload,
    pub headers: HeaderMap,
}

/// A transport that replays queued responses in order.
///
/// Once the queue is drained every call succeeds with `null`.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<Value, TransportError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    #[must_use]
    pub fn respond(self, value: Value) -> Self {
        self.responses
            .lock()
            .expect("transport lock")
            .push_back(Ok(value));
        self
    }

    /// Queue a failure.
    #[must_use]
    pub fn fail(self, err: TransportError) -> Self {
        self.responses
            .lock()
            .expect("transport lock")
            .push_back(Err(err));
        self
    }

    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("transport lock").clone()
    }

    fn record(
        &self,
        method: &'static str,
        url: &str,
        body: Payload,
        headers: HeaderMap,
    ) -> Result<Value, TransportError> {
        self.calls.lock().expect("transport lock").push(RecordedCall {
            method,
            url: url.to_string(),
            body,
            headers,
        });
        self.responses
            .lock()
            .expect("transport lock")
            .pop_front()
            .unwrap_or(Ok(Value::Null))
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<Value, TransportError> {
        self.record("GET", url, Payload::Empty, headers)
    }

    async fn post(
        &self,
        url: &str,
        body: Payload,
        headers: HeaderMap,
    ) -> Result<Value, TransportError> {
        self.record("POST", url, body, headers)
    }

    async fn put(
        &self,
        url: &str,
        body: Payload,
        headers: HeaderMap,
    ) -> Result<Value, TransportError> {
        self.record("PUT", url, body, headers)
    }

    async fn delete(
        &self,
        url: &str,
        body: Payload,
        headers: HeaderMap,
    ) -> Result<Value, TransportError> {
        self.record("DELETE", url, body, headers)
    }
}
