//! Authenticated request client.
//!
//! All four verbs return `Result<Value, NormalizedError>`; every failure has
//! already been through [`classify`] by the time the caller sees it, so the
//! 401/403 logout side effect cannot be skipped by any call site.

use crate::{Session, classify};
use http::{
    HeaderMap, HeaderValue,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use pitchside_types::{ClientError, NormalizedError, Payload, Transport, TransportError};
use serde_json::Value;
use std::sync::Arc;

const DEFAULT_UPDATE_CONTENT_TYPE: &str = "application/json";

pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: Arc<Session>,
    update_content_type: HeaderValue,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<Session>) -> Self {
        Self {
            transport,
            session,
            update_content_type: HeaderValue::from_static(DEFAULT_UPDATE_CONTENT_TYPE),
        }
    }

    /// Override the content type declared on `update` calls.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if `content_type` is not a valid
    /// header value.
    pub fn with_update_content_type(mut self, content_type: &str) -> Result<Self, ClientError> {
        self.update_content_type = HeaderValue::from_str(content_type)
            .map_err(|e| ClientError::Config(format!("invalid update content type: {e}")))?;
        Ok(self)
    }

    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Fetch a resource.
    ///
    /// # Errors
    ///
    /// Returns the classified failure.
    pub async fn read(&self, path: &str) -> Result<Value, NormalizedError> {
        tracing::debug!(verb = "read", path, "sending request");
        let result = self.transport.get(path, self.auth_headers()).await;
        self.finish("read", path, result).await
    }

    /// Create a resource.
    ///
    /// # Errors
    ///
    /// Returns the classified failure.
    pub async fn create(
        &self,
        path: &str,
        payload: impl Into<Payload> + Send,
    ) -> Result<Value, NormalizedError> {
        tracing::debug!(verb = "create", path, "sending request");
        let result = self
            .transport
            .post(path, payload.into(), self.auth_headers())
            .await;
        self.finish("create", path, result).await
    }

    /// Update a resource.
    ///
    /// The configured update content type is declared even when the payload
    /// is a multipart form.
    ///
    /// # Errors
    ///
    /// Returns the classified failure.
    pub async fn update(
        &self,
        path: &str,
        payload: impl Into<Payload> + Send,
    ) -> Result<Value, NormalizedError> {
        let payload = payload.into();
        tracing::debug!(verb = "update", path, form = payload.is_form(), "sending request");
        let mut headers = self.auth_headers();
        headers.insert(CONTENT_TYPE, self.update_content_type.clone());
        let result = self.transport.put(path, payload, headers).await;
        self.finish("update", path, result).await
    }

    /// Delete a resource.
    ///
    /// # Errors
    ///
    /// Returns the classified failure.
    pub async fn delete(
        &self,
        path: &str,
        payload: impl Into<Payload> + Send,
    ) -> Result<Value, NormalizedError> {
        tracing::debug!(verb = "delete", path, "sending request");
        let result = self
            .transport
            .delete(path, payload.into(), self.auth_headers())
            .await;
        self.finish("delete", path, result).await
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(token) = self.session.token() {
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "stored credential is not a valid header value, sending unauthenticated");
                }
            }
        }
        headers
    }

    async fn finish(
        &self,
        verb: &'static str,
        path: &str,
        result: Result<Value, TransportError>,
    ) -> Result<Value, NormalizedError> {
        match result {
            Ok(value) => Ok(value),
            Err(err) => {
                let normalized = classify(err, &self.session).await;
                tracing::warn!(
                    verb,
                    path,
                    code = ?normalized.code,
                    class = %normalized.class(),
                    error = %normalized,
                    "request failed"
                );
                Err(normalized)
            }
        }
    }
}
