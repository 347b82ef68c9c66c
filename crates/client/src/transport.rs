//! `reqwest`-backed [`Transport`].
//!
//! One attempt per call, no retry. Success bodies are decoded as JSON when
//! possible; error bodies are kept in the [`TransportError`] envelope for the
//! classifier.

use async_trait::async_trait;
use http::HeaderMap;
use pitchside_types::{ClientError, FormPart, FormPayload, Payload, Transport, TransportError};
use reqwest::{Client, RequestBuilder, multipart};
use serde_json::Value;

/// HTTP transport resolving resource locators against a base URL.
#[derive(Clone)]
pub struct HttpTransport {
    http: Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport with a default client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if `base_url` is not an absolute
    /// http(s) URL, or [`ClientError::Http`] if the client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder()
            .build()
            .map_err(|e| ClientError::Http(e.to_string()))?;
        Self::with_client(http, base_url)
    }

    /// Creates a transport around an existing client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if `base_url` is not an absolute
    /// http(s) URL.
    pub fn with_client(http: Client, base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into();
        if !is_absolute(&base_url) {
            return Err(ClientError::InvalidUrl(base_url));
        }
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve a resource locator; absolute URLs pass through unchanged.
    #[must_use]
    pub fn resolve(&self, locator: &str) -> String {
        if is_absolute(locator) {
            locator.to_string()
        } else {
            format!("{}/{}", self.base_url, locator.trim_start_matches('/'))
        }
    }

    /// Attach the body, then the headers.
    ///
    /// Headers go last so an explicit `Content-Type` replaces the one the body
    /// would set (multipart included).
    fn prepare(
        builder: RequestBuilder,
        body: Payload,
        headers: HeaderMap,
    ) -> Result<RequestBuilder, TransportError> {
        let builder = match body {
            Payload::Empty => builder,
            Payload::Json(value) => builder.json(&value),
            Payload::Form(form) => builder.multipart(build_form(form)?),
        };
        Ok(builder.headers(headers))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Value, TransportError> {
        let resp = builder
            .send()
            .await
            .map_err(|e| TransportError::network(e.to_string()))?;
        let status = resp.status();
        if status.is_success() {
            let text = resp.text().await.map_err(|e| {
                TransportError::network(format!("failed to read response body: {e}"))
            })?;
            Ok(decode_body(&text))
        } else {
            // The status alone is enough to classify; a broken error body is dropped.
            let text = resp.text().await.unwrap_or_default();
            Err(TransportError::status(status.as_u16(), decode_body(&text)))
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<Value, TransportError> {
        let builder = self.http.get(self.resolve(url)).headers(headers);
        self.send(builder).await
    }

    async fn post(
        &self,
        url: &str,
        body: Payload,
        headers: HeaderMap,
    ) -> Result<Value, TransportError> {
        let builder = Self::prepare(self.http.post(self.resolve(url)), body, headers)?;
        self.send(builder).await
    }

    async fn put(
        &self,
        url: &str,
        body: Payload,
        headers: HeaderMap,
    ) -> Result<Value, TransportError> {
        let builder = Self::prepare(self.http.put(self.resolve(url)), body, headers)?;
        self.send(builder).await
    }

    async fn delete(
        &self,
        url: &str,
        body: Payload,
        headers: HeaderMap,
    ) -> Result<Value, TransportError> {
        let builder = Self::prepare(self.http.delete(self.resolve(url)), body, headers)?;
        self.send(builder).await
    }
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn build_form(form: FormPayload) -> Result<multipart::Form, TransportError> {
    let mut out = multipart::Form::new();
    for (name, part) in form.parts().iter().cloned() {
        out = match part {
            FormPart::Text(value) => out.text(name, value),
            FormPart::File {
                file_name,
                mime,
                bytes,
            } => {
                let mut file = multipart::Part::bytes(bytes.to_vec()).file_name(file_name);
                if let Some(mime) = mime {
                    file = file.mime_str(&mime).map_err(|e| {
                        tracing::warn!(part = %name, %mime, error = %e, "invalid multipart mime type");
                        TransportError::invalid_payload(format!(
                            "invalid mime type for {name}: {e}"
                        ))
                    })?;
                }
                out.part(name, file)
            }
        };
    }
    Ok(out)
}
