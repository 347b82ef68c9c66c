//! Login workflow.

use crate::mutation::{Workflow, accept, local_failure};
use crate::OperationError;
use pitchside_client::ApiClient;
use pitchside_types::{FormModel, Notification, NotificationSink};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub struct LoginWorkflow {
    client: Arc<ApiClient>,
    sink: Arc<dyn NotificationSink>,
}

impl LoginWorkflow {
    pub const ENDPOINT: &'static str = "/auth/login";

    pub fn new(client: Arc<ApiClient>, sink: Arc<dyn NotificationSink>) -> Self {
        Self { client, sink }
    }

    /// Sign in and store the returned credential.
    ///
    /// # Errors
    ///
    /// [`OperationError::AlreadyReported`] when the server rejected the
    /// credentials (already shown on the form or as a notification),
    /// [`OperationError::Request`] on transport failure, and
    /// [`OperationError::Failed`] if the reply carried no token or the token
    /// could not be persisted.
    pub async fn submit(
        &self,
        request: &LoginRequest,
        form: &dyn FormModel,
    ) -> Result<(), OperationError> {
        let result = self
            .client
            .create(Self::ENDPOINT, serde_json::to_value(request)?)
            .await;
        let data = accept(Workflow::Login, result, form, &*self.sink)?;

        let Some(token) = data.get("token").and_then(Value::as_str) else {
            return Err(local_failure(
                Workflow::Login,
                &*self.sink,
                "login reply carried no token",
            ));
        };
        if let Err(e) = self.client.session().sign_in(token).await {
            return Err(local_failure(Workflow::Login, &*self.sink, e.to_string()));
        }
        self.sink
            .notify(Notification::info("Login successful", "Welcome back!"));
        Ok(())
    }
}
