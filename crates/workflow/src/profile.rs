//! Profile edit workflow.

use crate::mutation::{Workflow, accept};
use crate::OperationError;
use pitchside_client::ApiClient;
use pitchside_types::{FormModel, FormPayload, Notification, NotificationSink};
use serde_json::Value;
use std::sync::Arc;

/// Invoked with the accepted reply data once a profile edit succeeds.
pub type CompletionCallback = Box<dyn FnOnce(&Value) + Send>;

pub struct ProfileWorkflow {
    client: Arc<ApiClient>,
    sink: Arc<dyn NotificationSink>,
}

impl ProfileWorkflow {
    pub const ENDPOINT: &'static str = "/user/profile";

    pub fn new(client: Arc<ApiClient>, sink: Arc<dyn NotificationSink>) -> Self {
        Self { client, sink }
    }

    /// Send the edited profile (text fields plus optional avatar file).
    ///
    /// # Errors
    ///
    /// [`OperationError::AlreadyReported`] for server rejections,
    /// [`OperationError::Request`] for transport failures.
    pub async fn submit(
        &self,
        form_data: FormPayload,
        form: &dyn FormModel,
        on_complete: Option<CompletionCallback>,
    ) -> Result<Value, OperationError> {
        let result = self.client.update(Self::ENDPOINT, form_data).await;
        let data = accept(Workflow::ProfileEdit, result, form, &*self.sink)?;

        self.sink.notify(Notification::info(
            "Profile updated",
            "Your changes have been saved.",
        ));
        if let Some(callback) = on_complete {
            callback(&data);
        }
        Ok(data)
    }
}
