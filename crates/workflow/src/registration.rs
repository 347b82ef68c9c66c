//! Two-step registration: account details, then a one-time code.

use crate::mutation::{Workflow, accept, local_failure};
use crate::OperationError;
use pitchside_client::ApiClient;
use pitchside_types::{FormModel, Notification, NotificationSink};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub user_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
}

/// Registration screen state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationView {
    /// The one-time-code step is showing.
    pub otp_open: bool,
    /// Values returned by the first step, echoed back on verification.
    pub pending: Option<Value>,
}

pub struct RegistrationWorkflow {
    client: Arc<ApiClient>,
    sink: Arc<dyn NotificationSink>,
}

impl RegistrationWorkflow {
    pub const REGISTER_ENDPOINT: &'static str = "/auth/register";
    pub const VERIFY_ENDPOINT: &'static str = "/auth/verify-otp";
    /// Store key holding the pending registration between the two steps.
    pub const PENDING_KEY: &'static str = "registration";

    pub fn new(client: Arc<ApiClient>, sink: Arc<dyn NotificationSink>) -> Self {
        Self { client, sink }
    }

    /// Submit account details and open the one-time-code step.
    ///
    /// # Errors
    ///
    /// See [`crate::LoginWorkflow::submit`]; additionally fails if the
    /// pending registration cannot be persisted.
    pub async fn submit(
        &self,
        request: &RegistrationRequest,
        form: &dyn FormModel,
        view: &mut RegistrationView,
    ) -> Result<Value, OperationError> {
        let result = self
            .client
            .create(Self::REGISTER_ENDPOINT, serde_json::to_value(request)?)
            .await;
        let data = accept(Workflow::Registration, result, form, &*self.sink)?;

        let encoded = serde_json::to_string(&data)?;
        if let Err(e) = self
            .client
            .session()
            .store()
            .set(Self::PENDING_KEY, &encoded)
            .await
        {
            return Err(local_failure(
                Workflow::Registration,
                &*self.sink,
                e.to_string(),
            ));
        }

        view.pending = Some(data.clone());
        view.otp_open = true;
        self.sink.notify(Notification::info(
            "Registration successful",
            "Enter the code we sent you to verify your account.",
        ));
        Ok(data)
    }

    /// Verify the one-time code for the pending registration.
    ///
    /// The pending values come from `view` or, after a restart, from the
    /// store. On success the returned credential is stored and the pending
    /// registration is discarded.
    ///
    /// # Errors
    ///
    /// [`OperationError::Failed`] if there is no pending registration,
    /// otherwise as for [`Self::submit`].
    pub async fn verify_otp(
        &self,
        code: &str,
        form: &dyn FormModel,
        view: &mut RegistrationView,
    ) -> Result<(), OperationError> {
        let pending = match view.pending.clone() {
            Some(pending) => pending,
            None => self.restore_pending().await?,
        };
        let mut body = match pending {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        body.insert("otp".to_string(), Value::String(code.to_string()));

        let result = self
            .client
            .create(Self::VERIFY_ENDPOINT, Value::Object(body))
            .await;
        let data = accept(Workflow::Verification, result, form, &*self.sink)?;

        let session = self.client.session();
        if let Some(token) = data.get("token").and_then(Value::as_str)
            && let Err(e) = session.sign_in(token).await
        {
            return Err(local_failure(
                Workflow::Verification,
                &*self.sink,
                e.to_string(),
            ));
        }
        if let Err(e) = session.store().remove(Self::PENDING_KEY).await {
            tracing::warn!(error = %e, "failed to discard pending registration");
        }

        view.pending = None;
        view.otp_open = false;
        self.sink.notify(Notification::info(
            "Verification successful",
            "Your account is ready.",
        ));
        Ok(())
    }

    async fn restore_pending(&self) -> Result<Value, OperationError> {
        let stored = self
            .client
            .session()
            .store()
            .get(Self::PENDING_KEY)
            .await;
        match stored {
            Ok(Some(raw)) => Ok(serde_json::from_str(&raw)?),
            Ok(None) => Err(local_failure(
                Workflow::Verification,
                &*self.sink,
                "no pending registration",
            )),
            Err(e) => Err(local_failure(
                Workflow::Verification,
                &*self.sink,
                e.to_string(),
            )),
        }
    }
}
