//! Reply handling shared by every mutation workflow.

use crate::OperationError;
use pitchside_types::{
    FieldError, FormModel, MutationOutcome, NormalizedError, Notification, NotificationSink,
    Rejection,
};
use serde_json::Value;
use std::fmt;

/// Title of the notification shown for transport-level failures.
pub(crate) const TRANSPORT_FAILURE_TITLE: &str = "Something went wrong";

/// Description used when the server rejects without a message.
pub(crate) const FALLBACK_DESCRIPTION: &str = "Please try again.";

/// The named server operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    Login,
    Registration,
    Verification,
    ProfileEdit,
    FixtureGeneration,
}

impl Workflow {
    /// Title of the destructive notification for a generic rejection.
    #[must_use]
    pub const fn failure_title(self) -> &'static str {
        match self {
            Self::Login => "Login Failed",
            Self::Registration => "Registration failed",
            Self::Verification => "Verification failed",
            Self::ProfileEdit => "Update failed",
            Self::FixtureGeneration => "Fixture generation failed",
        }
    }
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => write!(f, "Login"),
            Self::Registration => write!(f, "Registration"),
            Self::Verification => write!(f, "Verification"),
            Self::ProfileEdit => write!(f, "Profile update"),
            Self::FixtureGeneration => write!(f, "Fixture generation"),
        }
    }
}

/// Turn a request result into the accepted reply data.
///
/// Rejections are routed to the form (known field) or to a workflow-titled
/// notification and come back as [`OperationError::AlreadyReported`].
/// Transport failures get a generic notification and come back as
/// [`OperationError::Request`].
pub(crate) fn accept(
    workflow: Workflow,
    result: Result<Value, NormalizedError>,
    form: &dyn FormModel,
    sink: &dyn NotificationSink,
) -> Result<Value, OperationError> {
    match result {
        Ok(value) => match MutationOutcome::from_value(value) {
            Ok(MutationOutcome::Accepted { data }) => Ok(data),
            Ok(MutationOutcome::Rejected(rejection)) => Err(reject(workflow, rejection, form, sink)),
            Err(e) => {
                tracing::warn!(%workflow, error = %e, "malformed mutation reply");
                sink.notify(Notification::destructive(
                    TRANSPORT_FAILURE_TITLE,
                    format!("{workflow} failed: unexpected response from server."),
                ));
                Err(e.into())
            }
        },
        Err(err) => match Rejection::from_error(&err) {
            Some(rejection) => Err(reject(workflow, rejection, form, sink)),
            None => {
                sink.notify(Notification::destructive(
                    TRANSPORT_FAILURE_TITLE,
                    format!("{workflow} failed: {}", err.message),
                ));
                Err(OperationError::Request(err))
            }
        },
    }
}

fn reject(
    workflow: Workflow,
    rejection: Rejection,
    form: &dyn FormModel,
    sink: &dyn NotificationSink,
) -> OperationError {
    match rejection {
        Rejection::Field { field, message } => {
            tracing::debug!(%workflow, %field, "server rejected field");
            form.set_error(field, FieldError::manual(message));
        }
        Rejection::Generic { message } => {
            tracing::debug!(%workflow, "server rejected request");
            sink.notify(Notification::destructive(
                workflow.failure_title(),
                message.unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string()),
            ));
        }
    }
    OperationError::AlreadyReported
}

/// Report a local failure that happened after the server accepted.
pub(crate) fn local_failure(
    workflow: Workflow,
    sink: &dyn NotificationSink,
    reason: impl Into<String>,
) -> OperationError {
    let reason = reason.into();
    tracing::warn!(%workflow, %reason, "workflow could not complete");
    sink.notify(Notification::destructive(
        workflow.failure_title(),
        FALLBACK_DESCRIPTION,
    ));
    OperationError::Failed(reason)
}
