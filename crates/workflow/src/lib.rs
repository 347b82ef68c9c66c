//! UI-facing orchestration on top of the request client.
//!
//! [`AsyncOperation`] gives any async action an idle/pending/success/failed
//! lifecycle with optional notifications and escalation to a blocking error
//! surface. The mutation workflows ([`LoginWorkflow`], [`RegistrationWorkflow`],
//! [`ProfileWorkflow`], [`FixtureWorkflow`]) bind one server operation each to
//! form-error mapping and follow-on view transitions.

pub mod async_op;
pub mod error;
pub mod fixtures;
pub mod form;
pub mod login;
mod mutation;
pub mod profile;
pub mod registration;

pub use async_op::{AsyncOperation, AsyncState, ErrorSurface, ExecuteOptions};
pub use error::OperationError;
pub use fixtures::{ActiveView, FixtureRequest, FixtureView, FixtureWorkflow};
pub use form::FormErrors;
pub use login::{LoginRequest, LoginWorkflow};
pub use mutation::Workflow;
pub use profile::{CompletionCallback, ProfileWorkflow};
pub use registration::{RegistrationRequest, RegistrationView, RegistrationWorkflow};

#[cfg(test)]
pub(crate) mod test_support;
