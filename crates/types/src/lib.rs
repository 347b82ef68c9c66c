//! Core types and traits for the pitchside workspace.
//!
//! This crate defines the shared vocabulary of the client layer: the
//! normalized failure representation, the server reply union, transport
//! payloads, and the collaborator traits (credential store, transport,
//! notification sink, navigator, form model) that the other crates plug into.

pub mod error;
pub mod field;
pub mod notification;
pub mod reply;
pub mod traits;
pub mod transport;

pub use error::{ClientError, ErrorClass, NormalizedError};
pub use field::{FieldError, FieldErrorKind, FormField};
pub use notification::{Notification, Variant};
pub use reply::{MutationOutcome, Rejection, ReplyMessage, ServerReply};
pub use traits::{CredentialStore, FormModel, Navigator, NotificationSink, Transport};
pub use transport::{FormPart, FormPayload, Payload, TransportError, TransportResponse};
