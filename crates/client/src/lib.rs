//! Authenticated request layer.
//!
//! - [`Session`] owns the bearer credential and the logout transition.
//! - [`classify`] turns any transport failure into a
//!   [`NormalizedError`](pitchside_types::NormalizedError) and forces logout on
//!   401/403.
//! - [`ApiClient`] wraps the four verbs with credential attachment.
//! - [`HttpTransport`] is the `reqwest`-backed transport primitive.

pub mod classify;
pub mod client;
pub mod session;
pub mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use classify::{classify, default_message, normalize};
pub use client::ApiClient;
pub use session::Session;
pub use transport::HttpTransport;
