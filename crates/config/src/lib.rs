//! Configuration loading for the pitchside client.
//!
//! Uses figment to layer built-in defaults, an optional YAML file, and
//! `PITCHSIDE_`-prefixed environment variables.

pub mod schema;

pub use schema::{ClientConfig, Config, LogConfig, SessionConfig, StoreConfig};
