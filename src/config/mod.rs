//! Configuration structures and loading utilities.
//!
//! All settings are read from environment variables once at startup and
//! passed around as typed structs.

pub mod app;
pub mod auth;

pub use app::*;
pub use auth::*;

use thiserror::Error;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be set")]
    MissingVar { var: &'static str },

    #[error("{var} is not valid base64: {source}")]
    InvalidSigningKey {
        var: &'static str,
        #[source]
        source: base64::DecodeError,
    },

    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}
