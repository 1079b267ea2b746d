//! Business logic and service layer modules.
//!
//! Forecast generation and bearer token validation.

pub mod auth;
pub mod forecast;

pub use auth::*;
pub use forecast::*;
