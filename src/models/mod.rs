//! Data models and schemas for the weather API.
//!
//! Request/response models, bearer token claims and audit event types.

pub mod audit;
pub mod auth;
pub mod forecast;

pub use audit::*;
pub use auth::*;
pub use forecast::*;
