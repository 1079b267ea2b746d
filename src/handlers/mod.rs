//! HTTP request handlers for API endpoints.
//!
//! Handlers, their route registration and the application factory.

pub mod openapi;
pub mod weather;

pub use openapi::*;
pub use weather::*;
