//! Custom middleware implementations for the API.
//!
//! Bearer authentication, HTTPS redirection and request IDs.

pub mod bearer_auth;
pub mod https_redirect;
pub mod request_id;

pub use bearer_auth::*;
pub use https_redirect::*;
pub use request_id::*;
