//! HTTP utility functions for extracting request information.

use actix_web::{
    HttpMessage, HttpRequest,
    http::header::{self, HeaderValue},
};

/// Request identifier stored in the request extensions by the request ID middleware
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Client IP address, preferring `Forwarded`/`X-Forwarded-For` over the peer address
pub fn extract_client_ip(req: &HttpRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_string()
}

/// Extract user agent from request headers
pub fn extract_user_agent(req: &HttpRequest) -> Option<String> {
    header_str(req, header::USER_AGENT.as_str()).map(str::to_string)
}

/// Raw `Authorization` header value
///
/// Returned undecoded so that a header with non-ASCII bytes is still seen as
/// present.
pub fn extract_authorization(req: &HttpRequest) -> Option<&HeaderValue> {
    req.headers().get(header::AUTHORIZATION)
}

/// Request ID assigned to this request, if the middleware ran
pub fn extract_request_id(req: &HttpRequest) -> Option<String> {
    req.extensions().get::<RequestId>().map(|id| id.0.clone())
}

fn header_str<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|h| h.to_str().ok())
}
