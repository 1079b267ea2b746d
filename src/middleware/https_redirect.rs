//! HTTP to HTTPS redirection middleware.

use crate::config::HttpsRedirectionConfig;
use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header,
};
use std::{
    future::{Ready, ready},
    pin::Pin,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

/// Redirects plain HTTP requests to HTTPS with `307 Temporary Redirect`
///
/// Without a configured HTTPS port requests pass through unchanged and a
/// warning is logged once.
pub struct HttpsRedirection {
    config: HttpsRedirectionConfig,
    warned: Arc<AtomicBool>,
}

impl HttpsRedirection {
    pub fn new(config: HttpsRedirectionConfig) -> Self {
        Self {
            config,
            warned: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for HttpsRedirection
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = HttpsRedirectionMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(HttpsRedirectionMiddleware {
            service,
            https_port: self.config.https_port,
            warned: self.warned.clone(),
        }))
    }
}

pub struct HttpsRedirectionMiddleware<S> {
    service: S,
    https_port: Option<u16>,
    warned: Arc<AtomicBool>,
}

impl<S, B> Service<ServiceRequest> for HttpsRedirectionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let redirect_to = match self.https_port {
            None => {
                // Warn on the first request only
                if !self.warned.swap(true, Ordering::Relaxed) {
                    tracing::warn!("Failed to determine the https port for redirect");
                }
                None
            }
            Some(port) => {
                let info = req.connection_info();
                if info.scheme().eq_ignore_ascii_case("https") {
                    None
                } else {
                    let path_and_query = req
                        .uri()
                        .path_and_query()
                        .map(|p| p.as_str())
                        .unwrap_or("/");
                    Some(https_location(info.host(), port, path_and_query))
                }
            }
        };

        match redirect_to {
            None => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Some(location) => {
                tracing::debug!(location = %location, "Redirecting to https");
                let response = HttpResponse::TemporaryRedirect()
                    .insert_header((header::LOCATION, location))
                    .finish();
                let res = req.into_response(response).map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
        }
    }
}

/// Build the HTTPS URL for `host` (with any port removed) on `port`
pub fn https_location(host: &str, port: u16, path_and_query: &str) -> String {
    let hostname = if host.starts_with('[') {
        host.split_inclusive(']').next().unwrap_or(host)
    } else {
        host.split(':').next().unwrap_or(host)
    };

    if port == 443 {
        format!("https://{hostname}{path_and_query}")
    } else {
        format!("https://{hostname}:{port}{path_and_query}")
    }
}
