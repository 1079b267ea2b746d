//! Bearer token authentication middleware.
//!
//! The guard wraps individual resources rather than the whole app, so it only
//! runs once the router has matched a request to a protected resource. The
//! decision is made from that resource's metadata when the app is built,
//! never from the raw request path.

use crate::{
    models::{AuthAuditEvent, AuthEventOutcome, AuthEventType, AuthenticatedUser},
    routing::RouteTable,
    services::auth::{AuthError, BearerTokenValidator},
    utils::http::{extract_authorization, extract_client_ip, extract_request_id, extract_user_agent},
};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header,
};
use std::{
    future::{Ready, ready},
    pin::Pin,
};

/// Bearer authentication middleware factory
pub struct BearerAuthentication {
    validator: BearerTokenValidator,
    required: bool,
}

impl BearerAuthentication {
    /// Guard every request that reaches the wrapped resource
    pub fn new(validator: BearerTokenValidator) -> Self {
        Self {
            validator,
            required: true,
        }
    }

    /// Guard the resource serving `pattern` if any of its endpoints requires
    /// an authenticated caller
    pub fn for_route(validator: BearerTokenValidator, routes: &RouteTable, pattern: &str) -> Self {
        Self {
            validator,
            required: routes.requires_authentication(pattern),
        }
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuthentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerAuthenticationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthenticationMiddleware {
            service,
            validator: self.validator.clone(),
            required: self.required,
        }))
    }
}

pub struct BearerAuthenticationMiddleware<S> {
    service: S,
    validator: BearerTokenValidator,
    required: bool,
}

impl<S, B> Service<ServiceRequest> for BearerAuthenticationMiddleware<S>
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
        // Anonymous resources pass straight through
        if !self.required {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
        }

        match self
            .validator
            .validate_header(extract_authorization(req.request()))
        {
            Ok(claims) => {
                let user = AuthenticatedUser::from(claims);
                audit(&req, AuthEventType::TokenAccepted, AuthEventOutcome::Success)
                    .with_subject(Some(user.subject.clone()))
                    .log();

                // Handlers read the caller from the request extensions
                req.extensions_mut().insert(user);

                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(error) => {
                // Only a header that is absent entirely counts as missing
                let event_type = match error {
                    AuthError::MissingToken => AuthEventType::TokenMissing,
                    _ => AuthEventType::TokenRejected,
                };
                audit(&req, event_type, AuthEventOutcome::Failure)
                    .with_reason(Some(error.to_string()))
                    .log();

                // Short-circuit with a challenge; the handler never runs
                let response = HttpResponse::Unauthorized()
                    .insert_header((header::WWW_AUTHENTICATE, error.challenge()))
                    .finish();
                let res = req.into_response(response).map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
        }
    }
}

fn audit(req: &ServiceRequest, event_type: AuthEventType, outcome: AuthEventOutcome) -> AuthAuditEvent {
    let http_req = req.request();
    AuthAuditEvent::new(
        event_type,
        outcome,
        extract_client_ip(http_req),
        req.method().to_string(),
        req.path().to_string(),
    )
    .with_user_agent(extract_user_agent(http_req))
    .with_request_id(extract_request_id(http_req))
}
