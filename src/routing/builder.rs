//! Route groups, per-route builders and the conventions they apply.
//!
//! Conventions are closures that edit an [`EndpointBuilder`] while a route is
//! being finalized. Ordinary conventions run first; *finally* conventions run
//! afterwards and therefore see every piece of metadata the others attached.

use super::metadata::{
    AuthorizationPosture, AuthorizeData, EndpointMetadata, OperationDescriptor, ProducesResponse,
};
use actix_web::http::Method;
use std::{fmt, sync::Arc};

/// A convention applied to an endpoint while it is built
pub type Convention = Arc<dyn Fn(&mut EndpointBuilder) + Send + Sync>;

/// Mutable view of an endpoint during finalization
#[derive(Debug)]
pub struct EndpointBuilder {
    pub method: Method,
    pub pattern: String,
    pub metadata: Vec<EndpointMetadata>,
}

impl EndpointBuilder {
    pub fn new(method: Method, pattern: impl Into<String>) -> Self {
        Self {
            method,
            pattern: pattern.into(),
            metadata: Vec::new(),
        }
    }

    fn build(self) -> Endpoint {
        Endpoint {
            method: self.method,
            pattern: self.pattern,
            metadata: self.metadata,
        }
    }
}

/// A finalized route with read-only metadata
#[derive(Clone, Debug)]
pub struct Endpoint {
    method: Method,
    pattern: String,
    metadata: Vec<EndpointMetadata>,
}

impl Endpoint {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn metadata(&self) -> &[EndpointMetadata] {
        &self.metadata
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata.iter().find_map(|m| match m {
            EndpointMetadata::EndpointName(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// The OpenAPI operation attached to this endpoint, if any
    /// Responses declared with `produces`, in registration order
    pub fn produces(&self) -> impl Iterator<Item = &ProducesResponse> {
        self.metadata.iter().filter_map(|m| match m {
            EndpointMetadata::Produces(response) => Some(response),
            _ => None,
        })
    }

    pub fn operation(&self) -> Option<&Arc<OperationDescriptor>> {
        self.metadata.iter().find_map(EndpointMetadata::as_operation)
    }

    pub fn posture(&self) -> AuthorizationPosture {
        AuthorizationPosture::classify(&self.metadata)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP: {} {}", self.method, self.pattern)
    }
}

/// Anything conventions can be attached to: a single route or a whole group
pub trait EndpointConventionBuilder {
    fn add<F>(&mut self, convention: F) -> &mut Self
    where
        F: Fn(&mut EndpointBuilder) + Send + Sync + 'static;

    fn finally<F>(&mut self, convention: F) -> &mut Self
    where
        F: Fn(&mut EndpointBuilder) + Send + Sync + 'static;

    /// Require an authorized caller using the default policy
    fn require_authorization(&mut self) -> &mut Self {
        self.require_authorization_with(AuthorizeData::default())
    }

    fn require_authorization_with(&mut self, data: AuthorizeData) -> &mut Self {
        self.add(move |endpoint| {
            endpoint
                .metadata
                .push(EndpointMetadata::Authorize(data.clone()))
        })
    }

    fn allow_anonymous(&mut self) -> &mut Self {
        self.add(|endpoint| endpoint.metadata.push(EndpointMetadata::AllowAnonymous))
    }

    fn with_name(&mut self, name: &str) -> &mut Self {
        let name = name.to_string();
        self.add(move |endpoint| {
            endpoint
                .metadata
                .push(EndpointMetadata::EndpointName(name.clone()))
        })
    }

    fn with_tags(&mut self, tags: &[&str]) -> &mut Self {
        let tags: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
        self.add(move |endpoint| endpoint.metadata.push(EndpointMetadata::Tags(tags.clone())))
    }

    fn produces(&mut self, status: u16, schema: &'static str) -> &mut Self {
        self.add(move |endpoint| {
            endpoint
                .metadata
                .push(EndpointMetadata::Produces(ProducesResponse {
                    status,
                    content_type: "application/json".to_string(),
                    schema,
                }))
        })
    }

    /// Describe the route in the OpenAPI document
    ///
    /// The operation is derived from the name and tags present when the
    /// finally conventions run.
    fn with_openapi(&mut self) -> &mut Self {
        self.finally(add_openapi_operation)
    }
}

fn add_openapi_operation(endpoint: &mut EndpointBuilder) {
    if endpoint.metadata.iter().any(|m| m.as_operation().is_some()) {
        return;
    }

    let mut operation = OperationDescriptor::default();
    for item in &endpoint.metadata {
        match item {
            EndpointMetadata::EndpointName(name) => operation.operation_id = Some(name.clone()),
            EndpointMetadata::Tags(tags) => operation.tags.extend(tags.iter().cloned()),
            _ => {}
        }
    }

    endpoint
        .metadata
        .push(EndpointMetadata::OpenApiOperation(Arc::new(operation)));
}

/// Builder for one mapped route
pub struct RouteHandlerBuilder {
    method: Method,
    pattern: String,
    conventions: Vec<Convention>,
    finally_conventions: Vec<Convention>,
}

impl RouteHandlerBuilder {
    fn new(method: Method, pattern: String) -> Self {
        Self {
            method,
            pattern,
            conventions: Vec::new(),
            finally_conventions: Vec::new(),
        }
    }
}

impl EndpointConventionBuilder for RouteHandlerBuilder {
    fn add<F>(&mut self, convention: F) -> &mut Self
    where
        F: Fn(&mut EndpointBuilder) + Send + Sync + 'static,
    {
        self.conventions.push(Arc::new(convention));
        self
    }

    fn finally<F>(&mut self, convention: F) -> &mut Self
    where
        F: Fn(&mut EndpointBuilder) + Send + Sync + 'static,
    {
        self.finally_conventions.push(Arc::new(convention));
        self
    }
}

/// A set of routes sharing a prefix and conventions
///
/// Group conventions apply to every route in the group, including routes
/// mapped after the convention was added.
pub struct RouteGroupBuilder {
    prefix: String,
    conventions: Vec<Convention>,
    finally_conventions: Vec<Convention>,
    handlers: Vec<RouteHandlerBuilder>,
}

impl RouteGroupBuilder {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            conventions: Vec::new(),
            finally_conventions: Vec::new(),
            handlers: Vec::new(),
        }
    }

    pub fn map_get(&mut self, pattern: &str) -> &mut RouteHandlerBuilder {
        self.map(Method::GET, pattern)
    }

    pub fn map(&mut self, method: Method, pattern: &str) -> &mut RouteHandlerBuilder {
        let pattern = join_pattern(&self.prefix, pattern);
        let index = self.handlers.len();
        self.handlers.push(RouteHandlerBuilder::new(method, pattern));
        &mut self.handlers[index]
    }

    /// Finalize every mapped route
    ///
    /// Order per route: group conventions, route conventions, route finally
    /// conventions, group finally conventions.
    pub fn build(self) -> Vec<Endpoint> {
        let Self {
            conventions,
            finally_conventions,
            handlers,
            ..
        } = self;

        handlers
            .into_iter()
            .map(|handler| {
                let mut endpoint = EndpointBuilder::new(handler.method, handler.pattern);
                conventions
                    .iter()
                    .chain(&handler.conventions)
                    .chain(&handler.finally_conventions)
                    .chain(&finally_conventions)
                    .for_each(|convention| convention(&mut endpoint));
                endpoint.build()
            })
            .collect()
    }
}

impl EndpointConventionBuilder for RouteGroupBuilder {
    fn add<F>(&mut self, convention: F) -> &mut Self
    where
        F: Fn(&mut EndpointBuilder) + Send + Sync + 'static,
    {
        self.conventions.push(Arc::new(convention));
        self
    }

    fn finally<F>(&mut self, convention: F) -> &mut Self
    where
        F: Fn(&mut EndpointBuilder) + Send + Sync + 'static,
    {
        self.finally_conventions.push(Arc::new(convention));
        self
    }
}

/// Join a group prefix and a route pattern with exactly one separator
pub fn join_pattern(prefix: &str, pattern: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let pattern = pattern.trim_start_matches('/');
    if pattern.is_empty() {
        if prefix.is_empty() {
            "/".to_string()
        } else {
            prefix.to_string()
        }
    } else {
        format!("{prefix}/{pattern}")
    }
}
