//! Attaches the bearer security requirement to OpenAPI operations of routes
//! that need an authenticated caller.

use super::{
    builder::{EndpointBuilder, EndpointConventionBuilder},
    metadata::{AuthorizationPosture, EndpointMetadata, OperationDescriptor, SecurityRequirement},
};
use std::sync::Arc;

/// Name under which the bearer scheme is declared in the OpenAPI document
pub const BEARER_SCHEME: &str = "Bearer";

/// Declare the bearer scheme on every route of `builder` that requires
/// authorization and does not allow anonymous callers.
pub fn add_openapi_security_requirement<B>(builder: &mut B) -> &mut B
where
    B: EndpointConventionBuilder,
{
    add_required_security_metadata(builder, |operation| {
        Arc::new(operation.with_security_requirement(bearer_requirement()))
    })
}

/// Register a finally convention that rewrites the OpenAPI operation of
/// authenticated routes with `configure`.
///
/// Returning the same `Arc` from `configure` leaves the metadata untouched.
pub fn add_required_security_metadata<B, F>(builder: &mut B, configure: F) -> &mut B
where
    B: EndpointConventionBuilder,
    F: Fn(&Arc<OperationDescriptor>) -> Arc<OperationDescriptor> + Send + Sync + 'static,
{
    builder.finally(move |endpoint| configure_operation_for_endpoint(endpoint, &configure))
}

fn configure_operation_for_endpoint<F>(endpoint: &mut EndpointBuilder, configure: &F)
where
    F: Fn(&Arc<OperationDescriptor>) -> Arc<OperationDescriptor>,
{
    let Some(position) = endpoint
        .metadata
        .iter()
        .position(|m| m.as_operation().is_some())
    else {
        return;
    };

    if !AuthorizationPosture::classify(&endpoint.metadata).requires_authentication() {
        return;
    }

    let Some(existing) = endpoint.metadata[position].as_operation().cloned() else {
        return;
    };
    let configured = configure(&existing);

    if Arc::ptr_eq(&configured, &existing) {
        return;
    }

    endpoint.metadata.remove(position);
    endpoint
        .metadata
        .push(EndpointMetadata::OpenApiOperation(configured));
}

fn bearer_requirement() -> SecurityRequirement {
    let mut requirement = SecurityRequirement::new();
    requirement.insert(BEARER_SCHEME.to_string(), Vec::new());
    requirement
}
