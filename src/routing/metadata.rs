//! Endpoint metadata: the annotations attached to a route while it is built.

use std::{collections::BTreeMap, sync::Arc};

/// Maps a security scheme name to the scopes an operation requires from it
pub type SecurityRequirement = BTreeMap<String, Vec<String>>;

/// Marker data for a route that requires an authorized caller
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthorizeData {
    pub policy: Option<String>,
    pub roles: Vec<String>,
    pub schemes: Vec<String>,
}

/// Response type a route declares it produces
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProducesResponse {
    pub status: u16,
    pub content_type: String,
    pub schema: &'static str,
}

/// OpenAPI description of a single operation
///
/// Instances are shared behind an `Arc` once attached to an endpoint; they
/// are replaced, never changed in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub operation_id: Option<String>,
    pub tags: Vec<String>,
    pub security: Vec<SecurityRequirement>,
}

impl OperationDescriptor {
    /// Copy of this descriptor with one more security requirement
    pub fn with_security_requirement(&self, requirement: SecurityRequirement) -> Self {
        let mut operation = self.clone();
        operation.security.push(requirement);
        operation
    }
}

/// A single annotation attached to an endpoint
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EndpointMetadata {
    AllowAnonymous,
    Authorize(AuthorizeData),
    OpenApiOperation(Arc<OperationDescriptor>),
    EndpointName(String),
    Tags(Vec<String>),
    Produces(ProducesResponse),
}

impl EndpointMetadata {
    pub fn as_operation(&self) -> Option<&Arc<OperationDescriptor>> {
        match self {
            Self::OpenApiOperation(operation) => Some(operation),
            _ => None,
        }
    }
}

/// Whether a route demands an authenticated caller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthorizationPosture {
    Anonymous,
    RequiresAuthentication,
}

impl AuthorizationPosture {
    /// Classify a route from all of its metadata
    ///
    /// `AllowAnonymous` wins over any number of `Authorize` markers, whatever
    /// their order.
    pub fn classify(metadata: &[EndpointMetadata]) -> Self {
        let mut posture = Self::Anonymous;
        for item in metadata {
            match item {
                EndpointMetadata::AllowAnonymous => return Self::Anonymous,
                EndpointMetadata::Authorize(_) => posture = Self::RequiresAuthentication,
                _ => {}
            }
        }
        posture
    }

    pub fn requires_authentication(self) -> bool {
        self == Self::RequiresAuthentication
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authorize() -> EndpointMetadata {
        EndpointMetadata::Authorize(AuthorizeData::default())
    }

    #[test]
    fn test_no_markers_is_anonymous() {
        let metadata = vec![EndpointMetadata::EndpointName("Get".to_string())];
        assert_eq!(
            AuthorizationPosture::classify(&metadata),
            AuthorizationPosture::Anonymous
        );
        assert_eq!(AuthorizationPosture::classify(&[]), AuthorizationPosture::Anonymous);
    }

    #[test]
    fn test_authorize_requires_authentication() {
        let metadata = vec![
            EndpointMetadata::Tags(vec!["Weather".to_string()]),
            authorize(),
            authorize(),
        ];
        assert!(AuthorizationPosture::classify(&metadata).requires_authentication());
    }

    #[test]
    fn test_allow_anonymous_wins_in_any_position() {
        let before = vec![EndpointMetadata::AllowAnonymous, authorize(), authorize()];
        let after = vec![authorize(), authorize(), EndpointMetadata::AllowAnonymous];
        let between = vec![authorize(), EndpointMetadata::AllowAnonymous, authorize()];

        for metadata in [before, after, between] {
            assert_eq!(
                AuthorizationPosture::classify(&metadata),
                AuthorizationPosture::Anonymous
            );
        }
    }

    #[test]
    fn test_with_security_requirement_leaves_original_untouched() {
        let original = OperationDescriptor {
            operation_id: Some("GetWeatherForecast".to_string()),
            ..Default::default()
        };
        let mut requirement = SecurityRequirement::new();
        requirement.insert("Bearer".to_string(), Vec::new());

        let updated = original.with_security_requirement(requirement.clone());

        assert!(original.security.is_empty());
        assert_eq!(updated.security, vec![requirement]);
        assert_eq!(updated.operation_id, original.operation_id);
    }
}
