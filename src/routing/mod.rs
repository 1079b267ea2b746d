//! Route metadata, route groups and the conventions applied when routes are
//! finalized.
//!
//! Routes are described here independently of the actix service tree: the
//! finalized [`RouteTable`] drives both the bearer authentication guard and
//! the OpenAPI document.

pub mod builder;
pub mod metadata;
pub mod security;

pub use builder::*;
pub use metadata::*;
pub use security::*;

use actix_web::http::Method;

/// The finalized set of endpoints an application serves
#[derive(Clone, Debug, Default)]
pub struct RouteTable {
    endpoints: Vec<Endpoint>,
}

impl RouteTable {
    pub fn new(endpoints: Vec<Endpoint>) -> Self {
        Self { endpoints }
    }

    pub fn extend(&mut self, endpoints: impl IntoIterator<Item = Endpoint>) {
        self.endpoints.extend(endpoints);
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn find(&self, method: &Method, pattern: &str) -> Option<&Endpoint> {
        self.endpoints
            .iter()
            .find(|e| e.method() == method && e.pattern() == pattern)
    }

    /// Whether the resource serving `pattern` must be guarded
    ///
    /// The guard sits on the whole resource, so one protected method protects
    /// every method routed to it.
    pub fn requires_authentication(&self, pattern: &str) -> bool {
        self.endpoints
            .iter()
            .filter(|e| e.pattern() == pattern)
            .any(|e| e.posture().requires_authentication())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_authentication_lookup() {
        let mut protected = RouteGroupBuilder::new("/");
        protected.require_authorization();
        protected.map_get("/private");
        protected.map_get("/open").allow_anonymous();

        let mut table = RouteTable::new(protected.build());
        let mut public = RouteGroupBuilder::new("/public");
        public.map_get("/");
        table.extend(public.build());

        assert!(table.requires_authentication("/private"));
        assert!(!table.requires_authentication("/open"));
        assert!(!table.requires_authentication("/public"));
        assert!(!table.requires_authentication("/missing"));
        assert_eq!(table.endpoints().len(), 3);
        assert!(table.find(&Method::GET, "/private").is_some());
        assert!(table.find(&Method::POST, "/private").is_none());
    }

    #[test]
    fn test_any_protected_method_guards_the_resource() {
        let mut group = RouteGroupBuilder::new("/");
        group.map_get("/items").allow_anonymous();
        group.map(Method::POST, "/items").require_authorization();

        let table = RouteTable::new(group.build());

        assert!(table.requires_authentication("/items"));
    }
}
