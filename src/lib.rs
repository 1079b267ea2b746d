//! Minimal Weather API - mock forecasts behind JWT bearer authentication
//!
//! A small Actix Web and Paperclip service that demonstrates:
//! - Route groups whose conventions attach metadata at build time
//! - Bearer token validation driven by that metadata
//! - OpenAPI security requirements derived from the same metadata
//! - A mock five-day weather forecast endpoint
//!
//! ## Architecture
//!
//! - `routing/` - Endpoint metadata, route groups and the security annotator
//! - `handlers/` - HTTP handlers, route registration and the app factory
//! - `middleware/` - Bearer authentication, HTTPS redirection, request IDs
//! - `services/` - Forecast generation and token validation
//! - `models/` - Response, claim and audit types
//! - `config/` - Typed configuration loaded from the environment
//! - `telemetry` - Tracing subscriber setup
//!
//! ## Quick Start
//!
//! ```no_run
//! use actix_web::HttpServer;
//! use minimal_weather_api::{AppConfig, create_app};
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let config = AppConfig::default();
//!     HttpServer::new(move || create_app(&config))
//!         .bind("127.0.0.1:8080")?
//!         .run()
//!         .await
//! }
//! ```

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routing;
pub mod services;
pub mod telemetry;
pub mod utils;

pub use config::{AppConfig, ConfigError, Environment, JwtBearerConfig, SigningKeyConfig};
pub use handlers::{
    OpenApiDocument, SWAGGER_JSON_PATH, SWAGGER_UI_PATH, WEATHER_FORECAST_PATH,
    add_weather_endpoints, apply_route_metadata, build_routes, create_app, create_openapi_spec,
    get_weather_forecast,
};
pub use middleware::{BearerAuthentication, HttpsRedirection, RequestIdMiddleware};
pub use models::{
    Audience, AuthAuditEvent, AuthEventOutcome, AuthEventType, AuthenticatedUser, BearerClaims,
    SUMMARIES, WeatherForecast,
};
pub use routing::{
    AuthorizationPosture, Endpoint, EndpointConventionBuilder, EndpointMetadata,
    OperationDescriptor, RouteGroupBuilder, RouteTable, add_openapi_security_requirement,
    add_required_security_metadata,
};
pub use services::{AuthError, BearerTokenValidator, generate_forecast};
