//! Shared fixture for integration tests: an application configuration with a
//! freshly generated signing key, and a token issuer that reads that same
//! configuration.

#![allow(dead_code)]

use actix_web::{http::header, test::TestRequest};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use minimal_weather_api::{AppConfig, Audience, BearerClaims, Environment, JwtBearerConfig};
use uuid::Uuid;

pub const TEST_ISSUER: &str = "minimal-weather-api-tests";

pub fn test_audiences() -> Vec<String> {
    vec![
        "http://localhost:5000".to_string(),
        "https://localhost:7000".to_string(),
    ]
}

/// Configuration of one application instance under test
pub struct TestApplication {
    config: AppConfig,
}

impl TestApplication {
    pub fn new() -> Self {
        Self::with_environment(Environment::Development)
    }

    pub fn with_environment(environment: Environment) -> Self {
        let key: [u8; 32] = rand::random();
        let config = AppConfig::default()
            .with_environment(environment)
            .with_jwt_bearer(JwtBearerConfig::new(TEST_ISSUER, key.to_vec(), test_audiences()));
        Self { config }
    }

    pub fn from_config(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Mint a token the application will accept for subject `id`
    pub fn create_token(&self, id: &str) -> String {
        let now = Utc::now();
        self.create_token_valid_between(id, now, now + Duration::days(1))
    }

    /// Mint a token with an explicit validity window
    ///
    /// Panics when the configuration has no signing key, issuer or audience:
    /// the fixture itself is broken in that case.
    pub fn create_token_valid_between(
        &self,
        id: &str,
        not_before: DateTime<Utc>,
        expires: DateTime<Utc>,
    ) -> String {
        let bearer = &self.config.jwt_bearer;
        let key = bearer
            .primary_key()
            .expect("test configuration must contain a signing key");
        assert!(!key.issuer.is_empty(), "signing key must have an issuer");
        assert!(!key.value.is_empty(), "signing key must not be empty");
        for audience in &bearer.valid_audiences {
            assert!(!audience.is_empty(), "audiences must not be empty");
        }

        let claims = BearerClaims {
            sub: id.to_string(),
            iss: key.issuer.clone(),
            aud: Audience::Multiple(bearer.valid_audiences.clone()),
            nbf: not_before.timestamp(),
            exp: expires.timestamp(),
            iat: Some(Utc::now().timestamp()),
            jti: Some(Uuid::new_v4().simple().to_string()),
            role: Vec::new(),
            scope: Vec::new(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&key.value),
        )
        .expect("token encoding should not fail")
    }

    /// A GET request carrying a bearer token for subject `id`
    pub fn authorized_get(&self, id: &str, uri: &str) -> TestRequest {
        TestRequest::get().uri(uri).insert_header((
            header::AUTHORIZATION,
            format!("Bearer {}", self.create_token(id)),
        ))
    }
}
