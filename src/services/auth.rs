//! Bearer token validation.

use crate::{config::JwtBearerConfig, models::BearerClaims};
use actix_web::http::header::HeaderValue;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use std::sync::Arc;
use thiserror::Error;

/// Reasons a request fails bearer authentication
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("authorization header is not a bearer token")]
    MalformedHeader,

    #[error("no signing keys are configured")]
    NoSigningKeys,

    #[error("invalid bearer token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

impl AuthError {
    /// Value for the `WWW-Authenticate` challenge sent with a 401
    pub fn challenge(&self) -> &'static str {
        match self {
            Self::MissingToken => "Bearer",
            _ => "Bearer error=\"invalid_token\"",
        }
    }
}

/// Extract the token from an `Authorization` header value
///
/// The scheme name is matched case-insensitively.
pub fn extract_bearer_token(header: &str) -> Result<&str, AuthError> {
    let (scheme, token) = header
        .trim()
        .split_once(' ')
        .ok_or(AuthError::MalformedHeader)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }
    Ok(token)
}

struct IssuerKey {
    issuer: String,
    key: DecodingKey,
}

/// Validates HS256 bearer tokens against the configured keys, issuers and
/// audiences
#[derive(Clone)]
pub struct BearerTokenValidator {
    keys: Arc<Vec<IssuerKey>>,
    audiences: Vec<String>,
}

impl BearerTokenValidator {
    pub fn new(config: &JwtBearerConfig) -> Self {
        let keys = config
            .signing_keys
            .iter()
            .map(|k| IssuerKey {
                issuer: k.issuer.clone(),
                key: DecodingKey::from_secret(&k.value),
            })
            .collect();

        Self {
            keys: Arc::new(keys),
            audiences: config.valid_audiences.clone(),
        }
    }

    /// Validate an `Authorization` header value, if one was sent
    ///
    /// A header that is present but not visible ASCII counts as malformed,
    /// not missing.
    pub fn validate_header(&self, header: Option<&HeaderValue>) -> Result<BearerClaims, AuthError> {
        let header = header
            .ok_or(AuthError::MissingToken)?
            .to_str()
            .map_err(|_| AuthError::MalformedHeader)?;
        self.validate(extract_bearer_token(header)?)
    }

    /// Validate a compact token
    ///
    /// Each configured key is tried in turn; the token is accepted by the
    /// first key whose signature, issuer, audience and lifetime checks pass.
    pub fn validate(&self, token: &str) -> Result<BearerClaims, AuthError> {
        let mut last_error = AuthError::NoSigningKeys;

        for entry in self.keys.iter() {
            match decode::<BearerClaims>(token, &entry.key, &self.validation(&entry.issuer)) {
                Ok(data) => return Ok(data.claims),
                Err(e) => last_error = AuthError::InvalidToken(e),
            }
        }

        Err(last_error)
    }

    fn validation(&self, issuer: &str) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(self.audiences.as_slice());
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "aud", "sub"]);
        validation.validate_nbf = true;
        validation
    }
}
