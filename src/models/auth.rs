//! Bearer token claim models.

use serde::{Deserialize, Serialize};

/// The `aud` claim, which may be a single string or a list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Self::Single(value) => value == audience,
            Self::Multiple(values) => values.iter().any(|v| v == audience),
        }
    }
}

/// Registered and application claims carried by a bearer token
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BearerClaims {
    pub sub: String,
    pub iss: String,
    pub aud: Audience,
    pub nbf: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    #[serde(default)]
    pub role: Vec<String>,
    #[serde(default)]
    pub scope: Vec<String>,
}

/// Identity attached to the request extensions after successful authentication
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub subject: String,
    pub claims: BearerClaims,
}

impl From<BearerClaims> for AuthenticatedUser {
    fn from(claims: BearerClaims) -> Self {
        Self {
            subject: claims.sub.clone(),
            claims,
        }
    }
}
