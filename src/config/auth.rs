//! JWT bearer authentication configuration.

use super::ConfigError;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::env;

pub const ISSUER_VAR: &str = "JWT_BEARER_ISSUER";
pub const SIGNING_KEY_VAR: &str = "JWT_BEARER_SIGNING_KEY";
pub const VALID_AUDIENCES_VAR: &str = "JWT_BEARER_VALID_AUDIENCES";

/// A symmetric signing key together with the issuer allowed to use it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigningKeyConfig {
    pub issuer: String,
    pub value: Vec<u8>,
}

/// Settings consumed by the bearer authentication middleware
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JwtBearerConfig {
    pub signing_keys: Vec<SigningKeyConfig>,
    pub valid_audiences: Vec<String>,
}

impl JwtBearerConfig {
    /// Build a configuration with a single signing key
    pub fn new(issuer: impl Into<String>, key: impl Into<Vec<u8>>, audiences: Vec<String>) -> Self {
        Self {
            signing_keys: vec![SigningKeyConfig {
                issuer: issuer.into(),
                value: key.into(),
            }],
            valid_audiences: audiences,
        }
    }

    /// Load configuration from environment variables
    ///
    /// The signing key is base64 encoded. With no key configured the result
    /// has no signing keys and every protected request is rejected.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            env::var(ISSUER_VAR).ok(),
            env::var(SIGNING_KEY_VAR).ok(),
            env::var(VALID_AUDIENCES_VAR).ok(),
        )
    }

    pub(crate) fn from_vars(
        issuer: Option<String>,
        signing_key: Option<String>,
        audiences: Option<String>,
    ) -> Result<Self, ConfigError> {
        let signing_keys = match signing_key.filter(|v| !v.trim().is_empty()) {
            Some(encoded) => {
                let issuer = issuer
                    .filter(|v| !v.trim().is_empty())
                    .ok_or(ConfigError::MissingVar { var: ISSUER_VAR })?;
                let value = STANDARD
                    .decode(encoded.trim())
                    .map_err(|source| ConfigError::InvalidSigningKey {
                        var: SIGNING_KEY_VAR,
                        source,
                    })?;
                vec![SigningKeyConfig { issuer, value }]
            }
            None => Vec::new(),
        };

        let valid_audiences = audiences
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            signing_keys,
            valid_audiences,
        })
    }

    /// First configured signing key, used when minting tokens
    pub fn primary_key(&self) -> Option<&SigningKeyConfig> {
        self.signing_keys.first()
    }
}
