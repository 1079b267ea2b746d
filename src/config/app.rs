//! Application-level configuration: hosting environment, bind address and HTTPS.

use super::{ConfigError, JwtBearerConfig};
use std::{env, fmt};

/// Hosting environment the application runs in
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
    Other(String),
}

impl Environment {
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "development" | "dev" => Self::Development,
            "staging" => Self::Staging,
            "production" | "prod" | "" => Self::Production,
            _ => Self::Other(name.trim().to_string()),
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => f.write_str("Development"),
            Self::Staging => f.write_str("Staging"),
            Self::Production => f.write_str("Production"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// Configuration for HTTP to HTTPS redirection
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpsRedirectionConfig {
    /// Port advertised in redirects; `None` disables redirection
    pub https_port: Option<u16>,
}

/// Top-level configuration, loaded once at startup
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub environment: Environment,
    pub bind_address: String,
    pub https: HttpsRedirectionConfig,
    pub jwt_bearer: JwtBearerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Production,
            bind_address: "127.0.0.1:8080".to_string(),
            https: HttpsRedirectionConfig::default(),
            jwt_bearer: JwtBearerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = env::var("APP_ENVIRONMENT")
            .map(|v| Environment::parse(&v))
            .unwrap_or(Environment::Production);

        let bind_address =
            env::var("APP_BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

        let https_port = match env::var("HTTPS_PORT") {
            Ok(value) if !value.trim().is_empty() => {
                Some(value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    var: "HTTPS_PORT",
                    value: value.clone(),
                })?)
            }
            _ => None,
        };

        Ok(Self {
            environment,
            bind_address,
            https: HttpsRedirectionConfig { https_port },
            jwt_bearer: JwtBearerConfig::from_env()?,
        })
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_jwt_bearer(mut self, jwt_bearer: JwtBearerConfig) -> Self {
        self.jwt_bearer = jwt_bearer;
        self
    }

    pub fn with_https_port(mut self, port: Option<u16>) -> Self {
        self.https.https_port = port;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parsing() {
        assert_eq!(Environment::parse("Development"), Environment::Development);
        assert_eq!(Environment::parse("dev"), Environment::Development);
        assert_eq!(Environment::parse("PRODUCTION"), Environment::Production);
        assert_eq!(Environment::parse("Staging"), Environment::Staging);
        assert_eq!(
            Environment::parse("Testing"),
            Environment::Other("Testing".to_string())
        );
        assert!(!Environment::parse("Testing").is_development());
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert_eq!(config.https.https_port, None);
        assert!(config.jwt_bearer.signing_keys.is_empty());
    }
}
