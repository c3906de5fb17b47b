//! # ATH Móvil Configuration
//!
//! Configuration management for the ATH Móvil integration.
//! Tokens are loaded from environment variables (or a `.env` file).

use athm_core::{AthMovilError, Credentials, DEFAULT_BASE_URL};
use std::env;
use std::time::Duration;

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Provider environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// The provider only exposes a production host
    #[default]
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = AthMovilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "production" => Ok(Environment::Production),
            other => Err(AthMovilError::Configuration(format!(
                "ATHM_ENVIRONMENT must be production, got {other}"
            ))),
        }
    }
}

/// ATH Móvil API configuration
#[derive(Clone)]
pub struct AthMovilConfig {
    /// Public token of the ATH Business account
    pub public_token: String,

    /// Private token of the ATH Business account
    pub private_token: String,

    pub environment: Environment,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl AthMovilConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `ATHM_PUBLIC_TOKEN`
    /// - `ATHM_PRIVATE_TOKEN`
    ///
    /// Optional: `ATHM_ENVIRONMENT`, `ATHM_API_BASE_URL`, `ATHM_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self, AthMovilError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let public_token = required_var("ATHM_PUBLIC_TOKEN")?;
        let private_token = required_var("ATHM_PRIVATE_TOKEN")?;

        let environment = match env::var("ATHM_ENVIRONMENT") {
            Ok(value) => value.parse()?,
            Err(_) => Environment::Production,
        };

        let api_base_url =
            env::var("ATHM_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs = match env::var("ATHM_TIMEOUT_SECS") {
            Ok(value) => value.parse::<u64>().map_err(|_| {
                AthMovilError::Configuration(format!(
                    "ATHM_TIMEOUT_SECS must be a whole number of seconds, got {value}"
                ))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            public_token,
            private_token,
            environment,
            api_base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(public_token: impl Into<String>, private_token: impl Into<String>) -> Self {
        Self {
            public_token: public_token.into(),
            private_token: private_token.into(),
            environment: Environment::Production,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Tokens as handed to the router
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.public_token, &self.private_token)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Builder: set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for AthMovilConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AthMovilConfig")
            .field("environment", &self.environment)
            .field("api_base_url", &self.api_base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

fn required_var(name: &str) -> Result<String, AthMovilError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AthMovilError::Configuration(format!("{name} not set"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_config_defaults() {
        let config = AthMovilConfig::new("pub", "priv");
        assert_eq!(config.api_base_url, "https://payments.athmovil.com");
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.credentials(), Credentials::new("pub", "priv"));
    }

    #[test]
    fn test_debug_hides_tokens() {
        let config = AthMovilConfig::new("pub-secret", "priv-secret");
        let printed = format!("{config:?}");
        assert!(!printed.contains("pub-secret"));
        assert!(!printed.contains("priv-secret"));
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            "production".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert!("sandbox".parse::<Environment>().is_err());
    }

    #[test]
    fn test_from_env_missing_key() {
        // Clear any existing env vars
        env::remove_var("ATHM_PUBLIC_TOKEN");

        let result = AthMovilConfig::from_env();
        assert!(result.is_err());
    }
}
