//! # Error Types
//!
//! Typed error handling for the ATH Móvil adapter.
//! Routing and client operations return `Result<T, AthMovilError>`.

use thiserror::Error;

/// Core error type for routing, transport and provider failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AthMovilError {
    /// Configuration errors (missing tokens, invalid environment)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Operation identifier not in the catalogue
    #[error("Unsupported operation: {operation}")]
    UnsupportedOperation { operation: String },

    /// A required parameter is absent or blank
    #[error("Missing required parameter: {name}")]
    MissingParameter { name: String },

    /// A parameter is present but outside its allowed shape or range
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Structured error body returned by the provider
    #[error("ATH Móvil Error: {friendly_message}")]
    Provider {
        error_code: String,
        friendly_message: String,
        api_message: String,
    },

    /// Non-2xx HTTP response without a structured provider body
    #[error("HTTP {status_code}: {message}")]
    Transport { status_code: u16, message: String },

    /// Anything else (network failures, undecodable bodies)
    #[error("{0}")]
    Unknown(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AthMovilError {
    /// Shorthand for [`AthMovilError::MissingParameter`]
    pub fn missing(name: impl Into<String>) -> Self {
        AthMovilError::MissingParameter { name: name.into() }
    }

    /// Shorthand for [`AthMovilError::InvalidParameter`]
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        AthMovilError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Provider error code, when the provider supplied one
    pub fn error_code(&self) -> Option<&str> {
        match self {
            AthMovilError::Provider { error_code, .. } => Some(error_code),
            _ => None,
        }
    }

    /// Returns true if the failure happened before any request left the process
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            AthMovilError::Configuration(_)
                | AthMovilError::UnsupportedOperation { .. }
                | AthMovilError::MissingParameter { .. }
                | AthMovilError::InvalidParameter { .. }
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AthMovilError::Configuration(_) => 500,
            AthMovilError::UnsupportedOperation { .. } => 400,
            AthMovilError::MissingParameter { .. } => 400,
            AthMovilError::InvalidParameter { .. } => 422,
            AthMovilError::Provider { .. } => 502,
            AthMovilError::Transport { .. } => 502,
            AthMovilError::Unknown(_) => 500,
            AthMovilError::Serialization(_) => 500,
        }
    }
}

impl From<serde_json::Error> for AthMovilError {
    fn from(err: serde_json::Error) -> Self {
        AthMovilError::Serialization(err.to_string())
    }
}

/// Result type alias for adapter operations
pub type AthMovilResult<T> = Result<T, AthMovilError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_errors() {
        assert!(AthMovilError::missing("ecommerceId").is_local());
        assert!(AthMovilError::UnsupportedOperation {
            operation: "voidPayment".into()
        }
        .is_local());
        assert!(!AthMovilError::Unknown("socket closed".into()).is_local());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AthMovilError::missing("total").status_code(), 400);
        assert_eq!(
            AthMovilError::invalid("total", "must be at least 1.00").status_code(),
            422
        );
        assert_eq!(
            AthMovilError::Transport {
                status_code: 503,
                message: "Service Unavailable".into()
            }
            .status_code(),
            502
        );
    }

    #[test]
    fn test_display() {
        let err = AthMovilError::Provider {
            error_code: "BTRA_0031".into(),
            friendly_message: "EcommerceId does not exist".into(),
            api_message: "ecommerce not found".into(),
        };
        assert_eq!(err.to_string(), "ATH Móvil Error: EcommerceId does not exist");
        assert_eq!(err.error_code(), Some("BTRA_0031"));

        let err = AthMovilError::missing("authToken");
        assert_eq!(err.to_string(), "Missing required parameter: authToken");
    }
}
