//! # Response/Error Normalizer
//!
//! Classifies the raw outcome of a provider call. Checked in order:
//!
//! 1. structured provider error body (`{"status": "error", "message": ..}`),
//!    even when it arrives inside a non-2xx HTTP failure
//! 2. bare HTTP status code
//! 3. anything else
//!
//! Successful bodies pass through untouched.

use crate::error::AthMovilError;
use crate::error_codes::{self, UNKNOWN_ERROR_CODE};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Raw result of executing an outbound request
#[derive(Debug, Clone, PartialEq)]
pub enum TransportOutcome {
    /// Decoded JSON body of a successful response
    Success(Value),
    /// Anything that did not produce a successful body
    Failure(TransportFailure),
}

/// A failed call as reported by the transport
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportFailure {
    /// HTTP status, when a response was received
    pub status_code: Option<u16>,
    /// Decoded response body, when one was received
    pub body: Option<Value>,
    /// Transport's description of the failure
    pub message: String,
}

impl TransportFailure {
    /// A non-2xx response
    pub fn http(status_code: u16, body: Option<Value>, message: impl Into<String>) -> Self {
        Self {
            status_code: Some(status_code),
            body,
            message: message.into(),
        }
    }

    /// A failure with no HTTP response (connect, timeout, decode)
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status_code: None,
            body: None,
            message: message.into(),
        }
    }

    /// Builder: attach a decoded body
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Error body returned by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderErrorBody {
    pub status: String,
    pub message: String,
    #[serde(default)]
    pub errorcode: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl ProviderErrorBody {
    /// Recognise `{"status": "error", "message": ..}`
    pub fn detect(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        if obj.get("status").and_then(Value::as_str) != Some("error") {
            return None;
        }
        let message = obj.get("message")?;
        Some(Self {
            status: "error".to_string(),
            message: match message {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            },
            errorcode: obj
                .get("errorcode")
                .and_then(Value::as_str)
                .filter(|c| !c.is_empty())
                .map(String::from),
            data: obj.get("data").cloned().unwrap_or(Value::Null),
        })
    }
}

/// Which branch of the classification produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Provider,
    Transport,
    Unknown,
    /// Rejected by the router before any request was sent
    Local,
}

/// A failure translated for the operator
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedError {
    pub kind: ErrorKind,
    /// Headline message
    pub message: String,
    /// Provider error code (provider errors only)
    pub error_code: Option<String>,
    /// Longer explanation for the operator
    pub description: Option<String>,
    /// Diagnostic fields, always a JSON object
    pub details: Value,
}

impl NormalizedError {
    fn provider(body: &ProviderErrorBody) -> Self {
        let error_code = body
            .errorcode
            .clone()
            .unwrap_or_else(|| UNKNOWN_ERROR_CODE.to_string());
        let api_message = if body.message.is_empty() {
            "An error occurred"
        } else {
            body.message.as_str()
        };
        let friendly_message = error_codes::friendly_message(&error_code, api_message);

        Self {
            kind: ErrorKind::Provider,
            message: format!("ATH Móvil Error: {friendly_message}"),
            description: Some(format!(
                "Error Code: {error_code}\nAPI Message: {api_message}"
            )),
            details: json!({
                "errorCode": error_code,
                "apiMessage": api_message,
                "friendlyMessage": friendly_message,
                "status": body.status,
            }),
            error_code: Some(error_code),
        }
    }

    fn transport(status_code: u16, message: &str) -> Self {
        let message = if message.is_empty() {
            "HTTP Error"
        } else {
            message
        };
        Self {
            kind: ErrorKind::Transport,
            message: format!("HTTP {status_code}: {message}"),
            error_code: None,
            description: Some(format!("Status Code: {status_code}")),
            details: json!({
                "statusCode": status_code,
                "error": message,
            }),
        }
    }

    /// Catch-all classification for any other failure text
    pub fn unknown(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.is_empty() {
            "An unknown error occurred".to_string()
        } else {
            message
        };
        Self {
            kind: ErrorKind::Unknown,
            details: json!({ "error": message }),
            message,
            error_code: None,
            description: None,
        }
    }

    /// Normalize a failure that happened before the request was sent
    pub fn from_local(err: &AthMovilError) -> Self {
        Self {
            kind: ErrorKind::Local,
            ..Self::unknown(err.to_string())
        }
    }

    /// Friendly message of a provider error
    pub fn friendly_message(&self) -> Option<&str> {
        self.details.get("friendlyMessage").and_then(Value::as_str)
    }

    /// Record emitted for a failed item when the batch continues:
    /// `{error, errorCode?, ...details}`
    pub fn to_record(&self) -> Value {
        let mut record = Map::new();
        record.insert("error".to_string(), Value::String(self.message.clone()));
        if let Some(code) = &self.error_code {
            record.insert("errorCode".to_string(), Value::String(code.clone()));
        }
        if let Value::Object(details) = &self.details {
            for (k, v) in details {
                record.insert(k.clone(), v.clone());
            }
        }
        Value::Object(record)
    }
}

impl From<NormalizedError> for AthMovilError {
    fn from(err: NormalizedError) -> Self {
        match err.kind {
            ErrorKind::Provider => AthMovilError::Provider {
                error_code: err.error_code.unwrap_or_else(|| UNKNOWN_ERROR_CODE.to_string()),
                friendly_message: err
                    .details
                    .get("friendlyMessage")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                api_message: err
                    .details
                    .get("apiMessage")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            },
            ErrorKind::Transport => AthMovilError::Transport {
                status_code: err
                    .details
                    .get("statusCode")
                    .and_then(Value::as_u64)
                    .and_then(|c| u16::try_from(c).ok())
                    .unwrap_or(0),
                message: err
                    .details
                    .get("error")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            },
            ErrorKind::Unknown | ErrorKind::Local => AthMovilError::Unknown(err.message),
        }
    }
}

/// Result of one provider call after normalization
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedResult {
    Success { payload: Value },
    Failure(NormalizedError),
}

impl NormalizedResult {
    pub fn into_result(self) -> Result<Value, NormalizedError> {
        match self {
            NormalizedResult::Success { payload } => Ok(payload),
            NormalizedResult::Failure(err) => Err(err),
        }
    }
}

/// Classify a transport outcome
pub fn normalize(outcome: TransportOutcome) -> NormalizedResult {
    let failure = match outcome {
        TransportOutcome::Success(payload) => return NormalizedResult::Success { payload },
        TransportOutcome::Failure(failure) => failure,
    };

    if let Some(body) = failure.body.as_ref().and_then(ProviderErrorBody::detect) {
        return NormalizedResult::Failure(NormalizedError::provider(&body));
    }

    if let Some(status_code) = failure.status_code {
        return NormalizedResult::Failure(NormalizedError::transport(
            status_code,
            &failure.message,
        ));
    }

    NormalizedResult::Failure(NormalizedError::unknown(failure.message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(outcome: TransportOutcome) -> NormalizedError {
        match normalize(outcome) {
            NormalizedResult::Failure(err) => err,
            NormalizedResult::Success { .. } => panic!("expected failure"),
        }
    }

    #[test]
    fn test_success_passes_through() {
        let payload = json!({
            "status": "success",
            "data": {"ecommerceId": "ec-1", "auth_token": "tok", "nested": [1, 2, {"x": null}]}
        });
        let result = normalize(TransportOutcome::Success(payload.clone()));
        assert_eq!(result, NormalizedResult::Success { payload });
    }

    #[test]
    fn test_provider_error_inside_http_failure() {
        let err = failure(TransportOutcome::Failure(TransportFailure::http(
            400,
            Some(json!({
                "status": "error",
                "errorcode": "BTRA_0031",
                "message": "EcommerceId does not exist",
                "data": null
            })),
            "Bad Request",
        )));

        assert_eq!(err.kind, ErrorKind::Provider);
        assert_eq!(err.message, "ATH Móvil Error: EcommerceId does not exist");
        assert_eq!(err.error_code.as_deref(), Some("BTRA_0031"));
        assert_eq!(
            err.description.as_deref(),
            Some("Error Code: BTRA_0031\nAPI Message: EcommerceId does not exist")
        );
        assert_eq!(err.details["status"], "error");
    }

    #[test]
    fn test_provider_error_without_status_code() {
        let err = failure(TransportOutcome::Failure(
            TransportFailure::network("rejected").with_body(json!({
                "status": "error",
                "errorcode": "BTRA_0031",
                "message": "EcommerceId does not exist"
            })),
        ));
        assert_eq!(err.kind, ErrorKind::Provider);
        assert_eq!(err.error_code.as_deref(), Some("BTRA_0031"));
    }

    #[test]
    fn test_unrecognized_code_uses_api_message() {
        let err = failure(TransportOutcome::Failure(TransportFailure::http(
            400,
            Some(json!({"status": "error", "errorcode": "BTRA_9876", "message": "Weird"})),
            "Bad Request",
        )));
        assert_eq!(err.friendly_message(), Some("Weird"));
        assert_eq!(err.message, "ATH Móvil Error: Weird");
        assert_eq!(err.details["apiMessage"], "Weird");
    }

    #[test]
    fn test_missing_code_defaults_to_unknown() {
        let err = failure(TransportOutcome::Failure(TransportFailure::http(
            500,
            Some(json!({"status": "error", "message": "Something broke"})),
            "Internal Server Error",
        )));
        assert_eq!(err.error_code.as_deref(), Some("UNKNOWN"));
        assert_eq!(err.friendly_message(), Some("Something broke"));
    }

    #[test]
    fn test_translated_message_replaces_api_message() {
        let err = failure(TransportOutcome::Failure(TransportFailure::http(
            401,
            Some(json!({"status": "error", "errorcode": "BTRA_0402", "message": "token exp"})),
            "Unauthorized",
        )));
        assert_eq!(err.message, "ATH Móvil Error: Authorization token expired");
        assert_eq!(err.details["apiMessage"], "token exp");
    }

    #[test]
    fn test_bare_status_code() {
        let err = failure(TransportOutcome::Failure(TransportFailure::http(
            503,
            None,
            "Service Unavailable",
        )));
        assert_eq!(err.kind, ErrorKind::Transport);
        assert_eq!(err.message, "HTTP 503: Service Unavailable");
        assert_eq!(
            err.details,
            json!({"statusCode": 503, "error": "Service Unavailable"})
        );
        assert!(err.error_code.is_none());
    }

    #[test]
    fn test_non_provider_body_is_transport_error() {
        let err = failure(TransportOutcome::Failure(TransportFailure::http(
            502,
            Some(json!({"status": "ok"})),
            "Bad Gateway",
        )));
        assert_eq!(err.kind, ErrorKind::Transport);
    }

    #[test]
    fn test_unknown_failure() {
        let err = failure(TransportOutcome::Failure(TransportFailure::network(
            "connection refused",
        )));
        assert_eq!(err.kind, ErrorKind::Unknown);
        assert_eq!(err.message, "connection refused");
        assert_eq!(err.details, json!({"error": "connection refused"}));

        let err = failure(TransportOutcome::Failure(TransportFailure::default()));
        assert_eq!(err.message, "An unknown error occurred");
    }

    #[test]
    fn test_local_failure_keeps_unknown_shape() {
        let err = NormalizedError::from_local(&AthMovilError::missing("ecommerceId"));
        assert_eq!(err.kind, ErrorKind::Local);
        assert_eq!(
            err.to_record(),
            json!({"error": "Missing required parameter: ecommerceId"})
        );
        assert_eq!(
            AthMovilError::from(err),
            AthMovilError::Unknown("Missing required parameter: ecommerceId".into())
        );
    }

    #[test]
    fn test_record_shape() {
        let err = failure(TransportOutcome::Failure(TransportFailure::http(
            400,
            Some(json!({"status": "error", "errorcode": "BTRA_0031", "message": "x"})),
            "Bad Request",
        )));
        let record = err.to_record();
        assert_eq!(record["error"], "ATH Móvil Error: EcommerceId does not exist");
        assert_eq!(record["errorCode"], "BTRA_0031");
        assert_eq!(record["friendlyMessage"], "EcommerceId does not exist");
        assert_eq!(record["apiMessage"], "x");

        let record = NormalizedError::unknown("boom").to_record();
        assert!(record.get("errorCode").is_none());
    }

    #[test]
    fn test_into_error() {
        let err = failure(TransportOutcome::Failure(TransportFailure::http(
            400,
            Some(json!({"status": "error", "errorcode": "BTRA_0031", "message": "x"})),
            "Bad Request",
        )));
        let err: AthMovilError = err.into();
        assert_eq!(
            err,
            AthMovilError::Provider {
                error_code: "BTRA_0031".into(),
                friendly_message: "EcommerceId does not exist".into(),
                api_message: "x".into(),
            }
        );
    }
}
