//! # Request Handlers
//!
//! Axum request handlers for the ATH Móvil gateway.

use crate::state::AppState;
use athm_client::probe_credentials;
use athm_core::error_codes::{self, ERROR_CODES};
use athm_core::{
    AthMovilError, BatchError, BatchReport, ErrorKind, FailurePolicy, NodeVariant, Operation,
    ParamBag,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Execute request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    /// Operation identifier, e.g. `findPayment`
    pub operation: String,
    /// Node variant (defaults to the configured one)
    #[serde(default)]
    pub variant: Option<NodeVariant>,
    /// Overrides the configured failure policy
    #[serde(default)]
    pub continue_on_fail: Option<bool>,
    /// One parameter object per item
    #[serde(default)]
    pub items: Vec<Value>,
}

/// Execute response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteResponse {
    pub execution_id: Uuid,
    #[serde(flatten)]
    pub report: BatchReport,
}

/// Catalogue entry for one operation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationInfo {
    pub operation: Operation,
    pub display_name: &'static str,
    pub description: &'static str,
    pub method: &'static str,
    pub path: &'static str,
    pub requires_auth_token: bool,
    pub required_params: Vec<&'static str>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VariantQuery {
    #[serde(default)]
    pub variant: Option<NodeVariant>,
}

/// Error response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            error_code: None,
            item_index: None,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_to_response(err: AthMovilError) -> ApiError {
    let code = err.status_code();
    let mut response = ErrorResponse::new(err.to_string(), code);
    response.error_code = err.error_code().map(String::from);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

fn batch_error_to_response(err: BatchError) -> ApiError {
    let status = match err.cause.kind {
        ErrorKind::Local => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Provider | ErrorKind::Transport | ErrorKind::Unknown => StatusCode::BAD_GATEWAY,
    };
    let mut response = ErrorResponse::new(err.message, status.as_u16());
    if let Some(description) = err.description {
        response = response.with_details(description);
    }
    response.error_code = err.cause.error_code;
    response.item_index = Some(err.item_index);
    (status, Json(response))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "athm-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Operation catalogue for a node variant
pub async fn list_operations(
    State(state): State<AppState>,
    Query(query): Query<VariantQuery>,
) -> impl IntoResponse {
    let variant = state.variant(query.variant);
    let capabilities = variant.capabilities();
    let operations: Vec<_> = Operation::ALL
        .into_iter()
        .map(|op| OperationInfo {
            operation: op,
            display_name: op.display_name(),
            description: op.description(),
            method: op.method().as_str(),
            path: op.path(),
            requires_auth_token: op.requires_auth_token(),
            required_params: op.required_params(capabilities),
        })
        .collect();

    Json(serde_json::json!({
        "variant": variant,
        "operations": operations,
        "count": operations.len()
    }))
}

/// Every known provider error code
pub async fn list_error_codes() -> impl IntoResponse {
    let codes: Vec<_> = ERROR_CODES
        .iter()
        .map(|(code, message)| serde_json::json!({ "code": code, "message": message }))
        .collect();
    Json(serde_json::json!({
        "codes": codes,
        "count": codes.len()
    }))
}

/// Describe a single error code
pub async fn get_error_code(Path(code): Path<String>) -> Result<impl IntoResponse, ApiError> {
    let message = error_codes::lookup(&code).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("Unknown error code: {}", code), 404)),
        )
    })?;

    Ok(Json(serde_json::json!({ "code": code, "message": message })))
}

/// Run an operation over a batch of items
#[instrument(skip(state, request), fields(operation = %request.operation, items = request.items.len()))]
pub async fn execute(
    State(state): State<AppState>,
    Json(request): Json<ExecuteRequest>,
) -> Result<Json<ExecuteResponse>, ApiError> {
    let operation: Operation = request.operation.parse().map_err(error_to_response)?;

    if request.items.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("No items in execute request", 400)),
        ));
    }

    let items = request
        .items
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            ParamBag::from_value(value).map_err(|e| {
                let (status, Json(mut response)) = error_to_response(e);
                response.item_index = Some(index);
                (status, Json(response))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let variant = state.variant(request.variant);
    let policy = FailurePolicy::from_continue_on_fail(
        request
            .continue_on_fail
            .unwrap_or(state.config.continue_on_fail),
    );
    let execution_id = Uuid::new_v4();

    info!(
        "Execution {}: {} x{} ({}, {:?})",
        execution_id,
        operation,
        items.len(),
        variant.as_str(),
        policy
    );

    let report = state
        .executor(variant)
        .run(operation, &items, policy)
        .await
        .map_err(|e| {
            error!("Execution {} aborted: {}", execution_id, e);
            batch_error_to_response(e)
        })?;

    Ok(Json(ExecuteResponse {
        execution_id,
        report,
    }))
}

/// Check the configured tokens against the provider
#[instrument(skip(state))]
pub async fn verify_credentials(State(state): State<AppState>) -> impl IntoResponse {
    let router = state.router(state.variant(None));
    match probe_credentials(state.transport.as_ref(), &router, &state.credentials).await {
        Ok(()) => Json(serde_json::json!({ "valid": true })),
        Err(e) => {
            warn!("Credentials rejected: {}", e);
            Json(serde_json::json!({
                "valid": false,
                "error": e.to_string(),
                "errorCode": e.error_code(),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use athm_core::NormalizedError;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error", 400).with_details("more");
        assert_eq!(err.error, "Test error");
        assert_eq!(err.code, 400);
        assert_eq!(err.details.as_deref(), Some("more"));
    }

    #[test]
    fn test_error_conversion() {
        let (status, Json(body)) = error_to_response(AthMovilError::UnsupportedOperation {
            operation: "voidPayment".into(),
        });
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error_code.is_none());

        let (status, Json(body)) = error_to_response(AthMovilError::Provider {
            error_code: "BTRA_0031".into(),
            friendly_message: "EcommerceId does not exist".into(),
            api_message: "not found".into(),
        });
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.error_code.as_deref(), Some("BTRA_0031"));
    }

    #[test]
    fn test_local_batch_error_is_unprocessable() {
        let err = BatchError {
            item_index: 2,
            message: "Missing required parameter: ecommerceId".into(),
            description: None,
            cause: NormalizedError::from_local(&AthMovilError::missing("ecommerceId")),
        };
        let (status, Json(body)) = batch_error_to_response(err);
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.item_index, Some(2));
    }
}
