//! # Operation Router
//!
//! Turns an operation and its parameters into the exact request the provider
//! expects. Pure construction: no I/O happens here, the returned
//! [`OutboundRequest`] is executed by a [`crate::transport::Transport`].
//!
//! | Operation | Path | Auth header |
//! |-----------|------|-------------|
//! | createPayment | `/api/business-transaction/ecommerce/payment` | no |
//! | findPayment | `/api/business-transaction/ecommerce/business/findPayment` | no |
//! | authorizePayment | `/api/business-transaction/ecommerce/authorization` | yes |
//! | updatePhoneNumber | `/api/business-transaction/ecommerce/payment/updatePhoneNumber` | no |
//! | refundPayment | `/api/business-transaction/ecommerce/refund` | yes |
//! | cancelPayment | `/api/business-transaction/ecommerce/cancel` | no |

use crate::error::AthMovilResult;
use crate::model::{
    Credentials, PaymentRequest, RefundRequest, TransactionRef, UpdatePhoneNumberRequest,
};
use crate::operation::{param, Capabilities, Capability, HttpMethod, NodeVariant, Operation};
use crate::params::ParamBag;
use serde::Serialize;
use serde_json::Value;

/// Production host of the payment API
pub const DEFAULT_BASE_URL: &str = "https://payments.athmovil.com";

/// Header carrying the per-transaction auth token
pub const AUTHORIZATION_HEADER: &str = "authorization";

/// A fully-built request, ready for a transport
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundRequest {
    pub operation: Operation,
    pub method: HttpMethod,
    pub url: String,
    pub path: &'static str,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl OutboundRequest {
    /// Value of a header (case-insensitive name)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Builds provider requests for one node variant
#[derive(Debug, Clone)]
pub struct Router {
    base_url: String,
    capabilities: Capabilities,
}

impl Router {
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            capabilities,
        }
    }

    /// Router with the capabilities of a node variant
    pub fn for_variant(variant: NodeVariant) -> Self {
        Self::new(variant.capabilities())
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Build the request for `operation` from one item's parameters
    pub fn route(
        &self,
        operation: Operation,
        params: &ParamBag,
        credentials: &Credentials,
    ) -> AthMovilResult<OutboundRequest> {
        let public_token = credentials.public_token.clone();

        let body = match operation {
            Operation::CreatePayment => {
                let fields = params.additional_fields()?;
                let request = PaymentRequest {
                    public_token,
                    phone_number: params.require_str(param::PHONE_NUMBER)?,
                    total: params.require_amount(param::TOTAL)?,
                    metadata1: params.require_str(param::METADATA_1)?,
                    metadata2: params.require_str(param::METADATA_2)?,
                    items: params.items()?,
                    timeout: fields.timeout,
                    tax: fields.tax,
                    subtotal: fields.subtotal,
                };
                request.validate()?;
                serde_json::to_value(request)?
            }
            Operation::FindPayment | Operation::AuthorizePayment | Operation::CancelPayment => {
                serde_json::to_value(TransactionRef {
                    public_token,
                    ecommerce_id: params.require_str(param::ECOMMERCE_ID)?,
                })?
            }
            Operation::UpdatePhoneNumber => serde_json::to_value(UpdatePhoneNumberRequest {
                public_token,
                ecommerce_id: params.require_str(param::ECOMMERCE_ID)?,
                phone_number: params.require_str(param::NEW_PHONE_NUMBER)?,
            })?,
            Operation::RefundPayment => {
                let ecommerce_id = params.require_str(param::ECOMMERCE_ID)?;
                let request = if self
                    .capabilities
                    .supports(Capability::RefundReferenceAndAmount)
                {
                    RefundRequest {
                        public_token,
                        private_token: Some(credentials.private_token.clone()),
                        ecommerce_id,
                        reference_number: Some(params.require_str(param::REFERENCE_NUMBER)?),
                        amount: Some(params.require_amount(param::REFUND_AMOUNT)?),
                    }
                } else {
                    RefundRequest {
                        public_token,
                        private_token: None,
                        ecommerce_id,
                        reference_number: None,
                        amount: None,
                    }
                };
                request.validate()?;
                serde_json::to_value(request)?
            }
        };

        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        if operation.requires_auth_token() {
            headers.push((
                AUTHORIZATION_HEADER.to_string(),
                params.require_str(param::AUTH_TOKEN)?,
            ));
        }

        Ok(OutboundRequest {
            operation,
            method: operation.method(),
            url: format!("{}{}", self.base_url, operation.path()),
            path: operation.path(),
            headers,
            body,
        })
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::for_variant(NodeVariant::default())
    }
}
