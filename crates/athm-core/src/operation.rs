//! # Operation Catalogue
//!
//! The six ATH Móvil e-commerce operations, their fixed endpoints and the
//! parameters each one needs.
//!
//! Two node variants exist: the basic node and the tool node aimed at agent
//! callers. They share one catalogue and differ only by [`Capabilities`].

use crate::error::AthMovilError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Parameter names as supplied by the host
pub mod param {
    pub const PHONE_NUMBER: &str = "phoneNumber";
    pub const TOTAL: &str = "total";
    pub const METADATA_1: &str = "metadata1";
    pub const METADATA_2: &str = "metadata2";
    pub const ITEMS: &str = "items";
    pub const ADDITIONAL_FIELDS: &str = "additionalFields";
    pub const ECOMMERCE_ID: &str = "ecommerceId";
    pub const NEW_PHONE_NUMBER: &str = "newPhoneNumber";
    pub const AUTH_TOKEN: &str = "authToken";
    pub const REFERENCE_NUMBER: &str = "referenceNumber";
    pub const REFUND_AMOUNT: &str = "refundAmount";
}

/// An operation exposed by the node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    CreatePayment,
    FindPayment,
    AuthorizePayment,
    UpdatePhoneNumber,
    RefundPayment,
    CancelPayment,
}

impl Operation {
    /// Every operation, in display order
    pub const ALL: [Operation; 6] = [
        Operation::CreatePayment,
        Operation::FindPayment,
        Operation::AuthorizePayment,
        Operation::UpdatePhoneNumber,
        Operation::RefundPayment,
        Operation::CancelPayment,
    ];

    /// Identifier used by the host
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CreatePayment => "createPayment",
            Operation::FindPayment => "findPayment",
            Operation::AuthorizePayment => "authorizePayment",
            Operation::UpdatePhoneNumber => "updatePhoneNumber",
            Operation::RefundPayment => "refundPayment",
            Operation::CancelPayment => "cancelPayment",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Operation::CreatePayment => "Create Payment",
            Operation::FindPayment => "Find Payment",
            Operation::AuthorizePayment => "Authorize Payment",
            Operation::UpdatePhoneNumber => "Update Phone Number",
            Operation::RefundPayment => "Refund Payment",
            Operation::CancelPayment => "Cancel Payment",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Operation::CreatePayment => {
                "Create a new payment transaction. Returns ecommerceId and auth_token for future operations."
            }
            Operation::FindPayment => {
                "Retrieve payment transaction details and status (OPEN, CONFIRM, COMPLETED, CANCEL) using ecommerceId"
            }
            Operation::AuthorizePayment => {
                "Process and complete a payment that was confirmed by the customer. Requires auth_token from create payment."
            }
            Operation::UpdatePhoneNumber => {
                "Update the customer phone number associated with an existing payment transaction"
            }
            Operation::RefundPayment => {
                "Issue a full or partial refund for a completed payment transaction"
            }
            Operation::CancelPayment => {
                "Cancel a pending payment transaction that has not been completed"
            }
        }
    }

    /// Fixed request path on the provider host
    pub fn path(&self) -> &'static str {
        match self {
            Operation::CreatePayment => "/api/business-transaction/ecommerce/payment",
            Operation::FindPayment => "/api/business-transaction/ecommerce/business/findPayment",
            Operation::AuthorizePayment => "/api/business-transaction/ecommerce/authorization",
            Operation::UpdatePhoneNumber => {
                "/api/business-transaction/ecommerce/payment/updatePhoneNumber"
            }
            Operation::RefundPayment => "/api/business-transaction/ecommerce/refund",
            Operation::CancelPayment => "/api/business-transaction/ecommerce/cancel",
        }
    }

    /// HTTP method (every provider endpoint is a POST)
    pub fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    /// Whether the request carries the `authorization` header
    pub fn requires_auth_token(&self) -> bool {
        matches!(self, Operation::AuthorizePayment | Operation::RefundPayment)
    }

    /// Required parameter names under the given capabilities
    pub fn required_params(&self, capabilities: Capabilities) -> Vec<&'static str> {
        match self {
            Operation::CreatePayment => vec![
                param::PHONE_NUMBER,
                param::TOTAL,
                param::METADATA_1,
                param::METADATA_2,
            ],
            Operation::FindPayment | Operation::CancelPayment => vec![param::ECOMMERCE_ID],
            Operation::AuthorizePayment => vec![param::ECOMMERCE_ID, param::AUTH_TOKEN],
            Operation::UpdatePhoneNumber => {
                vec![param::ECOMMERCE_ID, param::NEW_PHONE_NUMBER]
            }
            Operation::RefundPayment => {
                let mut names = vec![param::ECOMMERCE_ID, param::AUTH_TOKEN];
                if capabilities.supports(Capability::RefundReferenceAndAmount) {
                    names.push(param::REFERENCE_NUMBER);
                    names.push(param::REFUND_AMOUNT);
                }
                names
            }
        }
    }
}

impl FromStr for Operation {
    type Err = AthMovilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| AthMovilError::UnsupportedOperation {
                operation: s.to_string(),
            })
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP method of an outbound request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
        }
    }
}

/// A feature a node variant may enable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    /// Refund takes an explicit reference number and amount and sends the private token
    RefundReferenceAndAmount,
}

/// Set of capabilities enabled on a router
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    refund_reference_and_amount: bool,
}

impl Capabilities {
    /// No optional capabilities
    pub fn none() -> Self {
        Self::default()
    }

    /// Builder: enable a capability
    pub fn with(mut self, capability: Capability) -> Self {
        match capability {
            Capability::RefundReferenceAndAmount => self.refund_reference_and_amount = true,
        }
        self
    }

    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::RefundReferenceAndAmount => self.refund_reference_and_amount,
        }
    }
}

/// Product surface the router is serving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeVariant {
    /// Regular workflow node
    Basic,
    /// Node exposed to agent callers
    #[default]
    Tool,
}

impl NodeVariant {
    pub fn capabilities(&self) -> Capabilities {
        match self {
            NodeVariant::Basic => Capabilities::none(),
            NodeVariant::Tool => {
                Capabilities::none().with(Capability::RefundReferenceAndAmount)
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeVariant::Basic => "basic",
            NodeVariant::Tool => "tool",
        }
    }
}

impl FromStr for NodeVariant {
    type Err = AthMovilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(NodeVariant::Basic),
            "tool" => Ok(NodeVariant::Tool),
            other => Err(AthMovilError::Configuration(format!(
                "unknown node variant: {other}"
            ))),
        }
    }
}
