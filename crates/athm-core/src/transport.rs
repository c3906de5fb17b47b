//! # Transport Trait
//!
//! The seam between request construction and the network. The router builds
//! an [`OutboundRequest`]; a `Transport` executes it and reports a
//! [`TransportOutcome`] for the normalizer.
//!
//! ```text
//! ┌──────────┐   OutboundRequest   ┌─────────────┐  TransportOutcome  ┌────────────┐
//! │  Router  │ ──────────────────▶ │  Transport  │ ─────────────────▶ │ normalize  │
//! └──────────┘                     └─────────────┘                    └────────────┘
//!                                         ▲
//!                          ┌──────────────┴──────────────┐
//!                   ┌──────┴───────┐              ┌──────┴───────┐
//!                   │AthMovilClient│              │ test doubles │
//!                   │  (reqwest)   │              │              │
//!                   └──────────────┘              └──────────────┘
//! ```

use crate::normalize::TransportOutcome;
use crate::router::OutboundRequest;
use async_trait::async_trait;
use std::sync::Arc;

/// Executes outbound requests against the provider.
///
/// Implementations never fail: every problem is reported as
/// [`TransportOutcome::Failure`] so the normalizer can classify it.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute one request
    async fn execute(&self, request: &OutboundRequest) -> TransportOutcome;

    /// Name for logging
    fn transport_name(&self) -> &'static str;
}

/// Type alias for a shared transport (dynamic dispatch)
pub type BoxedTransport = Arc<dyn Transport>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Credentials;
    use crate::operation::Operation;
    use crate::params::ParamBag;
    use crate::router::Router;
    use serde_json::json;

    struct EchoTransport;

    #[async_trait]
    impl Transport for EchoTransport {
        async fn execute(&self, request: &OutboundRequest) -> TransportOutcome {
            TransportOutcome::Success(request.body.clone())
        }

        fn transport_name(&self) -> &'static str {
            "echo"
        }
    }

    #[tokio::test]
    async fn test_boxed_transport_dispatch() {
        let transport: BoxedTransport = Arc::new(EchoTransport);
        let request = Router::default()
            .route(
                Operation::FindPayment,
                &ParamBag::new().with("ecommerceId", "ec-9"),
                &Credentials::new("pub", "priv"),
            )
            .unwrap();

        let outcome = transport.execute(&request).await;
        assert_eq!(
            outcome,
            TransportOutcome::Success(json!({"publicToken": "pub", "ecommerceId": "ec-9"}))
        );
        assert_eq!(transport.transport_name(), "echo");
    }
}
