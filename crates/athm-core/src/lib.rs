//! # athm-core
//!
//! Core types for the ATH Móvil payment adapter.
//!
//! This crate provides:
//! - `Operation` and `NodeVariant` for the six e-commerce operations
//! - `Router` for building the exact provider request per operation
//! - `normalize` for turning provider responses and failures into results
//! - `error_codes` with human-readable descriptions of `BTRA_NNNN` codes
//! - `Transport` trait for executing requests
//! - `BatchExecutor` for per-item processing with a failure policy
//!
//! ## Example
//!
//! ```rust,ignore
//! use athm_core::{BatchExecutor, Credentials, FailurePolicy, NodeVariant, Operation, ParamBag, Router};
//!
//! let executor = BatchExecutor::new(
//!     Router::for_variant(NodeVariant::Tool),
//!     transport,
//!     Credentials::new(public_token, private_token),
//! );
//!
//! let items = vec![ParamBag::new().with("ecommerceId", "2f1a...")];
//! let report = executor
//!     .run(Operation::FindPayment, &items, FailurePolicy::ContinueOnFail)
//!     .await?;
//! ```

pub mod batch;
pub mod error;
pub mod error_codes;
pub mod model;
pub mod normalize;
pub mod operation;
pub mod params;
pub mod router;
pub mod transport;

// Re-exports for convenience
pub use batch::{BatchError, BatchExecutor, BatchReport, FailurePolicy, ItemOutput};
pub use error::{AthMovilError, AthMovilResult};
pub use model::{
    AdditionalFields, Amount, Credentials, LineItem, PaymentRequest, RefundRequest,
    TransactionRef, UpdatePhoneNumberRequest,
};
pub use normalize::{
    normalize, ErrorKind, NormalizedError, NormalizedResult, ProviderErrorBody, TransportFailure,
    TransportOutcome,
};
pub use operation::{param, Capabilities, Capability, HttpMethod, NodeVariant, Operation};
pub use params::ParamBag;
pub use router::{OutboundRequest, Router, DEFAULT_BASE_URL};
pub use transport::{BoxedTransport, Transport};
