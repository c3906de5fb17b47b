//! # athm-client
//!
//! ATH Móvil payment API client for athmovil-rs.
//!
//! [`AthMovilClient`] implements the core [`athm_core::Transport`] trait with
//! reqwest, so it can back a [`athm_core::BatchExecutor`], and also offers
//! one-shot helpers:
//!
//! - `call(operation, params)` routes, executes and normalizes a single call
//! - `verify_credentials()` checks the configured public token
//!
//! [`probe_credentials`] runs the same check through any transport.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use athm_client::AthMovilClient;
//! use athm_core::{Operation, ParamBag};
//!
//! // Create client from environment
//! let client = AthMovilClient::from_env()?;
//!
//! let payment = client
//!     .call(
//!         Operation::CreatePayment,
//!         &ParamBag::new()
//!             .with("phoneNumber", "7875550100")
//!             .with("total", 25.0)
//!             .with("metadata1", "order-1001")
//!             .with("metadata2", "web"),
//!     )
//!     .await?;
//!
//! // payment["data"]["ecommerceId"] and payment["data"]["auth_token"]
//! // feed the follow-up operations
//! ```

pub mod client;
pub mod config;

// Re-exports
pub use client::{
    probe_credentials, AthMovilClient, CREDENTIAL_TEST_ECOMMERCE_ID, CREDENTIAL_TEST_EXPECTED_CODE,
};
pub use config::{AthMovilConfig, Environment};
