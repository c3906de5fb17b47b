//! # athm-api
//!
//! HTTP gateway for athmovil-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Batch execution of ATH Móvil operations
//! - Operation and error-code catalogue endpoints
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/v1/operations` | Operation catalogue (`?variant=basic\|tool`) |
//! | GET | `/api/v1/error-codes` | Known provider error codes |
//! | GET | `/api/v1/error-codes/{code}` | Describe one error code |
//! | POST | `/api/v1/execute` | Run an operation over a batch of items |
//! | POST | `/api/v1/credentials/verify` | Check the configured tokens |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
