//! # Batch Execution
//!
//! Drives one operation over a batch of input items: route, execute, normalize,
//! one item at a time and in input order. Output position `i` always belongs
//! to input item `i`.

use crate::model::Credentials;
use crate::normalize::{normalize, NormalizedError, NormalizedResult};
use crate::operation::Operation;
use crate::params::ParamBag;
use crate::router::Router;
use crate::transport::BoxedTransport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// What to do when an item fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailurePolicy {
    /// Record the failure on the item and keep going
    ContinueOnFail,
    /// Abort the batch on the first failure
    #[default]
    FailFast,
}

impl FailurePolicy {
    pub fn from_continue_on_fail(continue_on_fail: bool) -> Self {
        if continue_on_fail {
            FailurePolicy::ContinueOnFail
        } else {
            FailurePolicy::FailFast
        }
    }
}

/// Output for one input item
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOutput {
    /// Position of the originating input item
    pub item_index: usize,
    /// Provider payload, or the error record for a failed item
    pub json: Value,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,
}

/// Outputs of a completed batch
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub operation: Operation,
    pub items: Vec<ItemOutput>,
    pub completed_at: DateTime<Utc>,
}

impl BatchReport {
    pub fn failed_count(&self) -> usize {
        self.items.iter().filter(|i| i.failed).count()
    }
}

/// First failure of a fail-fast batch
#[derive(Debug, Clone, Error)]
#[error("{message} (item {item_index})")]
pub struct BatchError {
    pub item_index: usize,
    pub message: String,
    pub description: Option<String>,
    pub cause: NormalizedError,
}

impl BatchError {
    fn new(item_index: usize, cause: NormalizedError) -> Self {
        Self {
            item_index,
            message: cause.message.clone(),
            description: cause.description.clone(),
            cause,
        }
    }
}

/// Runs operations for one set of credentials through one transport
pub struct BatchExecutor {
    router: Router,
    transport: BoxedTransport,
    credentials: Credentials,
}

impl BatchExecutor {
    pub fn new(router: Router, transport: BoxedTransport, credentials: Credentials) -> Self {
        Self {
            router,
            transport,
            credentials,
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Route, execute and normalize a single item
    pub async fn execute_item(&self, operation: Operation, params: &ParamBag) -> NormalizedResult {
        let request = match self.router.route(operation, params, &self.credentials) {
            Ok(request) => request,
            Err(e) => {
                warn!("Could not build {} request: {}", operation, e);
                return NormalizedResult::Failure(NormalizedError::from_local(&e));
            }
        };

        debug!("{} {}", request.method.as_str(), request.path);
        normalize(self.transport.execute(&request).await)
    }

    /// Run `operation` once per item, in order
    #[instrument(skip(self, items), fields(
        operation = %operation,
        items = items.len(),
        transport = self.transport.transport_name(),
    ))]
    pub async fn run(
        &self,
        operation: Operation,
        items: &[ParamBag],
        policy: FailurePolicy,
    ) -> Result<BatchReport, BatchError> {
        let mut outputs = Vec::with_capacity(items.len());

        for (item_index, params) in items.iter().enumerate() {
            match self.execute_item(operation, params).await {
                NormalizedResult::Success { payload } => outputs.push(ItemOutput {
                    item_index,
                    json: payload,
                    failed: false,
                }),
                NormalizedResult::Failure(err) => {
                    warn!(item_index, "Item failed: {}", err.message);
                    match policy {
                        FailurePolicy::ContinueOnFail => outputs.push(ItemOutput {
                            item_index,
                            json: err.to_record(),
                            failed: true,
                        }),
                        FailurePolicy::FailFast => return Err(BatchError::new(item_index, err)),
                    }
                }
            }
        }

        let report = BatchReport {
            operation,
            items: outputs,
            completed_at: Utc::now(),
        };
        info!(
            "Completed {}: {} items, {} failed",
            operation,
            report.items.len(),
            report.failed_count()
        );
        Ok(report)
    }
}
