//! # ATH Móvil Client
//!
//! reqwest-backed [`Transport`] for the ATH Móvil e-commerce API, plus
//! single-call helpers built on the core router and normalizer.

use crate::config::AthMovilConfig;
use async_trait::async_trait;
use athm_core::{
    normalize, param, AthMovilError, AthMovilResult, Credentials, HttpMethod, NodeVariant,
    Operation, OutboundRequest, ParamBag, ProviderErrorBody, Router, Transport, TransportFailure,
    TransportOutcome,
};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, info, instrument};

/// Ecommerce id used to probe credentials
pub const CREDENTIAL_TEST_ECOMMERCE_ID: &str = "credential-test-dummy-id";

/// Error code that proves the public token was accepted
pub const CREDENTIAL_TEST_EXPECTED_CODE: &str = "BTRA_0031";

/// ATH Móvil API client
pub struct AthMovilClient {
    config: AthMovilConfig,
    client: Client,
    router: Router,
}

impl AthMovilClient {
    /// Create a new client for the tool node variant
    pub fn new(config: AthMovilConfig) -> AthMovilResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                AthMovilError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        let router = Router::for_variant(NodeVariant::Tool).with_base_url(&config.api_base_url);

        Ok(Self {
            config,
            client,
            router,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> AthMovilResult<Self> {
        let config = AthMovilConfig::from_env()?;
        Self::new(config)
    }

    /// Builder: route requests for another node variant
    pub fn with_variant(mut self, variant: NodeVariant) -> Self {
        self.router = Router::for_variant(variant).with_base_url(&self.config.api_base_url);
        self
    }

    pub fn config(&self) -> &AthMovilConfig {
        &self.config
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn credentials(&self) -> Credentials {
        self.config.credentials()
    }

    /// Route, execute and normalize one operation
    #[instrument(skip(self, params), fields(operation = %operation))]
    pub async fn call(&self, operation: Operation, params: &ParamBag) -> AthMovilResult<Value> {
        let request = self.router.route(operation, params, &self.credentials())?;
        normalize(self.execute(&request).await)
            .into_result()
            .map_err(AthMovilError::from)
    }

    /// Check the configured public token. See [`probe_credentials`].
    #[instrument(skip(self))]
    pub async fn verify_credentials(&self) -> AthMovilResult<()> {
        probe_credentials(self, &self.router, &self.credentials()).await
    }
}

/// Check a public token through any transport.
///
/// Looks up a payment that cannot exist; the provider answers
/// `BTRA_0031` ("EcommerceId does not exist") only when it accepted the token.
/// The code may arrive in a 2xx body or in an error response.
pub async fn probe_credentials(
    transport: &dyn Transport,
    router: &Router,
    credentials: &Credentials,
) -> AthMovilResult<()> {
    let params = ParamBag::new().with(param::ECOMMERCE_ID, CREDENTIAL_TEST_ECOMMERCE_ID);
    let request = router.route(Operation::FindPayment, &params, credentials)?;
    let result = normalize(transport.execute(&request).await)
        .into_result()
        .map_err(AthMovilError::from);

    match result {
        Err(AthMovilError::Provider { ref error_code, .. })
            if error_code == CREDENTIAL_TEST_EXPECTED_CODE =>
        {
            info!("ATH Móvil credentials accepted");
            Ok(())
        }
        Ok(body) => {
            let code = ProviderErrorBody::detect(&body).and_then(|b| b.errorcode);
            if code.as_deref() == Some(CREDENTIAL_TEST_EXPECTED_CODE) {
                info!("ATH Móvil credentials accepted");
                Ok(())
            } else {
                error!("Credential check failed: code={:?}", code);
                Err(AthMovilError::Configuration(format!(
                    "Credential check failed: unexpected response code {}",
                    code.as_deref().unwrap_or("none")
                )))
            }
        }
        Err(e) => {
            error!("Credential check failed: {}", e);
            Err(e)
        }
    }
}

#[async_trait]
impl Transport for AthMovilClient {
    #[instrument(skip(self, request), fields(operation = %request.operation))]
    async fn execute(&self, request: &OutboundRequest) -> TransportOutcome {
        let mut builder = match request.method {
            HttpMethod::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = match builder.json(&request.body).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("ATH Móvil request failed: {}", e);
                return TransportOutcome::Failure(TransportFailure::network(e.to_string()));
            }
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                error!("Failed to read ATH Móvil response: {}", e);
                return TransportOutcome::Failure(
                    TransportFailure::network(e.to_string()),
                );
            }
        };

        if !status.is_success() {
            error!("ATH Móvil API error: status={}, body={}", status, text);

            let body = serde_json::from_str::<Value>(&text).ok();
            let message = match (&body, text.trim()) {
                (None, raw) if !raw.is_empty() => raw.to_string(),
                _ => status.canonical_reason().unwrap_or("HTTP Error").to_string(),
            };
            return TransportOutcome::Failure(TransportFailure::http(
                status.as_u16(),
                body,
                message,
            ));
        }

        if text.trim().is_empty() {
            return TransportOutcome::Success(Value::Null);
        }

        match serde_json::from_str::<Value>(&text) {
            Ok(body) => {
                debug!("ATH Móvil response: status={}", status);
                TransportOutcome::Success(body)
            }
            Err(e) => TransportOutcome::Failure(TransportFailure::network(format!(
                "Failed to parse ATH Móvil response: {e}"
            ))),
        }
    }

    fn transport_name(&self) -> &'static str {
        "athmovil"
    }
}
