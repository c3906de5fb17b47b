//! # Gateway State
//!
//! Everything a handler needs to run a batch: listener settings, the
//! transport that reaches the provider and the account tokens.

use anyhow::Context;
use athm_client::AthMovilClient;
use athm_core::{BatchExecutor, BoxedTransport, Credentials, NodeVariant, Router};
use std::net::SocketAddr;
use std::sync::Arc;

/// Gateway settings read from `HOST`, `PORT`, `ENVIRONMENT`,
/// `CONTINUE_ON_FAIL` and `NODE_VARIANT`
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub addr: SocketAddr,
    pub environment: String,
    /// Failure policy for requests that do not pick one
    pub continue_on_fail: bool,
    /// Variant for requests that do not pick one
    pub default_variant: NodeVariant,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = var_or("HOST", "127.0.0.1");
        let port: u16 = var_or("PORT", "8080")
            .parse()
            .context("PORT must be a port number")?;
        let addr = format!("{host}:{port}")
            .parse()
            .with_context(|| format!("Invalid listen address {host}:{port}"))?;

        let default_variant = match std::env::var("NODE_VARIANT") {
            Ok(value) => value.parse::<NodeVariant>()?,
            Err(_) => NodeVariant::default(),
        };

        Ok(Self {
            addr,
            environment: var_or("ENVIRONMENT", "development"),
            continue_on_fail: parse_flag(&var_or("CONTINUE_ON_FAIL", "false")),
            default_variant,
        })
    }

    /// Loopback settings with an ephemeral port
    pub fn local() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            environment: "development".to_string(),
            continue_on_fail: false,
            default_variant: NodeVariant::default(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub transport: BoxedTransport,
    pub credentials: Credentials,
    /// Provider host the routers target
    pub api_base_url: String,
}

impl AppState {
    /// Gateway backed by the reqwest client, configured from the environment
    pub fn from_env() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        let client = AthMovilClient::from_env().context("Failed to initialize ATH Móvil client")?;

        Ok(Self {
            credentials: client.credentials(),
            api_base_url: client.config().api_base_url.clone(),
            transport: Arc::new(client) as BoxedTransport,
            config,
        })
    }

    /// Gateway over any transport
    pub fn with_transport(
        config: AppConfig,
        transport: BoxedTransport,
        credentials: Credentials,
        api_base_url: impl Into<String>,
    ) -> Self {
        Self {
            config,
            transport,
            credentials,
            api_base_url: api_base_url.into(),
        }
    }

    /// Variant asked for by a request, else the configured one
    pub fn variant(&self, requested: Option<NodeVariant>) -> NodeVariant {
        requested.unwrap_or(self.config.default_variant)
    }

    pub fn router(&self, variant: NodeVariant) -> Router {
        Router::for_variant(variant).with_base_url(&self.api_base_url)
    }

    pub fn executor(&self, variant: NodeVariant) -> BatchExecutor {
        BatchExecutor::new(
            self.router(variant),
            self.transport.clone(),
            self.credentials.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_defaults() {
        for name in ["HOST", "PORT", "CONTINUE_ON_FAIL", "NODE_VARIANT"] {
            std::env::remove_var(name);
        }

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.addr.to_string(), "127.0.0.1:8080");
        assert!(!config.continue_on_fail);
        assert_eq!(config.default_variant, NodeVariant::Tool);
    }

    #[test]
    fn test_flag_parsing() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" YES "));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_variant_fallback() {
        let mut config = AppConfig::local();
        config.default_variant = NodeVariant::Basic;
        let state = AppState::with_transport(
            config,
            Arc::new(NoopTransport),
            Credentials::new("pub", "priv"),
            "http://athm.test/",
        );

        assert_eq!(state.variant(None), NodeVariant::Basic);
        assert_eq!(state.variant(Some(NodeVariant::Tool)), NodeVariant::Tool);
        assert_eq!(state.router(NodeVariant::Basic).base_url(), "http://athm.test");
    }

    struct NoopTransport;

    #[async_trait::async_trait]
    impl athm_core::Transport for NoopTransport {
        async fn execute(
            &self,
            _request: &athm_core::OutboundRequest,
        ) -> athm_core::TransportOutcome {
            athm_core::TransportOutcome::Success(serde_json::Value::Null)
        }

        fn transport_name(&self) -> &'static str {
            "noop"
        }
    }
}
