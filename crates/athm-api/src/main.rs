//! # athm-gateway
//!
//! Runs ATH Móvil operations over batches of items posted as JSON.
//!
//! ```bash
//! export ATHM_PUBLIC_TOKEN=...
//! export ATHM_PRIVATE_TOKEN=...
//! LOG_FORMAT=json athm-gateway
//! ```

use athm_api::{create_router, AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let state = AppState::from_env()?;
    let config = state.config.clone();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        provider = %state.api_base_url,
        transport = state.transport.transport_name(),
        variant = config.default_variant.as_str(),
        continue_on_fail = config.continue_on_fail,
        "athm-gateway configured"
    );

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    if !config.is_production() {
        info!("Execute: POST http://{}/api/v1/execute", config.addr);
    }

    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

/// `RUST_LOG` filters (default INFO); `LOG_FORMAT=json` switches to JSON lines
fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
