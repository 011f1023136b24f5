//! tariff_server - serves the tariff widget and its JSON API.
//!
//! Configuration comes from the environment (and `.env`), see
//! `tariff_calculator::config`.

use anyhow::Context;
use tariff_calculator::api::{build_router, AppState};
use tariff_calculator::config::ServerConfig;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tariff_calculator=debug,tower_http=debug".into()),
        )
        .init();

    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env().context("failed to read server configuration")?;
    info!(
        policy = ?config.policy,
        seeded = config.seed.is_some(),
        "Tariff range {}..={}, thresholds {}/{}",
        config.tariff.min,
        config.tariff.max,
        config.tariff.thresholds.low_max,
        config.tariff.thresholds.medium_max
    );

    let state = AppState::from_config(&config).context("invalid tariff configuration")?;
    let app = build_router(state, config.static_dir.as_deref());

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;
    info!("tariff_server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
