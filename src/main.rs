//! findash - local financial dashboard server.
//!
//! Serves a single-user dashboard of live prices, macro indicators, and news
//! headlines on loopback. All data comes from external providers at render
//! time; nothing is persisted between requests.

mod api;
mod config;
mod engine;
mod models;
mod providers;

use anyhow::Context;

use crate::api::AppState;
use crate::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("findash=info".parse()?),
        )
        .init();

    let config = AppConfig::from_env();
    let state = AppState::from_config(config.clone()).context("building provider clients")?;
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("binding {}", config.bind_addr()))?;
    tracing::info!("dashboard listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
