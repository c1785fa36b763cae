//! Binary entry point for the weather web server.
//!
//! This crate focuses on:
//! - Tracing and configuration wiring (the process refuses to start
//!   without a provider API key)
//! - Binding the listener, falling back to nearby ports when taken

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use weather_core::{Config, WeatherProvider, provider_from_config};
use weather_web::{AppState, app};

/// How many successive ports to try when the configured one is taken.
const PORT_FALLBACK_ATTEMPTS: u16 = 10;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("Configuration is invalid; refusing to start")?;
    let environment = config.environment;
    let port = config.port;

    let provider: Arc<dyn WeatherProvider> = Arc::from(provider_from_config(&config));
    let router = app(AppState::new(config, provider));

    let listener = bind_with_fallback(port).await?;
    let addr = listener
        .local_addr()
        .context("Listener has no local address")?;
    info!("Server running on port {}", addr.port());
    info!("Environment: {environment}");

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}

/// Bind the configured port, trying successive ports when it is in use.
async fn bind_with_fallback(port: u16) -> Result<TcpListener> {
    let host = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
    let last_port = port.saturating_add(PORT_FALLBACK_ATTEMPTS);
    let mut last_err = None;

    for candidate in port..=last_port {
        match TcpListener::bind(SocketAddr::new(host, candidate)).await {
            Ok(listener) => return Ok(listener),
            Err(err) => {
                warn!("Port {candidate} is unavailable: {err}");
                last_err = Some(err);
            }
        }
    }

    match last_err {
        Some(err) => Err(anyhow::Error::new(err)
            .context(format!("Failed to bind any port in {port}..={last_port}"))),
        None => Err(anyhow::anyhow!("Failed to bind any port")),
    }
}
