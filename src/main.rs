//! Dynamic HTTP load generator
//!
//! Keeps a pool of workers issuing GET requests against a target URL at a
//! configurable aggregate rate. Pool size, rate and target can be changed at
//! runtime through the control surface.
//!
//! # Usage
//! ```sh
//! cargo run -- --targetUrl http://localhost:9000/ --clients 4 --rps 20
//! curl -X POST localhost:8080/api/config \
//!   -d '{"Url":"http://localhost:9000/","Clients":8,"RequestsPerSecondTarget":50}'
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use loadgen::application::system::Application;
use loadgen::config::{Cli, ServerConfig};
use loadgen::interfaces::http::handlers::NAME;
use loadgen::interfaces::http::{ControlState, router};
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("{} {}", NAME, env!("CARGO_PKG_VERSION"));

    let config = ServerConfig::try_from(Cli::parse())?;
    info!(
        "Configuration loaded: target={}, clients={}, rps={}, listen={}",
        config.initial.url,
        config.initial.clients,
        config.initial.requests_per_second_target,
        config.listen
    );

    let app = Application::build(&config)?;
    let handle = app.start();

    let assets = if config.assets.is_dir() {
        Some(config.assets.as_path())
    } else {
        warn!(
            "Assets directory {} not found, static files disabled",
            config.assets.display()
        );
        None
    };
    let routes = router(ControlState::from_handle(&handle), assets);

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("Failed to bind control surface on {}", config.listen))?;
    info!("Control surface listening on {}", config.listen);

    let shutdown = handle.shutdown_token();
    axum::serve(listener, routes)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => info!("Shutdown signal received."),
                _ = shutdown.cancelled() => {}
            }
        })
        .await
        .context("Control surface failed")?;

    handle.shutdown().await;
    Ok(())
}
