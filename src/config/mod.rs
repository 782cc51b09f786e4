//! Process configuration.
//!
//! Startup flags seed the runtime configuration and size the engine; they are
//! not mutable at runtime. Runtime changes go through the control surface.

mod cli;

pub use cli::{Cli, DEFAULT_TARGET_URL};

use crate::application::settings::EngineSettings;
use crate::domain::LoadConfig;
use crate::domain::errors::ConfigError;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Validated process configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub initial: LoadConfig,
    pub listen: SocketAddr,
    pub assets: PathBuf,
    pub request_timeout: Duration,
    pub max_idle_per_host: usize,
    pub engine: EngineSettings,
}

impl TryFrom<Cli> for ServerConfig {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        url::Url::parse(&cli.target_url).map_err(|e| ConfigError::InvalidTargetUrl {
            url: cli.target_url.clone(),
            reason: e.to_string(),
        })?;

        if cli.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                name: "request timeout",
                reason: "must be at least one second".to_string(),
            });
        }

        Ok(Self {
            initial: LoadConfig::new(cli.target_url, cli.clients, cli.rps),
            listen: cli.listen,
            assets: cli.assets,
            request_timeout: Duration::from_secs(cli.request_timeout_secs),
            max_idle_per_host: cli.max_idle_per_host,
            engine: EngineSettings::default(),
        })
    }
}
