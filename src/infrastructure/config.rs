use crate::application::transport::DEFAULT_RECONNECT_DELAY;
use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;

pub const CONFIG_FILE: &str = "config/dashboard";
pub const ENV_PREFIX: &str = "CALLDASH";

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub server: ServerSettings,
    pub stream: StreamSettings,
    pub view: ViewSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    /// Base URL of the telephony harness serving `/api/*`.
    pub base_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StreamSettings {
    pub reconnect_delay_secs: u64,
    pub channel_capacity: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ViewSettings {
    pub bind: String,
    /// Print the text rendering on every redraw.
    pub console: bool,
}

impl ServerSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl StreamSettings {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }
}

fn defaults() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(config::Config::builder()
        .set_default("server.base_url", "http://127.0.0.1:5000")?
        .set_default("server.request_timeout_secs", 10)?
        .set_default("stream.reconnect_delay_secs", DEFAULT_RECONNECT_DELAY.as_secs())?
        .set_default("stream.channel_capacity", 64)?
        .set_default("view.bind", "127.0.0.1:8090")?
        .set_default("view.console", false)?)
}

/// Defaults, then `config/dashboard.*` if present, then `CALLDASH__*`
/// environment variables (e.g. `CALLDASH__SERVER__BASE_URL`).
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = defaults()?
        .add_source(config::File::with_name(CONFIG_FILE).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to load dashboard configuration")?;

    validate(settings.try_deserialize()?)
}

fn validate(config: DashboardConfig) -> anyhow::Result<DashboardConfig> {
    if config.stream.channel_capacity == 0 {
        anyhow::bail!("stream.channel_capacity must be greater than zero");
    }
    if !config.server.base_url.starts_with("http://") && !config.server.base_url.starts_with("https://") {
        anyhow::bail!("server.base_url must be an http(s) URL, got {}", config.server.base_url);
    }
    Ok(config)
}
