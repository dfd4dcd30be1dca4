use anyhow::{Context, Result};
use outbox_core::ChannelConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub order_count: u32,
    pub channel: ChannelConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let log_level = std::env::var("OUTBOX_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let order_count = std::env::var("OUTBOX_DEMO_ORDERS")
            .unwrap_or_else(|_| "3".to_string())
            .parse()
            .context("OUTBOX_DEMO_ORDERS must be a non-negative integer")?;

        let channel = ChannelConfig::from_env("OUTBOX_CHANNEL")?;

        Ok(Self {
            log_level,
            order_count,
            channel,
        })
    }
}
