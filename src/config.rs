use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::intent::Lexicon;
use crate::language::DetectionKeywords;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_server_config")]
    pub server: ServerConfig,
    pub wasender: WasenderConfig,
    pub firm: FirmProfile,
    #[serde(default = "default_bot_config")]
    pub bot: BotConfig,
    #[serde(default)]
    pub detection: DetectionKeywords,
    #[serde(default)]
    pub lexicon: Lexicon,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Token the webhook provider echoes back during the GET verification
    /// handshake.
    pub webhook_secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WasenderConfig {
    pub api_key: String,
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,
}

/// Firm metadata interpolated into replies. Loaded once; never mutated.
#[derive(Debug, Deserialize, Clone)]
pub struct FirmProfile {
    pub name: String,
    pub locations: String,
    pub phone: String,
    pub calendly_link: String,
    pub hours: BusinessHours,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessHours {
    pub weekdays: String,
    pub saturday: String,
    pub timezone: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BotConfig {
    /// Minutes the bot stays silent for a sender after a human takeover.
    #[serde(default = "default_cooldown_minutes")]
    pub cooldown_minutes: u64,
    /// Directory for the month-keyed interaction log files.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_api_endpoint() -> String {
    "https://wasenderapi.com/api".to_string()
}

fn default_cooldown_minutes() -> u64 {
    10
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_server_config() -> ServerConfig {
    ServerConfig {
        host: default_host(),
        port: default_port(),
        webhook_secret: String::new(),
    }
}

fn default_bot_config() -> BotConfig {
    BotConfig {
        cooldown_minutes: default_cooldown_minutes(),
        log_dir: default_log_dir(),
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if config.wasender.api_key.is_empty() {
            anyhow::bail!("wasender.api_key must not be empty");
        }
        if config.server.webhook_secret.is_empty() {
            anyhow::bail!("server.webhook_secret must not be empty");
        }

        if !config.bot.log_dir.exists() {
            std::fs::create_dir_all(&config.bot.log_dir).with_context(|| {
                format!(
                    "Failed to create log directory: {}",
                    config.bot.log_dir.display()
                )
            })?;
        }

        Ok(config)
    }

    /// Cooldown window as a duration (from [bot] cooldown_minutes, default 10).
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.bot.cooldown_minutes * 60)
    }
}
