use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::channel;
use crate::keyboard::{self, VK_DOWN, VK_F9, VK_RETURN, VK_UP};
use crate::settings::Category;

pub const DEFAULT_MENU_KEY: &str = "F9";

pub const MIN_TIMEOUT_MS: u64 = 10;
pub const MAX_TIMEOUT_MS: u64 = 2_000;
pub const DEFAULT_TIMEOUT_MS: u64 = 16;

pub const MIN_REPLY_CAPACITY: usize = 16;
pub const MAX_REPLY_CAPACITY: usize = 64 * 1024;
pub const DEFAULT_REPLY_CAPACITY: usize = 1024;

pub const MIN_COMMENTARY_INTERVAL_SECS: u64 = 30;
pub const MAX_COMMENTARY_INTERVAL_SECS: u64 = 3_600;
pub const DEFAULT_COMMENTARY_INTERVAL_SECS: u64 = 300;

pub const DEFAULT_LOW_HEALTH_PERCENT: f32 = 30.0;

/// Root configuration structure. Deserialized from `config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub menu: MenuConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub reactions: ReactionsConfig,
}

#[derive(Debug, Deserialize)]
pub struct MenuConfig {
    /// Virtual-key name that opens and closes the overlay menu (e.g. "F9").
    /// Read once at startup.
    #[serde(default = "default_menu_key")]
    pub key: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            key: default_menu_key(),
        }
    }
}

impl MenuConfig {
    /// Resolves the configured key name, falling back to F9 when it is not
    /// recognised or collides with a navigation key.
    pub fn key_code(&self) -> u32 {
        match keyboard::parse_vk(&self.key) {
            Some(code) if ![VK_UP, VK_DOWN, VK_RETURN].contains(&code) => code,
            _ => {
                log::warn!("config: unusable menu key {:?}, using {DEFAULT_MENU_KEY}", self.key);
                VK_F9
            }
        }
    }
}

/// Where and how to reach the companion process.
#[derive(Debug, Deserialize)]
pub struct ChannelConfig {
    /// Named pipe (Windows) or socket path (elsewhere).
    #[serde(default = "channel::default_endpoint")]
    pub endpoint: String,
    /// Time budget for everything sent during one tick (or for one exchange
    /// outside the tick loop). Clamped to [10, 2000].
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Size of the single reply read. Clamped to [16, 65536].
    #[serde(default = "default_reply_capacity")]
    pub reply_capacity: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            endpoint: channel::default_endpoint(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            reply_capacity: DEFAULT_REPLY_CAPACITY,
        }
    }
}

impl ChannelConfig {
    pub fn effective_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS))
    }

    pub fn effective_reply_capacity(&self) -> usize {
        self.reply_capacity.clamp(MIN_REPLY_CAPACITY, MAX_REPLY_CAPACITY)
    }
}

/// Initial category flags and reaction tuning.
#[derive(Debug, Deserialize)]
pub struct ReactionsConfig {
    #[serde(default = "enabled")]
    pub vehicle: bool,
    #[serde(default = "enabled")]
    pub mission: bool,
    #[serde(default = "enabled")]
    pub environment: bool,
    #[serde(default = "enabled")]
    pub character: bool,
    #[serde(default = "enabled")]
    pub general: bool,
    #[serde(default = "enabled")]
    pub commentary: bool,
    /// Seconds between unconditional commentary prompts. Clamped to [30, 3600].
    #[serde(default = "default_commentary_interval")]
    pub commentary_interval_secs: u64,
    /// Health percentage below which the low-health alert fires.
    #[serde(default = "default_low_health_percent")]
    pub low_health_percent: f32,
}

impl Default for ReactionsConfig {
    fn default() -> Self {
        Self {
            vehicle: true,
            mission: true,
            environment: true,
            character: true,
            general: true,
            commentary: true,
            commentary_interval_secs: DEFAULT_COMMENTARY_INTERVAL_SECS,
            low_health_percent: DEFAULT_LOW_HEALTH_PERCENT,
        }
    }
}

impl ReactionsConfig {
    pub fn is_enabled(&self, category: Category) -> bool {
        match category {
            Category::Vehicle => self.vehicle,
            Category::Mission => self.mission,
            Category::Environment => self.environment,
            Category::Character => self.character,
            Category::General => self.general,
            Category::Commentary => self.commentary,
        }
    }

    pub fn effective_commentary_interval(&self) -> Duration {
        Duration::from_secs(
            self.commentary_interval_secs
                .clamp(MIN_COMMENTARY_INTERVAL_SECS, MAX_COMMENTARY_INTERVAL_SECS),
        )
    }
}

/// Loads the config file at `path`, returning `Config::default()` if the file does not exist.
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

fn default_menu_key() -> String {
    DEFAULT_MENU_KEY.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_reply_capacity() -> usize {
    DEFAULT_REPLY_CAPACITY
}

fn default_commentary_interval() -> u64 {
    DEFAULT_COMMENTARY_INTERVAL_SECS
}

fn default_low_health_percent() -> f32 {
    DEFAULT_LOW_HEALTH_PERCENT
}

fn enabled() -> bool {
    true
}
