//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::application::errors::ConfigError;
use crate::domain::entities::Platform;

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub calculator: CalculatorConfig,
    pub apis: ApisConfig,
    pub storage: StorageConfig,
    pub twitch: TwitchConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
    pub platform: Platform,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CalculatorConfig {
    /// Wall-clock limit for one evaluation
    pub timeout_secs: u64,
    /// Evaluations allowed to run at the same time
    pub max_workers: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ApisConfig {
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub fixer_api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct StorageConfig {
    /// Holds `commands/`, `commands/aliases/` and `variables/`
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TwitchConfig {
    pub channels: Vec<String>,
    pub counters: Vec<CounterConfig>,
}

/// A channel command that bumps a stored counter and reports it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CounterConfig {
    pub channel: String,
    pub command: String,
    pub variable: String,
    /// Reply text; `{count}` is replaced with the new value
    pub template: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "Harmonbot".to_string(),
            prefix: "!".to_string(),
            platform: Platform::Discord,
        }
    }
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_workers: 4,
        }
    }
}

impl Default for ApisConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("Harmonbot/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: 15,
            fixer_api_key: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

impl Default for TwitchConfig {
    fn default() -> Self {
        Self {
            channels: vec!["harmonbot".to_string()],
            counters: vec![CounterConfig {
                channel: "mikki".to_string(),
                command: "tick".to_string(),
                variable: "ticks".to_string(),
                template: "Mikki has wasted {count} ticks. http://i.imgur.com/bSCnFb1.png".to_string(),
            }],
        }
    }
}

impl CalculatorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.with_env_overrides().validate()
    }

    pub fn load_env() -> Self {
        Config::default().with_env_overrides()
    }

    /// Apply `BOT_PREFIX`, `FIXER_API_KEY` and `HARMONBOT_DATA_DIR`
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            self.bot.prefix = prefix;
        }

        if let Ok(key) = std::env::var("FIXER_API_KEY") {
            self.apis.fixer_api_key = Some(key);
        }

        if let Ok(dir) = std::env::var("HARMONBOT_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }

        self
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.bot.prefix.is_empty() {
            return Err(ConfigError::InvalidValue("bot.prefix must not be empty".into()));
        }
        if self.calculator.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("calculator.timeout-secs must be at least 1".into()));
        }
        if self.calculator.max_workers == 0 {
            return Err(ConfigError::InvalidValue("calculator.max-workers must be at least 1".into()));
        }
        Ok(self)
    }

    /// Counter commands configured for `channel`
    pub fn counters_for<'a>(&'a self, channel: &'a str) -> impl Iterator<Item = &'a CounterConfig> + 'a {
        self.twitch
            .counters
            .iter()
            .filter(move |c| c.channel.eq_ignore_ascii_case(channel))
    }
}
