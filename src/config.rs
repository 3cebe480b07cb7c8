use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::{MatchingConfig, MatchingConfigError, MatchingWeights};

/// Prefix of environment overrides, e.g. `TUTOR_MATCH__SERVER__PORT`
const ENV_PREFIX: &str = "TUTOR_MATCH";

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            redis_url: default_redis_url(),
            ttl_secs: None,
            l1_cache_size: None,
        }
    }
}

fn default_redis_url() -> String { "redis://127.0.0.1:6379".to_string() }

/// Matching engine settings, fixed for the lifetime of the process
#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_min_score_threshold")]
    pub min_score_threshold: f64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            weights: WeightsConfig::default(),
            max_results: default_max_results(),
            min_score_threshold: default_min_score_threshold(),
        }
    }
}

impl MatchingSettings {
    /// Build the validated engine configuration
    pub fn to_matching_config(&self) -> Result<MatchingConfig, MatchingConfigError> {
        let config = MatchingConfig {
            weights: MatchingWeights {
                topic: self.weights.topic,
                language: self.weights.language,
                time: self.weights.time,
                rating: self.weights.rating,
            },
            max_results: self.max_results,
            min_score_threshold: self.min_score_threshold,
        };

        config.validate()?;
        Ok(config)
    }
}

fn default_max_results() -> usize { 5 }
fn default_min_score_threshold() -> f64 { 0.3 }

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_topic_weight")]
    pub topic: f64,
    #[serde(default = "default_language_weight")]
    pub language: f64,
    #[serde(default = "default_time_weight")]
    pub time: f64,
    #[serde(default = "default_rating_weight")]
    pub rating: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            topic: default_topic_weight(),
            language: default_language_weight(),
            time: default_time_weight(),
            rating: default_rating_weight(),
        }
    }
}

fn default_topic_weight() -> f64 { 0.5 }
fn default_language_weight() -> f64 { 0.2 }
fn default_time_weight() -> f64 { 0.2 }
fn default_rating_weight() -> f64 { 0.1 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event
    #[default]
    Json,
    Pretty,
    /// Single-line human readable
    Text,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with TUTOR_MATCH__)
    /// 5. DATABASE_URL, if set
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(env_source())
            .build()?;

        with_database_url(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        settings.try_deserialize()
    }
}

// e.g., TUTOR_MATCH__SERVER__PORT -> server.port
fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// The conventional DATABASE_URL wins over file and prefixed values
fn with_database_url(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => Config::builder()
            .add_source(settings)
            .set_override("database.url", url)?
            .build(),
        Err(_) => Ok(settings),
    }
}
