use std::net::SocketAddr;

use anyhow::Result;
use common::config::{LoggingConfig, RedisConfig, S3BucketConfig};

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
/// The API is the backend for the Meridian clock application.
pub struct AppConfig {
    /// The path to the config file
    pub config_file: String,

    /// The logging config
    pub logging: LoggingConfig,

    /// API Config
    pub api: ApiConfig,

    /// Redis configuration (catalog store)
    pub redis: RedisConfig,

    /// S3 configuration (media store)
    pub media: S3BucketConfig,

    /// Text generation provider config
    pub text: TextConfig,

    /// Flight data provider config
    pub flights: FlightsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: "config".to_string(),
            logging: LoggingConfig::default(),
            api: ApiConfig::default(),
            redis: RedisConfig::default(),
            media: S3BucketConfig::default(),
            text: TextConfig::default(),
            flights: FlightsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Bind address for the API
    pub bind_address: SocketAddr,

    /// Largest upload body we accept, in bytes
    pub max_upload_size: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: "[::]:4000".parse().expect("failed to parse bind address"),
            max_upload_size: 512 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct TextConfig {
    /// The text generation endpoint to use
    pub url: String,

    /// The API key for the provider
    pub api_key: String,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:3400/generate".to_string(),
            api_key: String::new(),
            timeout_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct FlightsConfig {
    /// The OpenSky API base url
    pub base_url: String,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for FlightsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://opensky-network.org/api".to_string(),
            timeout_ms: 10000,
        }
    }
}

impl AppConfig {
    pub fn parse() -> Result<Self> {
        Ok(common::config::parse(&AppConfig::default().config_file)?)
    }
}
