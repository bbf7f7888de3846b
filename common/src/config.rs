use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::logging;

/// Environment prefix for overrides, eg. `MERI_API__BIND_ADDRESS`.
pub const ENV_PREFIX: &str = "MERI";

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// The log level to use, this is a tracing env filter
    pub level: String,

    /// What logging mode we should use
    pub mode: logging::Mode,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            mode: logging::Mode::Default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct RedisConfig {
    /// The addresses of the Redis servers
    pub addresses: Vec<String>,

    /// Number of connections to keep in the pool
    pub pool_size: usize,

    /// The username to use for authentication
    pub username: Option<String>,

    /// The password to use for authentication
    pub password: Option<String>,

    /// The database to use
    pub database: u8,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            addresses: vec!["localhost:6379".to_string()],
            pool_size: 10,
            username: None,
            password: None,
            database: 0,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct S3CredentialsConfig {
    /// The access key for the S3 bucket
    pub access_key: Option<String>,

    /// The secret key for the S3 bucket
    pub secret_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct S3BucketConfig {
    /// The name of the S3 bucket
    pub name: String,

    /// The region the S3 bucket is in
    pub region: String,

    /// The custom endpoint for the S3 bucket
    pub endpoint: Option<String>,

    /// The base URL uploaded objects are served from
    pub public_url: String,

    /// The credentials for the S3 bucket
    pub credentials: S3CredentialsConfig,
}

impl Default for S3BucketConfig {
    fn default() -> Self {
        Self {
            name: "meridian".to_owned(),
            region: "us-east-1".to_owned(),
            endpoint: Some("http://localhost:9000".to_string()),
            public_url: "http://localhost:9000/meridian".to_string(),
            credentials: S3CredentialsConfig::default(),
        }
    }
}

/// Parse a config, layering defaults, an optional config file and
/// `MERI_`-prefixed environment variables (highest priority).
pub fn parse<C: DeserializeOwned + Serialize + Default>(config_file: &str) -> Result<C, config::ConfigError> {
    config::Config::builder()
        .add_source(config::Config::try_from(&C::default())?)
        .add_source(config::File::with_name(config_file).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?
        .try_deserialize()
}
