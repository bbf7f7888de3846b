use anyhow::Context as _;
use async_trait::async_trait;
use common::config::RedisConfig;
use fred::clients::RedisPool;
use fred::interfaces::{ClientLike, ListInterface};
use fred::types::ServerConfig;

use super::{CatalogStore, StoreError, VideoRecord};

const CATALOG_KEY: &str = "videos";

pub async fn setup_redis(config: &RedisConfig) -> anyhow::Result<RedisPool> {
    let hosts = config
        .addresses
        .iter()
        .map(|host| {
            fred::types::Server::try_from(host.as_str()).context("failed to parse redis server address")
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let server = if hosts.len() == 1 {
        ServerConfig::Centralized {
            server: hosts.into_iter().next().expect("one host"),
        }
    } else {
        ServerConfig::Clustered { hosts }
    };

    let redis = RedisPool::new(
        fred::types::RedisConfig {
            database: Some(config.database),
            password: config.password.clone(),
            username: config.username.clone(),
            server,
            ..Default::default()
        },
        None,
        None,
        None,
        config.pool_size,
    )
    .context("failed to create redis pool")?;

    redis.connect();
    redis.wait_for_connect().await.context("failed to connect to redis")?;

    Ok(redis)
}

/// Catalog on a Redis list. Records are stored one JSON document per list
/// element so appends are a single RPUSH, which is atomic on the server.
pub struct RedisCatalog {
    redis: RedisPool,
}

impl RedisCatalog {
    pub fn new(redis: RedisPool) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl CatalogStore for RedisCatalog {
    async fn append(&self, record: &VideoRecord) -> Result<(), StoreError> {
        let payload = serde_json::to_string(record)?;

        self.redis
            .rpush::<i64, _, _>(CATALOG_KEY, payload)
            .await
            .map_err(|err| StoreError::Unavailable(err.into()))?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<VideoRecord>, StoreError> {
        let raw: Vec<String> = self
            .redis
            .lrange(CATALOG_KEY, 0, -1)
            .await
            .map_err(|err| StoreError::Unavailable(err.into()))?;

        raw.iter()
            .map(|entry| serde_json::from_str(entry).map_err(StoreError::from))
            .collect()
    }
}
