use std::str::FromStr;

use deadpool_postgres::{
    Config, CreatePoolError, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime,
};
use thiserror::Error;
use tokio_postgres::NoTls;

pub type PgPool = Pool;

/// Connections kept for candidate snapshots; one assignment holds one.
pub const DEFAULT_POOL_SIZE: usize = 4;

#[derive(Debug, Error)]
pub enum DbPoolError {
    #[error("LA_DATABASE_URL is not set")]
    MissingUrl,
    #[error("invalid database url: {0}")]
    InvalidUrl(String),
    #[error("failed to create database pool: {0}")]
    PoolCreation(#[from] CreatePoolError),
}

/// Where the candidate supplier connects and how many connections it may hold.
#[derive(Clone, PartialEq)]
pub struct PoolSettings {
    pub url: String,
    pub max_size: usize,
}

impl std::fmt::Debug for PoolSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolSettings")
            .field("url", &"<redacted>")
            .field("max_size", &self.max_size)
            .finish()
    }
}

impl PoolSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_size: DEFAULT_POOL_SIZE,
        }
    }

    /// `LA_DATABASE_URL` (required) and `LA_DB_POOL_SIZE` (positive, else default).
    pub fn from_env() -> Result<Self, DbPoolError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, DbPoolError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("LA_DATABASE_URL")
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .ok_or(DbPoolError::MissingUrl)?;
        let max_size = lookup("LA_DB_POOL_SIZE")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_POOL_SIZE);

        Ok(Self { url, max_size })
    }

    /// Validate the URL and build a pool. Nothing connects until the first `get`.
    pub fn build(&self) -> Result<PgPool, DbPoolError> {
        tokio_postgres::Config::from_str(&self.url)
            .map_err(|e| DbPoolError::InvalidUrl(e.to_string()))?;

        let mut cfg = Config::new();
        cfg.url = Some(self.url.clone());
        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        cfg.pool = Some(PoolConfig::new(self.max_size));

        Ok(cfg.create_pool(Some(Runtime::Tokio1), NoTls)?)
    }
}

/// [`PoolSettings::build`] with the default pool size.
pub fn create_pool_from_url(db_url: &str) -> Result<PgPool, DbPoolError> {
    PoolSettings::new(db_url).build()
}
