//! Process configuration, read once at startup.

use std::time::Duration;

use thiserror::Error;

use folio_core::AccountId;

use crate::revalidation::RevalidationTarget;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8081";
const DEFAULT_DATABASE_URL: &str = "sqlite://../database/portfolio.db";
const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got '{value}'")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Everything the server needs, resolved from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_url: String,
    pub jwt_secret: String,
    /// The single account all content is attributed to.
    pub owner_account: AccountId,
    /// Allowed CORS origins. The first one is echoed by the login route.
    pub frontend_origins: Vec<String>,
    pub revalidation: RevalidationTarget,
    pub revalidation_queue: usize,
    pub cache_ttl: Duration,
    pub cache_sweep_interval: Duration,
}

impl AppConfig {
    /// Local defaults around the given storage URL and signing key.
    pub fn new(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            database_url: database_url.into(),
            jwt_secret: jwt_secret.into(),
            owner_account: AccountId::new(1),
            frontend_origins: Vec::new(),
            revalidation: RevalidationTarget::default(),
            revalidation_queue: 32,
            cache_ttl: Duration::from_secs(5 * 60),
            cache_sweep_interval: Duration::from_secs(10 * 60),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });
        let database_url = get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let mut config = Self::new(database_url, jwt_secret);
        if let Some(addr) = get("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(raw) = get("OWNER_ACCOUNT_ID") {
            config.owner_account = raw.parse().map_err(|_| ConfigError::Invalid {
                key: "OWNER_ACCOUNT_ID",
                expected: "a positive integer",
                value: raw.clone(),
            })?;
        }
        config.frontend_origins = ["FRONTEND_URL", "FRONTEND_URL2"].into_iter().filter_map(&get).collect();
        config.revalidation = RevalidationTarget {
            url: get("NEXT_REVALIDATION_URL"),
            secret: lookup("REVALIDATION_SECRET").unwrap_or_default(),
        };
        if let Some(raw) = get("REVALIDATION_QUEUE") {
            config.revalidation_queue = parse_positive("REVALIDATION_QUEUE", &raw)? as usize;
        }
        if let Some(raw) = get("CACHE_TTL_SECS") {
            config.cache_ttl = Duration::from_secs(parse_positive("CACHE_TTL_SECS", &raw)?);
        }
        if let Some(raw) = get("CACHE_SWEEP_SECS") {
            config.cache_sweep_interval = Duration::from_secs(parse_positive("CACHE_SWEEP_SECS", &raw)?);
        }

        Ok(config)
    }

    /// Origin echoed back by the login handler.
    pub fn primary_origin(&self) -> Option<&str> {
        self.frontend_origins.first().map(String::as_str)
    }
}

fn parse_positive(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.parse::<u64>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(ConfigError::Invalid {
            key,
            expected: "a positive integer",
            value: raw.to_string(),
        }),
    }
}
