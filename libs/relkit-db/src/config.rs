//! Database configuration.
//!
//! Deserializable from any figment provider (YAML file, env vars,
//! serialized defaults), matching how the surrounding services load their
//! sections.

use std::time::Duration;

use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Connection and paging configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Connection string, e.g. `sqlite::memory:` or `postgres://...`.
    pub dsn: String,

    /// Maximum pool size.
    pub max_conns: u32,
    /// Minimum pool size.
    pub min_conns: u32,
    /// Timeout to acquire a connection from the pool.
    #[serde(with = "humantime_serde")]
    pub acquire_timeout: Duration,
    /// Idle timeout before a pooled connection is closed.
    #[serde(with = "humantime_serde")]
    pub idle_timeout: Option<Duration>,

    /// Page size applied when a select does not ask for one.
    pub select_limit: u64,
    /// Hard cap on any requested page size.
    pub max_limit: u64,

    /// Deployment-internal table name prefix, stripped from
    /// constraint-violation diagnostics before they reach callers.
    pub table_prefix: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            dsn: "sqlite::memory:".to_owned(),
            max_conns: 10,
            min_conns: 0,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: None,
            select_limit: 1_000,
            max_limit: 10_000,
            table_prefix: String::new(),
        }
    }
}

impl DbConfig {
    /// Extract the `db` section from a figment.
    ///
    /// # Errors
    /// Returns [`DataError::Config`] if extraction or validation fails.
    pub fn from_figment(figment: &Figment) -> Result<Self, DataError> {
        let cfg: Self = figment
            .extract_inner("db")
            .map_err(|e| DataError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), DataError> {
        if self.dsn.is_empty() {
            return Err(DataError::Config("dsn must not be empty".to_owned()));
        }
        if self.max_limit == 0 || self.select_limit == 0 {
            return Err(DataError::Config(
                "select_limit and max_limit must be positive".to_owned(),
            ));
        }
        if self.select_limit > self.max_limit {
            return Err(DataError::Config(
                "select_limit must not exceed max_limit".to_owned(),
            ));
        }
        Ok(())
    }

    /// Paging bounds derived from this configuration.
    #[must_use]
    pub fn limits(&self) -> Limits {
        Limits {
            default: self.select_limit,
            max: self.max_limit,
        }
    }
}

/// Default and maximum page sizes for selects.
#[derive(Clone, Copy, Debug)]
pub struct Limits {
    pub default: u64,
    pub max: u64,
}
