//! # Pagination Configuration
//!
//! Defaults for page sizes, deadlines and count scheduling. Values are layered
//! from an optional configuration file and `SCOUTING_QUERY_*` environment
//! variables, in that order.

use crate::error::{QueryError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable prefix, e.g. `SCOUTING_QUERY_DEFAULT_ITEMS_PER_PAGE`
pub const ENV_PREFIX: &str = "SCOUTING_QUERY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Page size used when a request does not name one
    pub default_items_per_page: u32,
    /// Upper bound for requested page sizes; `None` disables the check
    pub max_items_per_page: Option<u32>,
    /// Deadline applied when the caller supplies none
    pub query_timeout_ms: u64,
    /// Issue the page fetch and the count fetch concurrently
    pub concurrent_count: bool,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_items_per_page: 25,
            max_items_per_page: Some(1000),
            query_timeout_ms: 30_000,
            concurrent_count: false,
        }
    }
}

impl PaginationConfig {
    /// Load from environment variables only
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Load from an optional file (format chosen by extension), then apply
    /// environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| QueryError::configuration(format!("Invalid pagination config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_items_per_page == 0 {
            return Err(QueryError::configuration(
                "default_items_per_page must be positive",
            ));
        }
        if let Some(max) = self.max_items_per_page {
            if self.default_items_per_page > max {
                return Err(QueryError::configuration(format!(
                    "default_items_per_page {} exceeds max_items_per_page {max}",
                    self.default_items_per_page
                )));
            }
        }
        if self.query_timeout_ms == 0 {
            return Err(QueryError::configuration("query_timeout_ms must be positive"));
        }
        Ok(())
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}
