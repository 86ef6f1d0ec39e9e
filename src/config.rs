use std::env;

use reqwest::Url;

use crate::constants::{KEY_ENV, MEAL_TABLE, TABLE_ENV, URL_ENV};
use crate::errors::ConfigError;

/// Connection parameters of the remote table store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub url: Url,
    pub key: String,
    pub table: String,
}

impl StoreConfig {
    pub fn new(url: &str, key: &str, table: Option<&str>) -> Result<Self, ConfigError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ConfigError::Missing(URL_ENV));
        }
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::Missing(KEY_ENV));
        }

        let url = Url::parse(url).map_err(|e| ConfigError::InvalidUrl {
            var: URL_ENV,
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                var: URL_ENV,
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        let table = table
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(MEAL_TABLE)
            .to_string();

        Ok(StoreConfig {
            url,
            key: key.to_string(),
            table,
        })
    }

    /// Reads `SUPABASE_URL`, `SUPABASE_ANON_KEY` and the optional `MEAL_TABLE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = env::var(URL_ENV).map_err(|_| ConfigError::Missing(URL_ENV))?;
        let key = env::var(KEY_ENV).map_err(|_| ConfigError::Missing(KEY_ENV))?;
        let table = env::var(TABLE_ENV).ok();

        Self::new(&url, &key, table.as_deref())
    }

    /// `{url}/rest/v1/{table}`
    pub fn table_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.url.as_str().trim_end_matches('/'),
            crate::constants::REST_PATH,
            self.table
        )
    }
}
