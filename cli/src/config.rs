use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_STORE_PATH: &str = "job-tracking.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    MissingVar(&'static str),
}

/// Settings read from the environment (after `.env` was loaded).
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub token: Option<String>,
    pub username: Option<String>,
    pub store_path: PathBuf,
    pub mongodb_connection_url: Option<String>,
    pub database: Option<String>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        Self {
            base_url: var("PORTAL_BASE_URL").unwrap_or_else(|| {
                log::debug!("PORTAL_BASE_URL not set, using {}", portal_api::DEFAULT_BASE_URL);
                portal_api::DEFAULT_BASE_URL.to_owned()
            }),
            token: var("PORTAL_TOKEN"),
            username: var("PORTAL_USERNAME"),
            store_path: var("STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH)),
            mongodb_connection_url: var("MONGODB_CONNECTION_URL"),
            database: var("DATABASE"),
        }
    }

    pub fn mongo(&self) -> Result<(&str, &str), ConfigError> {
        let url = self
            .mongodb_connection_url
            .as_deref()
            .ok_or(ConfigError::MissingVar("MONGODB_CONNECTION_URL"))?;
        let database = self
            .database
            .as_deref()
            .ok_or(ConfigError::MissingVar("DATABASE"))?;
        Ok((url, database))
    }
}
