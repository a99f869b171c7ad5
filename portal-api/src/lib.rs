pub mod client;
pub(crate) mod types;

pub use client::{PortalClient, DEFAULT_BASE_URL};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Request error: '{0}'")]
    Request(#[from] reqwest::Error),
    #[error("Request to '{0}' failed with status {1}")]
    RequestNotOk(String, reqwest::StatusCode),
    #[error("Unexpected response body: '{0}'")]
    Body(#[from] serde_json::Error),
    #[error("Invalid base url: '{0}'")]
    InvalidBaseUrl(String),
}
