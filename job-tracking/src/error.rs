use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrackingError>;

#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("Login required to change tracked jobs")]
    AuthRequired,
    #[error("Network failure: '{0}'")]
    NetworkFailure(#[from] BackendError),
    #[error("Storage error: '{0}'")]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage backend error: '{0}'")]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),
    #[error("Malformed stored value under '{key}': {source}")]
    Malformed {
        key: String,
        source: serde_json::Error,
    },
    #[error("Serialization error: '{0}'")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn backend<E>(e: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StoreError::Backend(Box::new(e))
    }
}

/// Failure of a call to the portal backend.
#[derive(Debug, Error)]
#[error("{context}: {source}")]
pub struct BackendError {
    context: String,
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl BackendError {
    pub fn new<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            context: context.into(),
            source: Box::new(source),
        }
    }

    pub fn context(&self) -> &str {
        &self.context
    }
}
