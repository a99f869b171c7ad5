mod file;
mod mongo;

pub use file::FileKeyValue;
pub use mongo::{connect, MongoKeyValue, TRACKING_COLLECTION};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File error: '{0}'")]
    IoError(#[from] std::io::Error),
    #[error("Malformed store file '{0}': {1}")]
    Malformed(String, serde_json::Error),
    #[error("Serialization error: '{0}'")]
    Serialization(#[from] serde_json::Error),
    #[error("Database error: '{0}'")]
    Mongo(#[from] mongodb::error::Error),
}
