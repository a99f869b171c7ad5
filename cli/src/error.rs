use job_tracking::TrackingError;
use thiserror::Error;

use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Tracking(#[from] TrackingError),
    #[error("Portal client error: '{0}'")]
    Portal(#[from] portal_api::Error),
    #[error("Persistence error: '{0}'")]
    Persistence(#[from] persistence::Error),
    #[error("Output error: '{0}'")]
    Json(#[from] serde_json::Error),
    #[error("Terminal error: '{0}'")]
    IoError(#[from] std::io::Error),
    #[error("No posting in the current listing has identity '{0}'")]
    UnknownPosting(String),
}

impl Error {
    /// Hint printed next to the error for failures the user can fix.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Error::Tracking(TrackingError::AuthRequired) => {
                Some("log in first: pass --username or set PORTAL_USERNAME")
            }
            Error::Tracking(TrackingError::NetworkFailure(_)) => {
                Some("nothing was changed locally, try again once the portal is reachable")
            }
            _ => None,
        }
    }
}
