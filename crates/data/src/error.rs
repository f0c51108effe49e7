use thiserror::Error;

/// Error from a listing source or the flywheel service.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Failed to decode {what}: {reason}")]
    Decode { what: &'static str, reason: String },
}
