use thiserror::Error;

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("Empty version string: {0:?}")]
    Empty(String),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timed out: {url}")]
    Timeout { url: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Empty response body from {url}")]
    EmptyBody { url: String },
}

impl FetchError {
    /// Whether the failure was a timeout rather than a hard network error
    pub fn is_timeout(&self) -> bool {
        match self {
            FetchError::Timeout { .. } => true,
            FetchError::Network(e) => e.is_timeout(),
            _ => false,
        }
    }
}
