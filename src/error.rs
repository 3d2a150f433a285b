use thiserror::Error;

/// A request parameter failed its type or range check.
///
/// Raised locally, before anything is sent over the network.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PvWattsError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The service refused the request (HTTP 403).
    #[error("Remote error: {0}")]
    Remote(String),

    /// Connection, TLS, timeout or body decoding failure from the HTTP client.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A field requested from a result is missing or has an unexpected type.
    #[error("Lookup error: {0}")]
    Lookup(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PvWattsError>;
