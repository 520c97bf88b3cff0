use thiserror::Error;

/// Error type for Transcriptic API operations.
///
/// - `RequestFailed` — network/transport errors (wraps `reqwest::Error` untouched)
/// - `InvalidHeader` — a credential or user agent that cannot be sent as a header
/// - `MissingCredential` — a required environment variable is not set
/// - `InvalidConfig` — an optional configuration value could not be parsed
///
/// HTTP status codes are never mapped to errors; a 4xx/5xx response is handed
/// back to the caller like any other.
#[derive(Debug, Error)]
pub enum TranscripticError {
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Invalid value for header {name}: {message}")]
    InvalidHeader { name: &'static str, message: String },

    #[error("Missing credential: environment variable {0} is not set")]
    MissingCredential(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, TranscripticError>;
