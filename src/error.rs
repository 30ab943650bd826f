use thiserror::Error;

#[derive(Debug, Error)]
pub enum AcresbotError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Request-descriptor errors
    #[error("Request descriptor parse error: {0}")]
    Parse(String),

    // Network errors
    #[error("Network timeout: {0}")]
    Timeout(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Network error: {0}")]
    Network(String),

    // Response errors
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    // Notification errors
    #[error("Notification error: {0}")]
    Notify(String),
}

impl From<wreq::Error> for AcresbotError {
    fn from(err: wreq::Error) -> Self {
        if err.is_timeout() {
            AcresbotError::Timeout(err.to_string())
        } else if err.is_connect() {
            AcresbotError::Network(format!("Connection failed: {}", err))
        } else if let Some(status) = err.status() {
            match status.as_u16() {
                401 | 403 => AcresbotError::Unauthorized(err.to_string()),
                _ => AcresbotError::Network(err.to_string()),
            }
        } else {
            AcresbotError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AcresbotError {
    fn from(err: serde_json::Error) -> Self {
        AcresbotError::InvalidJson(err.to_string())
    }
}

/// Type alias for Result with AcresbotError
pub type Result<T> = std::result::Result<T, AcresbotError>;
