use thiserror::Error;

/// Unified error type for release-pilot operations
#[derive(Error, Debug)]
pub enum ReleasePilotError {
    #[error(
        "Upstream API error during {operation}{status_part}: {reason}",
        status_part = .status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
    )]
    Api {
        operation: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-pilot
pub type Result<T> = std::result::Result<T, ReleasePilotError>;

impl ReleasePilotError {
    /// Create an upstream API error with context
    pub fn api(
        operation: impl Into<String>,
        status: Option<u16>,
        reason: impl Into<String>,
    ) -> Self {
        ReleasePilotError::Api {
            operation: operation.into(),
            status,
            reason: reason.into(),
        }
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleasePilotError::Config(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        ReleasePilotError::Tag(msg.into())
    }

    /// Create a CI-output error with context
    pub fn output(msg: impl Into<String>) -> Self {
        ReleasePilotError::Output(msg.into())
    }
}
