use thiserror::Error;

/// Unified error type for release-pr operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version error: {0}")]
    Version(String),

    #[error("Invalid bump level: {0}.")]
    InvalidBumpLevel(u8),

    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("API transport failed: {0}")]
    Transport(String),

    #[error("{message}")]
    Operation {
        message: String,
        #[source]
        source: Box<ReleaseError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in release-pr
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        ReleaseError::Manifest(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseError::Version(msg.into())
    }

    /// Create an API error for a non-success HTTP status
    pub fn api(status: u16, msg: impl Into<String>) -> Self {
        ReleaseError::Api {
            status,
            message: msg.into(),
        }
    }

    /// Create a transport error (connection, TLS, malformed response)
    pub fn transport(msg: impl Into<String>) -> Self {
        ReleaseError::Transport(msg.into())
    }

    /// Whether the hosting API answered 404 Not Found
    pub fn is_not_found(&self) -> bool {
        matches!(self, ReleaseError::Api { status: 404, .. })
    }
}

/// Runs a collaborator step and replaces any failure with a stable message.
///
/// The original error is logged before being wrapped, and stays reachable
/// through [`std::error::Error::source`].
pub fn try_execute<T>(context: impl Into<String>, step: impl FnOnce() -> Result<T>) -> Result<T> {
    step().map_err(|source| {
        log::error!("{}", source);
        ReleaseError::Operation {
            message: context.into(),
            source: Box::new(source),
        }
    })
}
