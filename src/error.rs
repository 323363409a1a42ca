//! Error types for the Kafka Connect client
//!
//! Every public API returns `Result<T, Error>`. The first five variants are
//! the outcomes of a call against the cluster; the rest cover local
//! plumbing (configuration, decoding, files).

use thiserror::Error;

/// The main error type for the client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Cluster Outcomes
    // ============================================================================
    /// The target resource does not exist (HTTP 404).
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// The cluster is rebalancing and refused the request (HTTP 409).
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// The request was rejected as malformed (HTTP 4xx other than 404/409).
    #[error("Invalid request (HTTP {status}): {message}")]
    InvalidRequest { status: u16, message: String },

    /// The cluster failed to process the request (HTTP 5xx).
    #[error("Server error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },

    /// The cluster could not be reached (DNS, refused connection, timeout).
    #[error("Cluster unreachable: {message}")]
    Unreachable { message: String },

    // ============================================================================
    // Decoding Errors
    // ============================================================================
    #[error("Unexpected response from '{path}': {message}")]
    Decode { path: String, message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(status: u16, message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            status,
            message: message.into(),
        }
    }

    /// Create a server error
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            message: message.into(),
        }
    }

    /// Create an unreachable error
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Map a non-success HTTP status and the server's message to an error
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            404 => Self::not_found(message),
            409 => Self::conflict(message),
            400..=499 => Self::invalid_request(status, message),
            _ => Self::server(status, message),
        }
    }

    /// HTTP status that produced this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::NotFound { .. } => Some(404),
            Error::Conflict { .. } => Some(409),
            Error::InvalidRequest { status, .. } | Error::ServerError { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Check if this error means the resource is absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Check if retrying the same call may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Conflict { .. } | Error::ServerError { .. } | Error::Unreachable { .. }
        )
    }
}

/// Result type alias for the client
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for results of calls that address a single resource
pub trait ResultExt<T> {
    /// Turn `NotFound` into `Ok(None)`, keeping every other error
    fn optional(self) -> Result<Option<T>>;
}

impl<T> ResultExt<T> for Result<T> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
