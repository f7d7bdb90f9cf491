//! GitHub error types.

use thiserror::Error;

/// Errors that can occur during GitHub OAuth operations.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// A required argument was empty; raised before any request is sent.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Name of the offending parameter.
        name: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// Token expired or revoked (HTTP 401).
    #[error("unauthorized: credentials rejected by GitHub - check the client id and secret")]
    Unauthorized,

    /// Non-success HTTP status returned by GitHub.
    #[error("HTTP error: {status} - {body}")]
    Http {
        /// Response status code.
        status: u16,
        /// Response body, or a placeholder when it could not be read.
        body: String,
    },

    /// Network error or timeout.
    #[error("network error: {0}")]
    Network(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed base address or redirect URI.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type for GitHub operations.
pub type Result<T> = std::result::Result<T, GitHubError>;

impl GitHubError {
    /// Builds a [`GitHubError::InvalidArgument`] for an empty parameter.
    pub fn empty_argument(name: &'static str) -> Self {
        GitHubError::InvalidArgument {
            name,
            reason: "must not be empty".to_string(),
        }
    }

    /// Checks if this error is retryable.
    ///
    /// Network failures and server-side (5xx) errors are transient. Argument
    /// and authentication failures are permanent.
    pub fn is_retryable(&self) -> bool {
        match self {
            GitHubError::Network(_) => true,
            GitHubError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Checks if this error indicates an authentication problem.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, GitHubError::Unauthorized)
    }

    /// Checks if this error was raised by argument validation.
    pub fn is_argument_error(&self) -> bool {
        matches!(self, GitHubError::InvalidArgument { .. })
    }
}

impl From<reqwest::Error> for GitHubError {
    fn from(error: reqwest::Error) -> Self {
        GitHubError::Network(error.to_string())
    }
}
