//! Exit code handling for the octolink CLI.
//!
//! Library errors are mapped to stable process exit codes so scripts can
//! tell a bad invocation from a rejected credential or a network failure.

use anyhow::Error;
use octolink_github::GitHubError;
use std::process;

/// Standard exit codes used by the octolink CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    GeneralError = 1,
    /// Invalid arguments or usage
    InvalidArgs = 2,
    /// Authentication error or denied authorization
    AuthError = 3,
    /// Network error
    NetworkError = 6,
}

impl ExitCode {
    /// Get the exit code as an i32.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get a human-readable description of the exit code.
    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::GeneralError => "General error",
            ExitCode::InvalidArgs => "Invalid arguments or usage",
            ExitCode::AuthError => "Authentication error",
            ExitCode::NetworkError => "Network error",
        }
    }

    /// Convert from a library error to an ExitCode.
    pub fn from_github_error(error: &GitHubError) -> Self {
        match error {
            GitHubError::InvalidArgument { .. } | GitHubError::Url(_) => ExitCode::InvalidArgs,
            GitHubError::Unauthorized => ExitCode::AuthError,
            GitHubError::Network(_) => ExitCode::NetworkError,
            GitHubError::Http { .. } | GitHubError::Json(_) => ExitCode::GeneralError,
        }
    }

    /// Convert from an anyhow::Error, looking through its context chain.
    pub fn from_anyhow_error(error: &Error) -> Self {
        error
            .chain()
            .find_map(|cause| cause.downcast_ref::<GitHubError>())
            .map(Self::from_github_error)
            .unwrap_or(ExitCode::GeneralError)
    }
}

/// Prints `error` to stderr and terminates with the matching exit code.
pub fn exit_with_error(error: &Error, json_mode: bool) -> ! {
    let code = ExitCode::from_anyhow_error(error);

    if json_mode {
        let payload = serde_json::json!({
            "success": false,
            "error": format!("{:#}", error),
            "exit_code": code.as_i32(),
        });
        eprintln!("{}", payload);
    } else {
        eprintln!("error: {:#}", error);
    }

    tracing::debug!(
        "exiting with code {} ({})",
        code.as_i32(),
        code.description()
    );
    process::exit(code.as_i32());
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_argument_errors_map_to_invalid_args() {
        let error = GitHubError::empty_argument("client_id");
        assert_eq!(ExitCode::from_github_error(&error), ExitCode::InvalidArgs);
    }

    #[test]
    fn test_auth_and_network_codes() {
        assert_eq!(
            ExitCode::from_github_error(&GitHubError::Unauthorized),
            ExitCode::AuthError
        );
        assert_eq!(
            ExitCode::from_github_error(&GitHubError::Network("reset".to_string())),
            ExitCode::NetworkError
        );
    }

    #[test]
    fn test_context_chain_is_searched() {
        let result: Result<(), GitHubError> = Err(GitHubError::Unauthorized);
        let error = result.context("Failed to exchange code").unwrap_err();
        assert_eq!(ExitCode::from_anyhow_error(&error), ExitCode::AuthError);
    }

    #[test]
    fn test_unknown_errors_are_general() {
        let error = anyhow::anyhow!("something else");
        assert_eq!(ExitCode::from_anyhow_error(&error), ExitCode::GeneralError);
        assert_eq!(ExitCode::GeneralError.as_i32(), 1);
    }
}
