//! Argument checks run before any request is built.

use crate::error::{GitHubError, Result};

/// Fails with [`GitHubError::InvalidArgument`] when `value` is empty or only
/// whitespace.
pub fn not_empty(value: &str, name: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GitHubError::empty_argument(name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_non_empty() {
        assert!(not_empty("secret", "client_id").is_ok());
    }

    #[test]
    fn test_rejects_empty_and_whitespace() {
        for value in ["", " ", "\t\n"] {
            match not_empty(value, "client_id") {
                Err(GitHubError::InvalidArgument { name, .. }) => assert_eq!(name, "client_id"),
                other => panic!("expected invalid argument, got {:?}", other),
            }
        }
    }
}
