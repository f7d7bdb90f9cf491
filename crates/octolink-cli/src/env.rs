//! Environment variable handling for CI and headless use.
//!
//! Environment values override `.octolink.yaml` but are themselves
//! overridden by command-line flags. Empty values count as unset.

use std::env;

/// Environment variable names
pub const ENV_BASE_URL: &str = "OCTOLINK_BASE_URL";
pub const ENV_CLIENT_ID: &str = "OCTOLINK_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "OCTOLINK_CLIENT_SECRET";

/// Reads `name`, treating an empty or whitespace-only value as unset.
pub fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Gets the API base address from `OCTOLINK_BASE_URL`.
pub fn get_base_url_from_env() -> Option<String> {
    non_empty_var(ENV_BASE_URL)
}

/// Gets the OAuth client id from `OCTOLINK_CLIENT_ID`.
pub fn get_client_id_from_env() -> Option<String> {
    non_empty_var(ENV_CLIENT_ID)
}

/// Gets the OAuth client secret from `OCTOLINK_CLIENT_SECRET`.
pub fn get_client_secret_from_env() -> Option<String> {
    non_empty_var(ENV_CLIENT_SECRET)
}

/// Picks the first value set: flag, then environment, then config file.
pub fn resolve(
    flag: Option<String>,
    env_value: Option<String>,
    file_value: Option<String>,
) -> Option<String> {
    flag.or(env_value).or(file_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_precedence() {
        let flag = Some("flag".to_string());
        let env_value = Some("env".to_string());
        let file_value = Some("file".to_string());

        assert_eq!(resolve(flag, env_value.clone(), file_value.clone()), Some("flag".to_string()));
        assert_eq!(resolve(None, env_value, file_value.clone()), Some("env".to_string()));
        assert_eq!(resolve(None, None, file_value), Some("file".to_string()));
        assert_eq!(resolve(None, None, None), None);
    }

    #[test]
    fn test_unset_variable_is_none() {
        assert_eq!(non_empty_var("OCTOLINK_TEST_VARIABLE_THAT_IS_NEVER_SET"), None);
    }
}
