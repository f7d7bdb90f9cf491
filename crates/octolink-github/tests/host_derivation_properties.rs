//! Property tests for web host derivation and login URL assembly.

use octolink_github::{web_base_address, OauthClient, OauthLoginRequest};
use octolink_test_utils::RecordingConnection;
use proptest::prelude::*;
use url::Url;

fn host_strategy() -> impl Strategy<Value = String> {
    // First label never starts with "api" so the bare host is unambiguous.
    ("[b-z][a-z0-9]{0,8}", prop::sample::select(vec!["com", "org", "net", "io"]))
        .prop_map(|(label, tld)| format!("{}.{}", label, tld))
}

fn derive(base: &str) -> String {
    let base = Url::parse(base).unwrap();
    web_base_address(Some(&base)).unwrap().to_string()
}

proptest! {
    /// `https://api.X`, `https://X/api/v3` and `https://X` all map to `https://X/`.
    #[test]
    fn prop_all_base_address_shapes_derive_bare_host(host in host_strategy()) {
        let expected = format!("https://{}/", host);

        prop_assert_eq!(derive(&format!("https://api.{}", host)), expected.clone());
        prop_assert_eq!(derive(&format!("https://{}/api/v3", host)), expected.clone());
        prop_assert_eq!(derive(&format!("https://{}", host)), expected);
    }

    /// The derived address is always a directory so relative paths join beneath it.
    #[test]
    fn prop_derived_address_ends_with_slash(host in host_strategy(), prefix in "(/[a-z]{1,6}){0,2}") {
        let derived = derive(&format!("http://{}{}/api/v3", host, prefix));
        prop_assert!(derived.ends_with('/'));
        prop_assert!(derived.starts_with("http://"));
    }

    /// A login URL built from only a client id carries exactly one query parameter.
    #[test]
    fn prop_client_id_only_login_url(client_id in "[A-Za-z0-9]{1,20}", host in host_strategy()) {
        let client = OauthClient::new(RecordingConnection::with_base_address(
            &format!("https://api.{}", host),
            "",
        ));

        let url = client.login_url(&OauthLoginRequest::new(client_id.clone())).unwrap();

        prop_assert_eq!(
            url.as_str(),
            format!("https://{}/login/oauth/authorize?client_id={}", host, client_id)
        );
    }

    /// Scopes are sent once each, in first-seen order, joined by commas.
    #[test]
    fn prop_scopes_joined_in_order(scopes in prop::collection::vec("[a-z:]{1,8}", 1..6)) {
        let client = OauthClient::new(RecordingConnection::new(""));
        let request = OauthLoginRequest::new("id").with_scopes(scopes.clone());

        let url = client.login_url(&request).unwrap();
        let scope = url
            .query_pairs()
            .find(|(key, _)| key == "scope")
            .map(|(_, value)| value.into_owned());

        let mut expected: Vec<String> = Vec::new();
        for scope in scopes {
            if !expected.contains(&scope) {
                expected.push(scope);
            }
        }
        prop_assert_eq!(scope, Some(expected.join(",")));
    }
}
