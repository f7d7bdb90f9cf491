//! Client for GitHub's OAuth web endpoints.
//!
//! Every operation validates its arguments, resolves the web host from the
//! connection's base address and then issues at most one request. Nothing is
//! cached between calls.
//!
//! # Flows
//!
//! - Web application flow: send the user to [`OauthClient::login_url`], then
//!   exchange the returned code with [`OauthClient::create_access_token`].
//! - Device flow: call [`OauthClient::initiate_device_flow`], show the user
//!   code, then call [`OauthClient::create_access_token_for_device_flow`] at
//!   the returned interval until [`OauthToken::device_flow_status`] reports
//!   something other than pending.
//! - Expiring tokens: renew with
//!   [`OauthClient::create_access_token_from_renewal_token`].
//!
//! # Example
//!
//! ```no_run
//! use octolink_github::{HttpConnection, OauthClient, OauthLoginRequest, OauthTokenRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OauthClient::new(HttpConnection::with_base_url("https://api.github.com")?);
//!
//! let url = client.login_url(&OauthLoginRequest::new("my_client_id").with_scope("repo"))?;
//! println!("Open {}", url);
//!
//! let token = client
//!     .create_access_token(&OauthTokenRequest::new("my_client_id", "my_secret", "code"))
//!     .await?;
//! println!("Granted scopes: {:?}", token.scope);
//! # Ok(())
//! # }
//! ```

use crate::address::web_base_address;
use crate::connection::{Connection, FormRequest, JSON_MEDIA_TYPE};
use crate::ensure;
use crate::error::Result;
use crate::models::{
    OauthDeviceFlowRequest, OauthDeviceFlowResponse, OauthLoginRequest, OauthToken,
    OauthTokenRenewalRequest, OauthTokenRequest, DEVICE_CODE_GRANT_TYPE,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// Escapes everything except RFC 3986 unreserved characters.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Path of the authorization page.
pub const AUTHORIZE_PATH: &str = "login/oauth/authorize";

/// Path of the token endpoint.
pub const ACCESS_TOKEN_PATH: &str = "login/oauth/access_token";

/// Path of the device code endpoint.
pub const DEVICE_CODE_PATH: &str = "login/device/code";

/// OAuth client over an injected [`Connection`].
#[derive(Debug, Clone)]
pub struct OauthClient<C> {
    connection: C,
}

impl<C: Connection> OauthClient<C> {
    /// Creates a client that sends its requests through `connection`.
    pub fn new(connection: C) -> Self {
        Self { connection }
    }

    /// The underlying connection.
    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Web host the OAuth endpoints are served from.
    pub fn web_base_address(&self) -> Result<Url> {
        web_base_address(self.connection.base_address())
    }

    /// Builds the URL users visit to authorize the app.
    ///
    /// Makes no request.
    ///
    /// # Errors
    ///
    /// Returns an invalid-argument error if the client id is empty.
    pub fn login_url(&self, request: &OauthLoginRequest) -> Result<Url> {
        request.validate()?;

        let mut url = self.web_base_address()?.join(AUTHORIZE_PATH)?;
        let query = request
            .query_pairs()
            .iter()
            .map(|(key, value)| format!("{}={}", key, utf8_percent_encode(value, QUERY_VALUE)))
            .collect::<Vec<_>>()
            .join("&");
        url.set_query(Some(&query));

        debug!(host = ?url.host_str(), "built OAuth login URL");
        Ok(url)
    }

    /// Exchanges an authorization code for an access token.
    ///
    /// # Errors
    ///
    /// Returns an invalid-argument error before any request if the client id,
    /// secret or code is empty. Transport and JSON errors are passed through.
    pub async fn create_access_token(&self, request: &OauthTokenRequest) -> Result<OauthToken> {
        request.validate()?;
        self.post(ACCESS_TOKEN_PATH, request.form()).await
    }

    /// Requests a device and user code.
    ///
    /// # Errors
    ///
    /// Returns an invalid-argument error if the client id is empty.
    pub async fn initiate_device_flow(
        &self,
        request: &OauthDeviceFlowRequest,
    ) -> Result<OauthDeviceFlowResponse> {
        request.validate()?;
        self.post(DEVICE_CODE_PATH, request.form()).await
    }

    /// Exchanges a device code for an access token.
    ///
    /// Sends a single request. While the user has not finished authorizing,
    /// the returned token carries an `authorization_pending` error.
    ///
    /// # Errors
    ///
    /// Returns an invalid-argument error if the client id or device code is
    /// empty.
    pub async fn create_access_token_for_device_flow(
        &self,
        client_id: &str,
        device_flow: &OauthDeviceFlowResponse,
    ) -> Result<OauthToken> {
        ensure::not_empty(client_id, "client_id")?;
        ensure::not_empty(&device_flow.device_code, "device_code")?;

        let form = vec![
            ("client_id", client_id.to_string()),
            ("device_code", device_flow.device_code.clone()),
            ("grant_type", DEVICE_CODE_GRANT_TYPE.to_string()),
        ];
        self.post(ACCESS_TOKEN_PATH, form).await
    }

    /// Renews an expiring access token with its refresh token.
    ///
    /// # Errors
    ///
    /// Returns an invalid-argument error if any field is empty.
    pub async fn create_access_token_from_renewal_token(
        &self,
        request: &OauthTokenRenewalRequest,
    ) -> Result<OauthToken> {
        request.validate()?;
        self.post(ACCESS_TOKEN_PATH, request.form()).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &'static str,
        form: Vec<(&'static str, String)>,
    ) -> Result<T> {
        let request = FormRequest {
            host: self.web_base_address()?,
            path,
            form,
            accept: JSON_MEDIA_TYPE,
        };

        let body = self.connection.post_form(request).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GitHubError;
    use async_trait::async_trait;

    struct OfflineConnection {
        base_address: Option<Url>,
    }

    #[async_trait]
    impl Connection for OfflineConnection {
        fn base_address(&self) -> Option<&Url> {
            self.base_address.as_ref()
        }

        async fn post_form(&self, _request: FormRequest) -> Result<String> {
            Err(GitHubError::Network("offline".to_string()))
        }
    }

    fn client(base: Option<&str>) -> OauthClient<OfflineConnection> {
        OauthClient::new(OfflineConnection {
            base_address: base.map(|base| Url::parse(base).unwrap()),
        })
    }

    #[test]
    fn test_login_url_for_default_host() {
        let url = client(None)
            .login_url(&OauthLoginRequest::new("secret"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://github.com/login/oauth/authorize?client_id=secret"
        );
    }

    #[test]
    fn test_login_url_rejects_empty_client_id() {
        let error = client(None)
            .login_url(&OauthLoginRequest::new(""))
            .unwrap_err();
        assert!(error.is_argument_error());
    }

    #[tokio::test]
    async fn test_transport_error_is_passed_through() {
        let error = client(None)
            .create_access_token(&OauthTokenRequest::new("id", "secret", "code"))
            .await
            .unwrap_err();
        assert!(matches!(error, GitHubError::Network(message) if message == "offline"));
    }
}
