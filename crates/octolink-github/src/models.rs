//! Request and response types for the OAuth endpoints.

use crate::ensure;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use url::Url;

/// Grant type sent when exchanging a device code.
pub const DEVICE_CODE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Grant type sent when renewing a token.
pub const REFRESH_TOKEN_GRANT_TYPE: &str = "refresh_token";

/// Parameters of the GitHub login (authorize) URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OauthLoginRequest {
    /// Client id of the OAuth app. Required.
    pub client_id: String,
    /// Where GitHub sends the user after authorization.
    pub redirect_uri: Option<Url>,
    /// Account suggested on the sign-in page.
    pub login: Option<String>,
    /// Requested scopes, in order, without duplicates.
    pub scopes: Vec<String>,
    /// Opaque value echoed back to the redirect URI.
    pub state: Option<String>,
    /// Whether unauthenticated users may sign up during the flow.
    pub allow_signup: Option<bool>,
}

impl OauthLoginRequest {
    /// Creates a login request with only a client id.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            ..Self::default()
        }
    }

    /// Sets the redirect URI.
    pub fn with_redirect_uri(mut self, redirect_uri: Url) -> Self {
        self.redirect_uri = Some(redirect_uri);
        self
    }

    /// Sets the login hint.
    pub fn with_login(mut self, login: impl Into<String>) -> Self {
        self.login = Some(login.into());
        self
    }

    /// Adds a scope unless it is already requested.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        let scope = scope.into();
        if !self.scopes.contains(&scope) {
            self.scopes.push(scope);
        }
        self
    }

    /// Adds several scopes, keeping the first occurrence of each.
    pub fn with_scopes<I, S>(self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        scopes.into_iter().fold(self, |request, scope| request.with_scope(scope))
    }

    /// Sets the state value.
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Sets the allow-signup flag.
    pub fn with_allow_signup(mut self, allow_signup: bool) -> Self {
        self.allow_signup = Some(allow_signup);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        ensure::not_empty(&self.client_id, "client_id")
    }

    /// Query parameters in wire order. Unset and empty fields are skipped.
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("client_id", self.client_id.clone())];

        if let Some(redirect_uri) = &self.redirect_uri {
            pairs.push(("redirect_uri", redirect_uri.to_string()));
        }
        push_present(&mut pairs, "login", self.login.as_deref());
        if let Some(scope) = join_scopes(&self.scopes) {
            pairs.push(("scope", scope));
        }
        push_present(&mut pairs, "state", self.state.as_deref());
        if let Some(allow_signup) = self.allow_signup {
            pairs.push(("allow_signup", allow_signup.to_string()));
        }

        pairs
    }
}

/// Exchange of an authorization code for an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OauthTokenRequest {
    /// Client id of the OAuth app.
    pub client_id: String,
    /// Client secret of the OAuth app.
    pub client_secret: String,
    /// Code received on the redirect URI.
    pub code: String,
    /// Must match the redirect URI used for the login URL, if one was given.
    pub redirect_uri: Option<Url>,
}

impl OauthTokenRequest {
    /// Creates a code exchange request.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            code: code.into(),
            redirect_uri: None,
        }
    }

    /// Sets the redirect URI.
    pub fn with_redirect_uri(mut self, redirect_uri: Url) -> Self {
        self.redirect_uri = Some(redirect_uri);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        ensure::not_empty(&self.client_id, "client_id")?;
        ensure::not_empty(&self.client_secret, "client_secret")?;
        ensure::not_empty(&self.code, "code")
    }

    pub(crate) fn form(&self) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("client_id", self.client_id.clone()),
            ("client_secret", self.client_secret.clone()),
            ("code", self.code.clone()),
        ];
        if let Some(redirect_uri) = &self.redirect_uri {
            form.push(("redirect_uri", redirect_uri.to_string()));
        }
        form
    }
}

/// Start of the device authorization flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OauthDeviceFlowRequest {
    /// Client id of the OAuth app.
    pub client_id: String,
    /// Requested scopes, in order, without duplicates.
    pub scopes: Vec<String>,
}

impl OauthDeviceFlowRequest {
    /// Creates a device flow request.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            scopes: Vec::new(),
        }
    }

    /// Adds a scope unless it is already requested.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        let scope = scope.into();
        if !self.scopes.contains(&scope) {
            self.scopes.push(scope);
        }
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        ensure::not_empty(&self.client_id, "client_id")
    }

    pub(crate) fn form(&self) -> Vec<(&'static str, String)> {
        let mut form = vec![("client_id", self.client_id.clone())];
        if let Some(scope) = join_scopes(&self.scopes) {
            form.push(("scope", scope));
        }
        form
    }
}

/// Renewal of an expiring user token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OauthTokenRenewalRequest {
    /// Client id of the OAuth app.
    pub client_id: String,
    /// Client secret of the OAuth app.
    pub client_secret: String,
    /// Refresh token issued with the previous access token.
    pub refresh_token: String,
}

impl OauthTokenRenewalRequest {
    /// Creates a renewal request.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        ensure::not_empty(&self.client_id, "client_id")?;
        ensure::not_empty(&self.client_secret, "client_secret")?;
        ensure::not_empty(&self.refresh_token, "refresh_token")
    }

    pub(crate) fn form(&self) -> Vec<(&'static str, String)> {
        vec![
            ("client_id", self.client_id.clone()),
            ("client_secret", self.client_secret.clone()),
            ("grant_type", REFRESH_TOKEN_GRANT_TYPE.to_string()),
            ("refresh_token", self.refresh_token.clone()),
        ]
    }
}

/// Response from the device code request.
///
/// Values are returned exactly as GitHub sent them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OauthDeviceFlowResponse {
    /// Device code used to poll for the access token.
    pub device_code: String,

    /// User code to display to the user.
    pub user_code: String,

    /// URL where the user authorizes the device.
    pub verification_uri: String,

    /// Seconds until the device code expires.
    pub expires_in: u64,

    /// Minimum seconds between poll requests.
    pub interval: u64,
}

impl OauthDeviceFlowResponse {
    /// Creates a device flow response.
    pub fn new(
        device_code: impl Into<String>,
        user_code: impl Into<String>,
        verification_uri: impl Into<String>,
        expires_in: u64,
        interval: u64,
    ) -> Self {
        Self {
            device_code: device_code.into(),
            user_code: user_code.into(),
            verification_uri: verification_uri.into(),
            expires_in,
            interval,
        }
    }
}

/// Token returned by `login/oauth/access_token`.
///
/// GitHub answers failed exchanges with HTTP 200 and an `error` field, so a
/// token may carry an error instead of an access token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OauthToken {
    /// The OAuth access token.
    #[serde(default)]
    pub access_token: String,

    /// Token type (usually "bearer").
    #[serde(default)]
    pub token_type: String,

    /// Scopes granted to the token. Comma-separated on the wire.
    #[serde(default, with = "scope_list")]
    pub scope: Vec<String>,

    /// Seconds until the access token expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,

    /// Token used to renew the access token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Seconds until the refresh token expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token_expires_in: Option<u64>,

    /// OAuth error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Human-readable explanation of `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,

    /// Documentation link for `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_uri: Option<String>,
}

/// Outcome of a device code exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceFlowStatus {
    /// The user authorized the device; the token is usable.
    Authorized,
    /// The user has not finished authorizing yet.
    Pending,
    /// Polling too fast; wait five more seconds between polls.
    SlowDown,
    /// The device code expired; the flow must be restarted.
    Expired,
    /// The user cancelled the authorization.
    Denied,
    /// Any other OAuth error code.
    Failed(String),
}

impl OauthToken {
    /// Returns true when GitHub answered with an OAuth error.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Formats the OAuth error, if any, as a single line.
    pub fn error_message(&self) -> Option<String> {
        let error = self.error.as_deref()?;
        Some(match self.error_description.as_deref() {
            Some(description) => format!("{}: {}", error, description),
            None => error.to_string(),
        })
    }

    /// Classifies the response to a device code exchange.
    pub fn device_flow_status(&self) -> DeviceFlowStatus {
        match self.error.as_deref() {
            None => DeviceFlowStatus::Authorized,
            Some("authorization_pending") => DeviceFlowStatus::Pending,
            Some("slow_down") => DeviceFlowStatus::SlowDown,
            Some("expired_token") => DeviceFlowStatus::Expired,
            Some("access_denied") => DeviceFlowStatus::Denied,
            Some(other) => DeviceFlowStatus::Failed(other.to_string()),
        }
    }
}

fn push_present(pairs: &mut Vec<(&'static str, String)>, name: &'static str, value: Option<&str>) {
    if let Some(value) = value.filter(|value| !value.is_empty()) {
        pairs.push((name, value.to_string()));
    }
}

fn join_scopes(scopes: &[String]) -> Option<String> {
    let mut unique: Vec<&str> = Vec::with_capacity(scopes.len());
    for scope in scopes.iter().map(String::as_str).filter(|s| !s.is_empty()) {
        if !unique.contains(&scope) {
            unique.push(scope);
        }
    }
    if unique.is_empty() {
        None
    } else {
        Some(unique.join(","))
    }
}

/// Serde adapter for the comma-separated `scope` field.
mod scope_list {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum WireScope {
        Joined(String),
        List(Vec<String>),
    }

    pub fn serialize<S: Serializer>(scopes: &[String], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&scopes.join(","))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<String>, D::Error> {
        Ok(match Option::<WireScope>::deserialize(deserializer)? {
            None => Vec::new(),
            Some(WireScope::Joined(joined)) => joined
                .split(',')
                .map(str::trim)
                .filter(|scope| !scope.is_empty())
                .map(str::to_string)
                .collect(),
            Some(WireScope::List(list)) => list,
        })
    }
}
