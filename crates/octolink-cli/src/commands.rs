//! Command implementations behind the `octolink` subcommands.
//!
//! Each command takes already-parsed arguments and an [`OauthClient`], and
//! returns the text to print on stdout. Values missing from the command line
//! fall back to the environment and then to `.octolink.yaml`.

use crate::config::ProjectConfig;
use crate::device;
use anyhow::{bail, Context, Result};
use octolink_github::{
    Connection, OauthClient, OauthDeviceFlowRequest, OauthLoginRequest, OauthToken,
    OauthTokenRenewalRequest, OauthTokenRequest,
};
use url::Url;

/// Arguments of `octolink login-url`.
#[derive(Debug, Clone, Default)]
pub struct LoginUrlArgs {
    /// Resolved OAuth app client id
    pub client_id: String,
    /// Redirect URI flag, falls back to the config file
    pub redirect_uri: Option<String>,
    /// Suggested account
    pub login: Option<String>,
    /// Scope flags, fall back to the config file
    pub scopes: Vec<String>,
    /// Opaque state value
    pub state: Option<String>,
    /// Whether sign-up is offered
    pub allow_signup: Option<bool>,
}

/// Arguments of `octolink exchange`.
#[derive(Debug, Clone, Default)]
pub struct ExchangeArgs {
    /// Resolved OAuth app client id
    pub client_id: String,
    /// Resolved OAuth app client secret
    pub client_secret: String,
    /// Code received on the redirect URI
    pub code: String,
    /// Redirect URI flag, falls back to the config file
    pub redirect_uri: Option<String>,
}

/// Arguments of `octolink refresh`.
#[derive(Debug, Clone, Default)]
pub struct RefreshArgs {
    /// Resolved OAuth app client id
    pub client_id: String,
    /// Resolved OAuth app client secret
    pub client_secret: String,
    /// Refresh token issued with the previous access token
    pub refresh_token: String,
}

/// Picks the client id from the flag, the environment or the config file.
pub fn require_client_id(
    flag: Option<String>,
    env_value: Option<String>,
    project: &ProjectConfig,
) -> Result<String> {
    crate::env::resolve(flag, env_value, project.client_id.clone()).context(
        "No client id given - pass --client-id, set OCTOLINK_CLIENT_ID or add client_id to .octolink.yaml",
    )
}

/// Picks the client secret from the flag or the environment.
///
/// Secrets are never read from `.octolink.yaml`.
pub fn require_client_secret(flag: Option<String>, env_value: Option<String>) -> Result<String> {
    crate::env::resolve(flag, env_value, None)
        .context("No client secret given - pass --client-secret or set OCTOLINK_CLIENT_SECRET")
}

/// Uses the configured scopes when none were given on the command line.
pub fn scopes_or_default(scopes: Vec<String>, project: &ProjectConfig) -> Vec<String> {
    if scopes.is_empty() {
        project.scopes.clone()
    } else {
        scopes
    }
}

/// Parses an absolute redirect URI.
pub fn parse_redirect_uri(redirect_uri: &str) -> Result<Url> {
    Url::parse(redirect_uri).with_context(|| format!("Invalid redirect URI '{}'", redirect_uri))
}

fn redirect_uri_or_default(flag: Option<String>, project: &ProjectConfig) -> Result<Option<Url>> {
    flag.or_else(|| project.redirect_uri.clone())
        .map(|redirect_uri| parse_redirect_uri(&redirect_uri))
        .transpose()
}

/// Formats a login URL, as `{"login_url": ...}` in JSON mode.
pub fn render_login_url(url: &Url, json: bool) -> String {
    if json {
        serde_json::json!({ "login_url": url.as_str() }).to_string()
    } else {
        url.to_string()
    }
}

/// Formats a token for stdout.
///
/// # Errors
///
/// GitHub reports OAuth failures with HTTP 200 and an `error` field. Such a
/// token is turned into an error instead of being printed.
pub fn render_token(token: &OauthToken, json: bool) -> Result<String> {
    if let Some(message) = token.error_message() {
        bail!("GitHub refused the request: {}", message);
    }

    if json {
        return serde_json::to_string_pretty(token).context("Failed to serialize token");
    }

    let mut lines = vec![
        format!("access_token: {}", token.access_token),
        format!("token_type:   {}", token.token_type),
        format!("scope:        {}", token.scope.join(",")),
    ];
    if let Some(expires_in) = token.expires_in {
        lines.push(format!("expires_in:   {}s", expires_in));
    }
    if let Some(refresh_token) = &token.refresh_token {
        lines.push(format!("refresh_token: {}", refresh_token));
    }
    Ok(lines.join("\n"))
}

/// Builds the web flow login URL.
pub fn login_url<C: Connection>(
    client: &OauthClient<C>,
    project: &ProjectConfig,
    args: LoginUrlArgs,
    json: bool,
) -> Result<String> {
    let mut request = OauthLoginRequest::new(args.client_id)
        .with_scopes(scopes_or_default(args.scopes, project));
    if let Some(redirect_uri) = redirect_uri_or_default(args.redirect_uri, project)? {
        request = request.with_redirect_uri(redirect_uri);
    }
    if let Some(login) = args.login {
        request = request.with_login(login);
    }
    if let Some(state) = args.state {
        request = request.with_state(state);
    }
    if let Some(allow_signup) = args.allow_signup {
        request = request.with_allow_signup(allow_signup);
    }

    let url = client
        .login_url(&request)
        .context("Failed to build login URL")?;
    Ok(render_login_url(&url, json))
}

/// Exchanges an authorization code for a token.
pub async fn exchange<C: Connection>(
    client: &OauthClient<C>,
    project: &ProjectConfig,
    args: ExchangeArgs,
    json: bool,
) -> Result<String> {
    let mut request = OauthTokenRequest::new(args.client_id, args.client_secret, args.code);
    if let Some(redirect_uri) = redirect_uri_or_default(args.redirect_uri, project)? {
        request = request.with_redirect_uri(redirect_uri);
    }

    let token = client
        .create_access_token(&request)
        .await
        .context("Failed to exchange authorization code")?;
    render_token(&token, json)
}

/// Runs the device flow to completion.
///
/// The verification URI and user code go to stderr so stdout only carries
/// the token.
pub async fn device<C: Connection>(
    client: &OauthClient<C>,
    project: &ProjectConfig,
    client_id: String,
    scopes: Vec<String>,
    json: bool,
) -> Result<String> {
    let request = scopes_or_default(scopes, project)
        .into_iter()
        .fold(OauthDeviceFlowRequest::new(client_id.clone()), |request, scope| {
            request.with_scope(scope)
        });

    let device_flow = client
        .initiate_device_flow(&request)
        .await
        .context("Failed to start device flow")?;

    eprintln!(
        "Open {} and enter code: {}",
        device_flow.verification_uri, device_flow.user_code
    );

    let token = device::wait_for_token(client, &client_id, &device_flow).await?;
    render_token(&token, json)
}

/// Renews an access token.
pub async fn refresh<C: Connection>(
    client: &OauthClient<C>,
    args: RefreshArgs,
    json: bool,
) -> Result<String> {
    let request =
        OauthTokenRenewalRequest::new(args.client_id, args.client_secret, args.refresh_token);

    let token = client
        .create_access_token_from_renewal_token(&request)
        .await
        .context("Failed to renew access token")?;
    render_token(&token, json)
}
