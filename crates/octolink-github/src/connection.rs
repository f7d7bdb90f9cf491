//! Transport seam for OAuth requests.
//!
//! The OAuth client never talks to the network directly. It builds a
//! [`FormRequest`] and hands it to a [`Connection`], which is responsible for
//! sending it and returning the raw response body. [`HttpConnection`] is the
//! `reqwest`-backed implementation; tests substitute a recording fake.

use crate::error::{GitHubError, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Content type of every OAuth POST body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Media type requested from the OAuth endpoints.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Settings used to build an [`HttpConnection`].
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Root address of the API. `None` means github.com.
    pub base_address: Option<Url>,
    /// Value of the `User-Agent` header. GitHub rejects requests without one.
    pub user_agent: String,
    /// Timeout applied to each request.
    pub timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            base_address: None,
            user_agent: format!("octolink/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ConnectionConfig {
    /// Sets the base address.
    pub fn with_base_address(mut self, base_address: Url) -> Self {
        self.base_address = Some(base_address);
        self
    }

    /// Sets the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A form-encoded POST aimed at one of the OAuth endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRequest {
    /// Web host the path is resolved against. Always ends in `/`.
    pub host: Url,
    /// Path relative to `host`, e.g. `login/oauth/access_token`.
    pub path: &'static str,
    /// Form fields in wire order.
    pub form: Vec<(&'static str, String)>,
    /// Value of the `Accept` header.
    pub accept: &'static str,
}

impl FormRequest {
    /// Encodes the form fields as `application/x-www-form-urlencoded`.
    pub fn encoded_body(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.form.iter().map(|(key, value)| (*key, value.as_str())))
            .finish()
    }

    /// Absolute URL the request is sent to.
    pub fn target(&self) -> Result<Url> {
        Ok(self.host.join(self.path)?)
    }

    /// Looks up a form field by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP-capable connection to GitHub.
#[async_trait]
pub trait Connection: Send + Sync {
    /// The configured API root, if any.
    fn base_address(&self) -> Option<&Url>;

    /// Sends a form POST and returns the response body.
    async fn post_form(&self, request: FormRequest) -> Result<String>;
}

#[async_trait]
impl<C: Connection + ?Sized> Connection for Arc<C> {
    fn base_address(&self) -> Option<&Url> {
        (**self).base_address()
    }

    async fn post_form(&self, request: FormRequest) -> Result<String> {
        (**self).post_form(request).await
    }
}

/// [`Connection`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpConnection {
    base_address: Option<Url>,
    http_client: reqwest::Client,
}

impl HttpConnection {
    /// Creates a connection from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            base_address: config.base_address,
            http_client,
        })
    }

    /// Creates a connection against `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::Url`] if `base_url` is not an absolute URL.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let base_address = Url::parse(base_url)?;
        Self::new(ConnectionConfig::default().with_base_address(base_address))
    }
}

#[async_trait]
impl Connection for HttpConnection {
    fn base_address(&self) -> Option<&Url> {
        self.base_address.as_ref()
    }

    async fn post_form(&self, request: FormRequest) -> Result<String> {
        let url = request.target()?;
        debug!(url = %url, "posting OAuth form");

        let response = self
            .http_client
            .post(url.clone())
            .header(ACCEPT, request.accept)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(request.encoded_body())
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!(url = %url, "GitHub rejected OAuth credentials");
            return Err(GitHubError::Unauthorized);
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!(url = %url, status = status.as_u16(), "OAuth request failed");
            return Err(GitHubError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.text().await?)
    }
}
