//! Typed client for GitHub's OAuth endpoints.
//!
//! This crate builds login URLs and performs the code, device and refresh
//! token exchanges against github.com or a GitHub Enterprise host. All
//! network access goes through the [`Connection`] trait so the transport can
//! be replaced.
//!
//! # Modules
//!
//! - `oauth`: login URL and token exchanges
//! - `observable`: single-item stream wrappers around `oauth`
//! - `connection`: transport trait and `reqwest` implementation
//! - `address`: web host derivation from an API base address
//! - `models`: request and response types
//! - `error`: GitHub error types

#![deny(missing_docs)]
#![deny(clippy::all)]

pub mod address;
pub mod connection;
pub mod ensure;
pub mod error;
pub mod models;
pub mod oauth;
pub mod observable;

// Re-export commonly used types
pub use address::web_base_address;
pub use connection::{Connection, ConnectionConfig, FormRequest, HttpConnection};
pub use error::{GitHubError, Result};
pub use models::{
    DeviceFlowStatus, OauthDeviceFlowRequest, OauthDeviceFlowResponse, OauthLoginRequest,
    OauthToken, OauthTokenRenewalRequest, OauthTokenRequest,
};
pub use oauth::OauthClient;
pub use observable::ObservableOauthClient;
