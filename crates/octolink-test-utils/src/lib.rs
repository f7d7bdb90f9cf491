//! Shared test utilities for octolink.
//!
//! Provides a [`RecordingConnection`] that stands in for the HTTP transport:
//! it records every request it is given and answers with a canned body.

#![allow(missing_docs)]

use async_trait::async_trait;
use octolink_github::{Connection, FormRequest, GitHubError, Result};
use std::collections::VecDeque;
use std::sync::Mutex;
use url::Url;

/// What the fake connection answers with.
#[derive(Debug, Clone)]
pub enum CannedResponse {
    Body(String),
    Status { status: u16, body: String },
    Network(String),
}

/// A [`Connection`] that records requests instead of sending them.
#[derive(Debug)]
pub struct RecordingConnection {
    base_address: Option<Url>,
    responses: Mutex<VecDeque<CannedResponse>>,
    requests: Mutex<Vec<FormRequest>>,
}

impl RecordingConnection {
    /// Connection without a base address that answers `body`.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            base_address: None,
            responses: Mutex::new(VecDeque::from([CannedResponse::Body(body.into())])),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Connection against `base_address` that answers `body`.
    pub fn with_base_address(base_address: &str, body: impl Into<String>) -> Self {
        Self {
            base_address: Some(Url::parse(base_address).expect("test base address must parse")),
            ..Self::new(body)
        }
    }

    /// Replaces the canned response.
    pub fn responding_with(self, response: CannedResponse) -> Self {
        self.responding_in_order(vec![response])
    }

    /// Answers with `responses` one per request. The last one repeats.
    pub fn responding_in_order(mut self, responses: Vec<CannedResponse>) -> Self {
        assert!(!responses.is_empty(), "at least one response is required");
        self.responses = Mutex::new(responses.into());
        self
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<FormRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The only request received. Panics unless exactly one was sent.
    pub fn single_request(&self) -> FormRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }
}

#[async_trait]
impl Connection for RecordingConnection {
    fn base_address(&self) -> Option<&Url> {
        self.base_address.as_ref()
    }

    async fn post_form(&self, request: FormRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request);

        let response = {
            let mut responses = self.responses.lock().unwrap();
            if responses.len() > 1 {
                responses.pop_front().unwrap()
            } else {
                responses.front().cloned().unwrap()
            }
        };

        match &response {
            CannedResponse::Body(body) => Ok(body.clone()),
            CannedResponse::Status { status, body } => Err(GitHubError::Http {
                status: *status,
                body: body.clone(),
            }),
            CannedResponse::Network(message) => Err(GitHubError::Network(message.clone())),
        }
    }
}

/// Token body GitHub returns for a successful exchange.
pub const TOKEN_BODY: &str =
    r#"{"access_token":"token-goes-here","token_type":"bearer","scope":"notifications,user,user:email"}"#;

/// Body GitHub returns for a device code request.
pub const DEVICE_CODE_BODY: &str = r#"{"device_code":"devicecode","user_code":"usercode","verification_uri":"uri","expires_in":10,"interval":5}"#;
