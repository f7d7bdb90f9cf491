//! Single-item stream adapter over [`OauthClient`].
//!
//! Each method returns a stream that yields exactly one item, the value or
//! the error of the wrapped call, and then ends. Nothing is sent until the
//! stream is polled.

use crate::connection::Connection;
use crate::error::Result;
use crate::models::{
    OauthDeviceFlowRequest, OauthDeviceFlowResponse, OauthLoginRequest, OauthToken,
    OauthTokenRenewalRequest, OauthTokenRequest,
};
use crate::oauth::OauthClient;
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;
use url::Url;

/// Stream-returning view of an [`OauthClient`].
#[derive(Debug)]
pub struct ObservableOauthClient<C> {
    client: Arc<OauthClient<C>>,
}

impl<C> Clone for ObservableOauthClient<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: Connection + 'static> ObservableOauthClient<C> {
    /// Wraps `client`.
    pub fn new(client: OauthClient<C>) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Wraps a client that is already shared.
    pub fn from_shared(client: Arc<OauthClient<C>>) -> Self {
        Self { client }
    }

    /// Builds the login URL. Pure, so it is not wrapped in a stream.
    pub fn login_url(&self, request: &OauthLoginRequest) -> Result<Url> {
        self.client.login_url(request)
    }

    /// See [`OauthClient::create_access_token`].
    pub fn create_access_token(
        &self,
        request: OauthTokenRequest,
    ) -> BoxStream<'static, Result<OauthToken>> {
        let client = Arc::clone(&self.client);
        stream::once(async move { client.create_access_token(&request).await }).boxed()
    }

    /// See [`OauthClient::initiate_device_flow`].
    pub fn initiate_device_flow(
        &self,
        request: OauthDeviceFlowRequest,
    ) -> BoxStream<'static, Result<OauthDeviceFlowResponse>> {
        let client = Arc::clone(&self.client);
        stream::once(async move { client.initiate_device_flow(&request).await }).boxed()
    }

    /// See [`OauthClient::create_access_token_for_device_flow`].
    pub fn create_access_token_for_device_flow(
        &self,
        client_id: impl Into<String>,
        device_flow: OauthDeviceFlowResponse,
    ) -> BoxStream<'static, Result<OauthToken>> {
        let client = Arc::clone(&self.client);
        let client_id = client_id.into();
        stream::once(async move {
            client
                .create_access_token_for_device_flow(&client_id, &device_flow)
                .await
        })
        .boxed()
    }

    /// See [`OauthClient::create_access_token_from_renewal_token`].
    pub fn create_access_token_from_renewal_token(
        &self,
        request: OauthTokenRenewalRequest,
    ) -> BoxStream<'static, Result<OauthToken>> {
        let client = Arc::clone(&self.client);
        stream::once(async move {
            client
                .create_access_token_from_renewal_token(&request)
                .await
        })
        .boxed()
    }
}
