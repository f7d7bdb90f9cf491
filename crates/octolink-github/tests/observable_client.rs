//! Tests for the single-item stream adapter.

use futures::StreamExt;
use octolink_github::{
    GitHubError, OauthClient, OauthDeviceFlowRequest, OauthDeviceFlowResponse, OauthLoginRequest,
    OauthTokenRenewalRequest, OauthTokenRequest, ObservableOauthClient,
};
use octolink_test_utils::{CannedResponse, RecordingConnection, DEVICE_CODE_BODY, TOKEN_BODY};
use std::sync::Arc;

type SharedConnection = Arc<RecordingConnection>;

fn observable(
    connection: RecordingConnection,
) -> (ObservableOauthClient<SharedConnection>, SharedConnection) {
    let connection = Arc::new(connection);
    let client = OauthClient::new(Arc::clone(&connection));
    (ObservableOauthClient::new(client), connection)
}

#[tokio::test]
async fn test_stream_yields_single_token() {
    let (client, connection) = observable(RecordingConnection::new(TOKEN_BODY));

    let items: Vec<_> = client
        .create_access_token(OauthTokenRequest::new("id", "secret", "code"))
        .collect()
        .await;

    assert_eq!(items.len(), 1);
    let token = items.into_iter().next().unwrap().unwrap();
    assert!(token.scope.contains(&"user:email".to_string()));
    assert_eq!(connection.requests().len(), 1);
}

#[tokio::test]
async fn test_stream_is_lazy() {
    let (client, connection) = observable(RecordingConnection::new(DEVICE_CODE_BODY));

    let stream = client.initiate_device_flow(OauthDeviceFlowRequest::new("clientid"));
    assert!(connection.requests().is_empty());

    let items: Vec<_> = stream.collect().await;
    assert_eq!(items.len(), 1);
    assert_eq!(connection.requests().len(), 1);
}

#[tokio::test]
async fn test_stream_yields_single_error() {
    let (client, _connection) = observable(
        RecordingConnection::new("").responding_with(CannedResponse::Network("reset".to_string())),
    );

    let items: Vec<_> = client
        .create_access_token_from_renewal_token(OauthTokenRenewalRequest::new(
            "id", "secret", "refresh",
        ))
        .collect()
        .await;

    assert_eq!(items.len(), 1);
    assert!(matches!(items[0], Err(GitHubError::Network(_))));
}

#[tokio::test]
async fn test_stream_argument_error_sends_nothing() {
    let (client, connection) = observable(RecordingConnection::new(TOKEN_BODY));
    let device_flow = OauthDeviceFlowResponse::new("devicecode", "usercode", "uri", 10, 5);

    let items: Vec<_> = client
        .create_access_token_for_device_flow("", device_flow)
        .collect()
        .await;

    assert_eq!(items.len(), 1);
    assert!(matches!(
        items[0],
        Err(GitHubError::InvalidArgument { name: "client_id", .. })
    ));
    assert!(connection.requests().is_empty());
}

#[test]
fn test_login_url_is_synchronous() {
    let (client, connection) = observable(RecordingConnection::with_base_address(
        "https://example.com/api/v3",
        "",
    ));

    let url = client.login_url(&OauthLoginRequest::new("secret")).unwrap();

    assert_eq!(
        url.as_str(),
        "https://example.com/login/oauth/authorize?client_id=secret"
    );
    assert!(connection.requests().is_empty());
}
