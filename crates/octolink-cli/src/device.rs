//! Polling loop for the OAuth device flow.
//!
//! The library sends one request per call. This module repeats the device
//! code exchange at the interval GitHub asked for until the user authorizes,
//! denies, or the code expires.

use anyhow::{bail, Context, Result};
use octolink_github::{
    Connection, DeviceFlowStatus, GitHubError, OauthClient, OauthDeviceFlowResponse, OauthToken,
};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

/// Extra delay GitHub asks for on every `slow_down` response.
pub const SLOW_DOWN_STEP: Duration = Duration::from_secs(5);

/// Polls the token endpoint until the device flow finishes.
///
/// # Errors
///
/// Fails when the user denies access, the device code expires, GitHub
/// reports another OAuth error, or a request fails.
pub async fn wait_for_token<C: Connection>(
    client: &OauthClient<C>,
    client_id: &str,
    device_flow: &OauthDeviceFlowResponse,
) -> Result<OauthToken> {
    let mut interval = Duration::from_secs(device_flow.interval.max(1));
    // An expiry too far out to represent means no local deadline.
    let deadline = Instant::now().checked_add(Duration::from_secs(device_flow.expires_in));

    loop {
        sleep(interval).await;

        let token = client
            .create_access_token_for_device_flow(client_id, device_flow)
            .await
            .context("Failed to poll for device flow token")?;

        match token.device_flow_status() {
            DeviceFlowStatus::Authorized => {
                info!("device authorized");
                return Ok(token);
            }
            DeviceFlowStatus::Pending => debug!("authorization pending"),
            DeviceFlowStatus::SlowDown => {
                interval += SLOW_DOWN_STEP;
                debug!(interval_secs = interval.as_secs(), "slowing down polling");
            }
            DeviceFlowStatus::Expired => {
                bail!("device code expired - please restart the authentication flow")
            }
            DeviceFlowStatus::Denied => {
                return Err(anyhow::Error::new(GitHubError::Unauthorized)
                    .context("user denied authorization"));
            }
            DeviceFlowStatus::Failed(_) => bail!(
                "authorization failed: {}",
                token.error_message().unwrap_or_default()
            ),
        }

        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            bail!("device code expired - please restart the authentication flow");
        }
    }
}
