//! Revocation propagation from the authority service to the resource
//! service.
//!
//! The call is fire-and-forget: logout never blocks on, retries, or fails
//! because of the remote side. The revocation is already durable locally;
//! until the notice lands, the resource service keeps honoring the
//! session's access tokens for at most the propagation latency. That window
//! is the accepted trade-off of availability over immediate global
//! consistency; a durable outbox would slot in here if that ever changes.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::users::User;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidateSessionRequest {
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvalidateSessionResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotifyUserCreatedRequest {
    pub id: u64,
    pub username: String,
    pub role: crate::authz::Role,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotifyUserCreatedResponse {
    pub success: bool,
}

pub struct RevocationPropagator {
    client: reqwest::Client,
    resource_url: String,
}

impl RevocationPropagator {
    pub fn new(resource_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(2)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            resource_url,
        })
    }

    /// Notify the resource service that a session is revoked.
    ///
    /// Spawned off the logout request path; failure is logged and dropped.
    pub fn spawn_invalidate(&self, session_id: String) {
        let client = self.client.clone();
        let url = format!("{}/_internal/invalidate-session", self.resource_url);

        tokio::spawn(async move {
            match send_invalidate(&client, &url, &session_id).await {
                Ok(true) => {
                    debug!(session_id = %session_id, "Revocation propagated");
                }
                Ok(false) => {
                    warn!(
                        session_id = %session_id,
                        "Resource service did not acknowledge revocation; \
                         its copy lapses only at natural token expiry"
                    );
                }
                Err(e) => {
                    warn!(
                        session_id = %session_id,
                        error = %e,
                        "Revocation propagation failed; not retried"
                    );
                }
            }
        });
    }

    /// Push a user record to the resource service's directory.
    pub async fn notify_user_created(&self, user: &User) -> Result<bool, reqwest::Error> {
        let url = format!("{}/_internal/users", self.resource_url);
        let request = NotifyUserCreatedRequest {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        };

        let response = self.client.post(&url).json(&request).send().await?;
        if !response.status().is_success() {
            warn!(status = %response.status(), "User notification rejected");
            return Ok(false);
        }
        let body: NotifyUserCreatedResponse = response.json().await?;
        Ok(body.success)
    }
}

async fn send_invalidate(
    client: &reqwest::Client,
    url: &str,
    session_id: &str,
) -> Result<bool, reqwest::Error> {
    let request = InvalidateSessionRequest {
        session_id: session_id.to_string(),
    };

    let response = client.post(url).json(&request).send().await?;
    if !response.status().is_success() {
        return Ok(false);
    }
    let body: InvalidateSessionResponse = response.json().await?;
    Ok(body.success)
}
