//! Background access-token refresh.

use crate::error::{IdentityError, IdentityResult};
use crate::events::AuthEvent;
use crate::supabase::{ClientInner, SupabaseAuthClient};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, info, warn};

/// When the refresh task wakes and how early it renews.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    pub tick_interval: Duration,
    pub expiry_margin: chrono::Duration,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(30),
            expiry_margin: chrono::Duration::seconds(60),
        }
    }
}

impl SupabaseAuthClient {
    /// Refresh the session if it expires within the policy margin.
    ///
    /// Returns `Ok(true)` when a refresh happened. Network failures, server
    /// errors and throttling keep the session for the next tick. Any other
    /// failure drops the session and publishes `SIGNED_OUT` before returning
    /// the error.
    pub async fn refresh_if_needed(
        &self,
        policy: &RefreshPolicy,
        now: DateTime<Utc>,
    ) -> IdentityResult<bool> {
        let due = match self.current_session() {
            Some(session) => session.expires_within(policy.expiry_margin, now),
            None => false,
        };
        if !due {
            return Ok(false);
        }

        match self.refresh_session().await {
            Ok(_) => Ok(true),
            Err(IdentityError::SessionChanged) => {
                debug!("Session changed during refresh, nothing to do");
                Ok(false)
            }
            Err(e) if e.is_transient() || e.is_rate_limited() => {
                warn!(error = %e, "Session refresh failed, will retry");
                Err(e)
            }
            Err(e) => {
                warn!(error = %e, "Session refresh rejected, signing out");
                self.store_session(AuthEvent::SignedOut, None);
                Err(e)
            }
        }
    }

    /// Spawn the refresh task. Replaces any task already running.
    ///
    /// The task holds only a weak reference and exits once every clone of
    /// the client is dropped.
    pub fn start_auto_refresh(&self, policy: RefreshPolicy) {
        let weak: Weak<ClientInner> = Arc::downgrade(&self.inner);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(policy.tick_interval);
            loop {
                interval.tick().await;
                let Some(inner) = weak.upgrade() else {
                    debug!("Auth client dropped, refresh task exiting");
                    return;
                };
                let client = SupabaseAuthClient { inner };
                // Errors are logged inside.
                let _ = client.refresh_if_needed(&policy, Utc::now()).await;
            }
        });

        if let Some(previous) = self.inner.refresh_task.lock().replace(handle) {
            previous.abort();
        }
        info!(
            tick_secs = policy.tick_interval.as_secs(),
            margin_secs = policy.expiry_margin.num_seconds(),
            "Auto refresh started"
        );
    }

    /// Stop the refresh task if one is running.
    pub fn stop_auto_refresh(&self) {
        if let Some(handle) = self.inner.refresh_task.lock().take() {
            handle.abort();
            info!("Auto refresh stopped");
        }
    }
}
