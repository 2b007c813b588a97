//! Auth-state change notifications.
//!
//! The client owns one [`AuthEventBus`]. The UI subscribes once at start-up
//! and releases the [`AuthSubscription`] on shutdown, either by calling
//! [`AuthSubscription::unsubscribe`] or by dropping it.

use crate::session::Session;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Default capacity of the broadcast channel.
const DEFAULT_CAPACITY: usize = 32;

/// Kind of auth-state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEvent {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
    PasswordRecovery,
}

impl AuthEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthEvent::InitialSession => "INITIAL_SESSION",
            AuthEvent::SignedIn => "SIGNED_IN",
            AuthEvent::SignedOut => "SIGNED_OUT",
            AuthEvent::TokenRefreshed => "TOKEN_REFRESHED",
            AuthEvent::UserUpdated => "USER_UPDATED",
            AuthEvent::PasswordRecovery => "PASSWORD_RECOVERY",
        }
    }
}

impl fmt::Display for AuthEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One notification: the event and the session current after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthChange {
    pub event: AuthEvent,
    pub session: Option<Session>,
}

impl AuthChange {
    pub fn new(event: AuthEvent, session: Option<Session>) -> Self {
        Self { event, session }
    }
}

/// Single-publisher broadcast of [`AuthChange`]s.
#[derive(Debug, Clone)]
pub struct AuthEventBus {
    sender: broadcast::Sender<AuthChange>,
}

impl Default for AuthEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl AuthEventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Register a new subscriber. It only sees changes published afterwards.
    pub fn subscribe(&self) -> AuthSubscription {
        debug!(
            subscribers = self.sender.receiver_count() + 1,
            "Auth change subscription opened"
        );
        AuthSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Publish a change to every live subscriber.
    pub fn publish(&self, change: AuthChange) {
        let event = change.event;
        match self.sender.send(change) {
            Ok(delivered) => debug!(event = %event, delivered, "Auth change published"),
            Err(_) => debug!(event = %event, "Auth change published with no subscribers"),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Handle for receiving auth-state changes.
#[derive(Debug)]
pub struct AuthSubscription {
    receiver: broadcast::Receiver<AuthChange>,
}

impl AuthSubscription {
    /// Next pending change without waiting. `None` when nothing is queued or
    /// the publisher is gone.
    pub fn try_next(&mut self) -> Option<AuthChange> {
        loop {
            match self.receiver.try_recv() {
                Ok(change) => return Some(change),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Auth change subscriber lagged, skipping ahead");
                }
                Err(broadcast::error::TryRecvError::Empty)
                | Err(broadcast::error::TryRecvError::Closed) => return None,
            }
        }
    }

    /// Wait for the next change. `None` once the publisher is gone.
    pub async fn recv(&mut self) -> Option<AuthChange> {
        loop {
            match self.receiver.recv().await {
                Ok(change) => return Some(change),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Auth change subscriber lagged, skipping ahead");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Release the subscription.
    pub fn unsubscribe(self) {
        debug!("Auth change subscription closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(AuthEvent::PasswordRecovery.as_str(), "PASSWORD_RECOVERY");
        assert_eq!(
            serde_json::to_string(&AuthEvent::TokenRefreshed).unwrap(),
            "\"TOKEN_REFRESHED\""
        );
    }

    #[test]
    fn test_subscriber_receives_in_order() {
        let bus = AuthEventBus::default();
        let mut sub = bus.subscribe();

        bus.publish(AuthChange::new(AuthEvent::SignedIn, None));
        bus.publish(AuthChange::new(AuthEvent::SignedOut, None));

        assert_eq!(sub.try_next().unwrap().event, AuthEvent::SignedIn);
        assert_eq!(sub.try_next().unwrap().event, AuthEvent::SignedOut);
        assert!(sub.try_next().is_none());
    }

    #[test]
    fn test_late_subscriber_misses_earlier_changes() {
        let bus = AuthEventBus::default();
        bus.publish(AuthChange::new(AuthEvent::SignedIn, None));

        let mut sub = bus.subscribe();
        assert!(sub.try_next().is_none());
    }

    #[test]
    fn test_unsubscribe_releases_receiver() {
        let bus = AuthEventBus::default();
        let sub = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        sub.unsubscribe();
        assert_eq!(bus.subscriber_count(), 0);

        // Publishing with nobody listening is fine.
        bus.publish(AuthChange::new(AuthEvent::SignedOut, None));
    }

    #[test]
    fn test_lagged_subscriber_skips_to_newest() {
        let bus = AuthEventBus::new(2);
        let mut sub = bus.subscribe();

        bus.publish(AuthChange::new(AuthEvent::SignedIn, None));
        bus.publish(AuthChange::new(AuthEvent::TokenRefreshed, None));
        bus.publish(AuthChange::new(AuthEvent::UserUpdated, None));

        assert_eq!(sub.try_next().unwrap().event, AuthEvent::TokenRefreshed);
        assert_eq!(sub.try_next().unwrap().event, AuthEvent::UserUpdated);
        assert!(sub.try_next().is_none());
    }

    #[tokio::test]
    async fn test_recv_ends_when_bus_dropped() {
        let bus = AuthEventBus::default();
        let mut sub = bus.subscribe();

        bus.publish(AuthChange::new(AuthEvent::PasswordRecovery, None));
        drop(bus);

        assert_eq!(sub.recv().await.unwrap().event, AuthEvent::PasswordRecovery);
        assert!(sub.recv().await.is_none());
    }
}
