//! Supabase GoTrue client for email/password authentication.
//!
//! Talks to `{api_url}/auth/v1/*` with the project's anon key. Sessions live
//! only in memory; every change is published on the client's
//! [`AuthEventBus`].

use crate::error::{IdentityError, IdentityResult};
use crate::events::{AuthChange, AuthEvent, AuthEventBus, AuthSubscription};
use crate::provider::{IdentityProvider, OtpType, SignUpOutcome};
use crate::session::{Session, TokenResponse, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

fn summarize_response_body(body: &str) -> String {
    let mut hasher = DefaultHasher::new();
    body.hash(&mut hasher);
    format!("len={},digest={:016x}", body.len(), hasher.finish())
}

/// Supabase auth client. Cheap to clone; clones share the session.
#[derive(Clone)]
pub struct SupabaseAuthClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    http_client: reqwest::Client,
    api_url: String,
    anon_key: String,
    session: RwLock<SessionSlot>,
    events: AuthEventBus,
    pub(crate) refresh_task: Mutex<Option<JoinHandle<()>>>,
}

/// The held session plus a counter bumped on every store, so an in-flight
/// refresh can tell whether the session it started from is still current.
#[derive(Default)]
struct SessionSlot {
    session: Option<Session>,
    generation: u64,
}

#[derive(Debug, Serialize)]
struct PasswordCredentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    #[serde(rename = "type")]
    otp_type: OtpType,
    email: &'a str,
    token: &'a str,
}

#[derive(Debug, Serialize)]
struct ResendRequest<'a> {
    #[serde(rename = "type")]
    otp_type: OtpType,
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct RecoverRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct PasswordUpdate<'a> {
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// `/signup` answers with a token grant when confirmation is disabled, and
/// with the bare user (or `{"user": ...}`) when a code was emailed.
fn parse_sign_up_body(body: serde_json::Value, now: DateTime<Utc>) -> IdentityResult<SignUpOutcome> {
    if body.get("access_token").is_some() {
        let response: TokenResponse = serde_json::from_value(body)?;
        let session = response.into_session(now);
        return Ok(SignUpOutcome {
            user: session.user.clone(),
            session: Some(session),
        });
    }

    let user_value = match body.get("user") {
        Some(user) if user.is_object() => user.clone(),
        _ => body,
    };
    let user: User = serde_json::from_value(user_value)?;
    Ok(SignUpOutcome {
        user,
        session: None,
    })
}

impl SupabaseAuthClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `api_url` - The Supabase project URL (e.g., `https://xyz.supabase.co`)
    /// * `anon_key` - The project's anon (public) API key
    pub fn new(api_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            inner: Arc::new(ClientInner {
                http_client: reqwest::Client::new(),
                api_url,
                anon_key: anon_key.into(),
                session: RwLock::new(SessionSlot::default()),
                events: AuthEventBus::default(),
                refresh_task: Mutex::new(None),
            }),
        }
    }

    /// Build the GoTrue URL for an endpoint.
    fn auth_url(&self, endpoint: &str) -> String {
        format!("{}/auth/v1/{}", self.inner.api_url, endpoint)
    }

    /// Snapshot of the session currently held.
    pub fn current_session(&self) -> Option<Session> {
        self.inner.session.read().session.clone()
    }

    fn access_token(&self) -> IdentityResult<String> {
        self.inner
            .session
            .read()
            .session
            .as_ref()
            .map(|s| s.access_token.clone())
            .ok_or(IdentityError::NotLoggedIn)
    }

    /// Replace the held session and tell subscribers.
    pub(crate) fn store_session(&self, event: AuthEvent, session: Option<Session>) {
        let mut slot = self.inner.session.write();
        slot.session = session.clone();
        slot.generation += 1;
        self.inner.events.publish(AuthChange::new(event, session));
    }

    /// Store a refreshed session only if nothing replaced or cleared the
    /// session since `generation` was read.
    fn store_refreshed(&self, generation: u64, session: Session) -> bool {
        let mut slot = self.inner.session.write();
        if slot.generation != generation || slot.session.is_none() {
            return false;
        }
        slot.session = Some(session.clone());
        slot.generation += 1;
        self.inner
            .events
            .publish(AuthChange::new(AuthEvent::TokenRefreshed, Some(session)));
        true
    }

    /// Send a request with the anon key; non-2xx answers become
    /// [`IdentityError::Api`].
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        operation: &'static str,
    ) -> IdentityResult<reqwest::Response> {
        let response = request
            .header("apikey", &self.inner.anon_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let body_summary = summarize_response_body(&body);
        let err = IdentityError::from_response(status.as_u16(), &body);
        warn!(
            operation,
            status = %status,
            code = ?err.code(),
            body_summary = %body_summary,
            "Identity provider request failed"
        );
        Err(err)
    }

    async fn token_grant(
        &self,
        request: reqwest::RequestBuilder,
        operation: &'static str,
    ) -> IdentityResult<Session> {
        let response = self.send(request, operation).await?;
        let grant: TokenResponse = response.json().await?;
        Ok(grant.into_session(Utc::now()))
    }

    /// Exchange the refresh token for a new session.
    ///
    /// Publishes `TOKEN_REFRESHED` on success. If the session was signed out
    /// or replaced while the request was in flight, the new tokens are
    /// discarded and [`IdentityError::SessionChanged`] is returned.
    pub async fn refresh_session(&self) -> IdentityResult<Session> {
        let (refresh_token, generation) = {
            let slot = self.inner.session.read();
            let token = slot
                .session
                .as_ref()
                .map(|s| s.refresh_token.clone())
                .ok_or(IdentityError::NotLoggedIn)?;
            (token, slot.generation)
        };

        debug!("Refreshing session");

        let request = self
            .inner
            .http_client
            .post(self.auth_url("token?grant_type=refresh_token"))
            .json(&RefreshRequest {
                refresh_token: &refresh_token,
            });
        let session = self.token_grant(request, "refresh_session").await?;

        if !self.store_refreshed(generation, session.clone()) {
            debug!("Session changed during refresh, discarding new tokens");
            return Err(IdentityError::SessionChanged);
        }
        info!(user_id = %session.user.id, "Session refreshed");
        Ok(session)
    }
}

#[async_trait]
impl IdentityProvider for SupabaseAuthClient {
    async fn get_session(&self) -> IdentityResult<Option<Session>> {
        Ok(self.current_session())
    }

    fn subscribe(&self) -> AuthSubscription {
        self.inner.events.subscribe()
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> IdentityResult<Session> {
        debug!(email = %email, "Signing in with password");

        let request = self
            .inner
            .http_client
            .post(self.auth_url("token?grant_type=password"))
            .json(&PasswordCredentials { email, password });
        let session = self.token_grant(request, "sign_in").await?;

        info!(user_id = %session.user.id, "Signed in");
        self.store_session(AuthEvent::SignedIn, Some(session.clone()));
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> IdentityResult<SignUpOutcome> {
        debug!(email = %email, "Signing up");

        let request = self
            .inner
            .http_client
            .post(self.auth_url("signup"))
            .json(&PasswordCredentials { email, password });
        let response = self.send(request, "sign_up").await?;
        let body: serde_json::Value = response.json().await?;
        let outcome = parse_sign_up_body(body, Utc::now())?;

        match &outcome.session {
            Some(session) => {
                info!(user_id = %outcome.user.id, "Signed up with immediate session");
                self.store_session(AuthEvent::SignedIn, Some(session.clone()));
            }
            None => info!(user_id = %outcome.user.id, "Signed up, confirmation code sent"),
        }

        Ok(outcome)
    }

    async fn verify_otp(
        &self,
        email: &str,
        token: &str,
        otp_type: OtpType,
    ) -> IdentityResult<Session> {
        debug!(email = %email, otp_type = %otp_type, "Verifying one-time code");

        let request = self
            .inner
            .http_client
            .post(self.auth_url("verify"))
            .json(&VerifyRequest {
                otp_type,
                email,
                token,
            });
        let session = self.token_grant(request, "verify_otp").await?;

        let event = match otp_type {
            OtpType::Signup => AuthEvent::SignedIn,
            OtpType::Recovery => AuthEvent::PasswordRecovery,
        };
        info!(user_id = %session.user.id, event = %event, "One-time code verified");
        self.store_session(event, Some(session.clone()));
        Ok(session)
    }

    async fn resend(&self, otp_type: OtpType, email: &str) -> IdentityResult<()> {
        debug!(email = %email, otp_type = %otp_type, "Resending one-time code");

        let request = self
            .inner
            .http_client
            .post(self.auth_url("resend"))
            .json(&ResendRequest { otp_type, email });
        self.send(request, "resend").await?;
        Ok(())
    }

    async fn reset_password_for_email(&self, email: &str) -> IdentityResult<()> {
        debug!(email = %email, "Requesting password reset code");

        let request = self
            .inner
            .http_client
            .post(self.auth_url("recover"))
            .json(&RecoverRequest { email });
        self.send(request, "reset_password_for_email").await?;
        Ok(())
    }

    async fn update_user_password(&self, password: &str) -> IdentityResult<User> {
        let access_token = self.access_token()?;

        let request = self
            .inner
            .http_client
            .put(self.auth_url("user"))
            .header("Authorization", format!("Bearer {}", access_token))
            .json(&PasswordUpdate { password });
        let response = self.send(request, "update_user_password").await?;
        let user: User = response.json().await?;

        info!(user_id = %user.id, "Password updated");

        let session = self.current_session().map(|mut session| {
            session.user = user.clone();
            session
        });
        self.store_session(AuthEvent::UserUpdated, session);
        Ok(user)
    }

    async fn sign_out(&self) -> IdentityResult<()> {
        if let Ok(access_token) = self.access_token() {
            let request = self
                .inner
                .http_client
                .post(self.auth_url("logout"))
                .header("Authorization", format!("Bearer {}", access_token));
            if let Err(e) = self.send(request, "sign_out").await {
                warn!(error = %e, "Server sign-out failed, clearing local session anyway");
            }
        }

        info!("Signed out");
        self.store_session(AuthEvent::SignedOut, None);
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{mount_sign_in, token_body};
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_client_creation_trims_trailing_slash() {
        let client = SupabaseAuthClient::new("https://test.supabase.co/", "anon");
        assert_eq!(client.inner.api_url, "https://test.supabase.co");
        assert_eq!(client.inner.anon_key, "anon");
    }

    #[test]
    fn test_auth_url() {
        let client = SupabaseAuthClient::new("https://test.supabase.co", "anon");
        assert_eq!(
            client.auth_url("token?grant_type=password"),
            "https://test.supabase.co/auth/v1/token?grant_type=password"
        );
        assert_eq!(client.auth_url("verify"), "https://test.supabase.co/auth/v1/verify");
    }

    #[test]
    fn test_summarize_response_body_hides_content() {
        let summary = summarize_response_body(r#"{"msg":"secret detail"}"#);
        assert!(summary.starts_with("len=23,digest="));
        assert!(!summary.contains("secret"));
    }

    #[test]
    fn test_verify_request_serialization() {
        let request = VerifyRequest {
            otp_type: OtpType::Recovery,
            email: "vata@example.com",
            token: "123456",
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({ "type": "recovery", "email": "vata@example.com", "token": "123456" })
        );
    }

    #[test]
    fn test_sign_up_body_with_session() {
        let body = token_body("new@example.com", "access-1");
        let outcome = parse_sign_up_body(body, Utc::now()).unwrap();
        assert!(outcome.session.is_some());
        assert_eq!(outcome.user.email.as_deref(), Some("new@example.com"));
    }

    #[test]
    fn test_sign_up_body_user_only() {
        let body = json!({ "id": "user-2", "email": "new@example.com", "confirmation_sent_at": "now" });
        let outcome = parse_sign_up_body(body, Utc::now()).unwrap();
        assert!(outcome.session.is_none());
        assert_eq!(outcome.user.id, "user-2");

        let wrapped = json!({ "user": { "id": "user-3" }, "session": null });
        let outcome = parse_sign_up_body(wrapped, Utc::now()).unwrap();
        assert!(outcome.session.is_none());
        assert_eq!(outcome.user.id, "user-3");
    }

    #[tokio::test]
    async fn test_no_session_at_start() {
        let client = SupabaseAuthClient::new("https://test.supabase.co", "anon");
        assert!(client.get_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_scoped_calls_require_session() {
        let client = SupabaseAuthClient::new("https://test.supabase.co", "anon");

        assert!(matches!(
            client.update_user_password("new-password").await,
            Err(IdentityError::NotLoggedIn)
        ));
        assert!(matches!(
            client.refresh_session().await,
            Err(IdentityError::NotLoggedIn)
        ));
    }

    #[tokio::test]
    async fn test_sign_out_without_session_still_publishes() {
        let client = SupabaseAuthClient::new("https://test.supabase.co", "anon");
        let mut sub = client.subscribe();

        client.sign_out().await.unwrap();

        let change = sub.try_next().unwrap();
        assert_eq!(change.event, AuthEvent::SignedOut);
        assert!(change.session.is_none());
    }

    #[tokio::test]
    async fn test_sign_in_stores_session_and_publishes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .and(header("apikey", "anon-key"))
            .and(body_json(json!({ "email": "vata@example.com", "password": "hunter22" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(token_body("vata@example.com", "access-1")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = SupabaseAuthClient::new(server.uri(), "anon-key");
        let mut sub = client.subscribe();

        let session = client
            .sign_in_with_password("vata@example.com", "hunter22")
            .await
            .unwrap();
        assert_eq!(session.email(), Some("vata@example.com"));
        assert_eq!(client.current_session(), Some(session.clone()));

        let change = sub.try_next().unwrap();
        assert_eq!(change.event, AuthEvent::SignedIn);
        assert_eq!(change.session, Some(session));
    }

    #[tokio::test]
    async fn test_unconfirmed_sign_in_maps_to_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": 400,
                "error_code": "email_not_confirmed",
                "msg": "Email not confirmed"
            })))
            .mount(&server)
            .await;

        let client = SupabaseAuthClient::new(server.uri(), "anon-key");
        let mut sub = client.subscribe();

        let err = client
            .sign_in_with_password("vata@example.com", "hunter22")
            .await
            .unwrap_err();
        assert!(err.is_email_not_confirmed());
        assert!(client.current_session().is_none());
        assert!(sub.try_next().is_none());
    }

    #[tokio::test]
    async fn test_rate_limited_reset_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/recover"))
            .and(body_json(json!({ "email": "pitta@example.com" })))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "code": 429,
                "error_code": "over_email_send_rate_limit",
                "msg": "email rate limit exceeded"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = SupabaseAuthClient::new(server.uri(), "anon-key");

        let err = client
            .reset_password_for_email("pitta@example.com")
            .await
            .unwrap_err();
        assert!(err.is_rate_limited());
        assert_eq!(err.status(), Some(429));
    }

    #[tokio::test]
    async fn test_recovery_verification_publishes_password_recovery() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/verify"))
            .and(body_json(
                json!({ "type": "recovery", "email": "kapha@example.com", "token": "654321" }),
            ))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(token_body("kapha@example.com", "access-1")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = SupabaseAuthClient::new(server.uri(), "anon-key");
        let mut sub = client.subscribe();

        client
            .verify_otp("kapha@example.com", "654321", OtpType::Recovery)
            .await
            .unwrap();

        assert_eq!(sub.try_next().unwrap().event, AuthEvent::PasswordRecovery);
    }

    #[tokio::test]
    async fn test_update_password_uses_bearer_and_publishes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/verify"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(token_body("kapha@example.com", "access-1")),
            )
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/auth/v1/user"))
            .and(header("authorization", "Bearer access-1"))
            .and(body_json(json!({ "password": "new-password" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "id": "user-1", "email": "kapha@example.com" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = SupabaseAuthClient::new(server.uri(), "anon-key");
        client
            .verify_otp("kapha@example.com", "654321", OtpType::Recovery)
            .await
            .unwrap();
        let mut sub = client.subscribe();

        client.update_user_password("new-password").await.unwrap();

        let change = sub.try_next().unwrap();
        assert_eq!(change.event, AuthEvent::UserUpdated);
        assert!(change.session.is_some());
    }

    #[tokio::test]
    async fn test_sign_out_clears_session_even_when_server_fails() {
        let server = MockServer::start().await;
        mount_sign_in(&server, "vata@example.com").await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/logout"))
            .and(header("authorization", "Bearer access-1"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "msg": "boom" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = SupabaseAuthClient::new(server.uri(), "anon-key");
        client
            .sign_in_with_password("vata@example.com", "hunter22")
            .await
            .unwrap();
        let mut sub = client.subscribe();

        client.sign_out().await.unwrap();

        assert!(client.current_session().is_none());
        assert_eq!(sub.try_next().unwrap().event, AuthEvent::SignedOut);
    }
}
