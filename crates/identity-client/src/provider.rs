//! The identity provider interface consumed by the UI layer.

use crate::error::IdentityResult;
use crate::events::AuthSubscription;
use crate::session::{Session, User};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Purpose of a one-time code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OtpType {
    /// Confirms the address of a new account.
    Signup,
    /// Authorizes a password reset.
    Recovery,
}

impl OtpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpType::Signup => "signup",
            OtpType::Recovery => "recovery",
        }
    }
}

impl fmt::Display for OtpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a sign-up.
///
/// `session` is only present when the project does not require email
/// confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpOutcome {
    pub user: User,
    pub session: Option<Session>,
}

/// Operations the application needs from an identity provider.
///
/// Implementations publish auth-state changes to subscribers obtained from
/// [`IdentityProvider::subscribe`]; callers learn about new sessions from
/// those changes rather than from return values.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The session currently held, if any.
    async fn get_session(&self) -> IdentityResult<Option<Session>>;

    /// Register for auth-state changes.
    fn subscribe(&self) -> AuthSubscription;

    /// Email/password sign-in. Publishes `SIGNED_IN` on success.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> IdentityResult<Session>;

    /// Create an account. A confirmation code is emailed when required.
    async fn sign_up(&self, email: &str, password: &str) -> IdentityResult<SignUpOutcome>;

    /// Confirm a one-time code. Publishes `SIGNED_IN` for sign-up codes and
    /// `PASSWORD_RECOVERY` for recovery codes.
    async fn verify_otp(
        &self,
        email: &str,
        token: &str,
        otp_type: OtpType,
    ) -> IdentityResult<Session>;

    /// Send a fresh code for the given purpose.
    async fn resend(&self, otp_type: OtpType, email: &str) -> IdentityResult<()>;

    /// Email a password-reset code.
    async fn reset_password_for_email(&self, email: &str) -> IdentityResult<()>;

    /// Change the current user's password. Publishes `USER_UPDATED`.
    async fn update_user_password(&self, password: &str) -> IdentityResult<User>;

    /// End the session. Publishes `SIGNED_OUT`.
    async fn sign_out(&self) -> IdentityResult<()>;
}
