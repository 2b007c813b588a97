use identity_client::{IdentityProvider, IdentityResult, OtpType};
use std::fmt;
use tracing::debug;

/// Kind of identity call, used to route the answer back to its screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    SignIn,
    SignUp,
    RequestReset,
    VerifyRecovery,
    VerifySignup,
    ResendSignup,
    UpdatePassword,
    SignOut,
    ReleaseRecovery,
}

impl fmt::Display for AuthAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthAction::SignIn => "sign_in",
            AuthAction::SignUp => "sign_up",
            AuthAction::RequestReset => "request_reset",
            AuthAction::VerifyRecovery => "verify_recovery",
            AuthAction::VerifySignup => "verify_signup",
            AuthAction::ResendSignup => "resend_signup",
            AuthAction::UpdatePassword => "update_password",
            AuthAction::SignOut => "sign_out",
            AuthAction::ReleaseRecovery => "release_recovery",
        };
        f.write_str(name)
    }
}

/// One identity provider call, detached from the UI state that produced it.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthRequest {
    SignIn { email: String, password: String },
    SignUp { email: String, password: String },
    RequestReset { email: String },
    VerifyRecovery { email: String, token: String },
    VerifySignup { email: String, token: String },
    ResendSignup { email: String },
    UpdatePassword { password: String },
    SignOut,
    /// Drop the provider session left over from a password reset.
    ReleaseRecovery,
}

impl fmt::Debug for AuthRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Passwords and codes stay out of logs.
        let mut s = f.debug_struct("AuthRequest");
        s.field("action", &self.action());
        if let Some(email) = self.email() {
            s.field("email", &email);
        }
        s.finish()
    }
}

impl AuthRequest {
    pub fn action(&self) -> AuthAction {
        match self {
            AuthRequest::SignIn { .. } => AuthAction::SignIn,
            AuthRequest::SignUp { .. } => AuthAction::SignUp,
            AuthRequest::RequestReset { .. } => AuthAction::RequestReset,
            AuthRequest::VerifyRecovery { .. } => AuthAction::VerifyRecovery,
            AuthRequest::VerifySignup { .. } => AuthAction::VerifySignup,
            AuthRequest::ResendSignup { .. } => AuthAction::ResendSignup,
            AuthRequest::UpdatePassword { .. } => AuthAction::UpdatePassword,
            AuthRequest::SignOut => AuthAction::SignOut,
            AuthRequest::ReleaseRecovery => AuthAction::ReleaseRecovery,
        }
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            AuthRequest::SignIn { email, .. }
            | AuthRequest::SignUp { email, .. }
            | AuthRequest::RequestReset { email }
            | AuthRequest::VerifyRecovery { email, .. }
            | AuthRequest::VerifySignup { email, .. }
            | AuthRequest::ResendSignup { email } => Some(email.as_str()),
            AuthRequest::UpdatePassword { .. }
            | AuthRequest::SignOut
            | AuthRequest::ReleaseRecovery => None,
        }
    }

    /// Run the call against the provider.
    pub async fn execute(self, provider: &dyn IdentityProvider) -> AuthResponse {
        let action = self.action();
        debug!(action = %action, "Executing auth request");

        let result: IdentityResult<()> = match self {
            AuthRequest::SignIn { email, password } => provider
                .sign_in_with_password(&email, &password)
                .await
                .map(|_| ()),
            AuthRequest::SignUp { email, password } => {
                provider.sign_up(&email, &password).await.map(|_| ())
            }
            AuthRequest::RequestReset { email } => provider.reset_password_for_email(&email).await,
            AuthRequest::VerifyRecovery { email, token } => provider
                .verify_otp(&email, &token, OtpType::Recovery)
                .await
                .map(|_| ()),
            AuthRequest::VerifySignup { email, token } => provider
                .verify_otp(&email, &token, OtpType::Signup)
                .await
                .map(|_| ()),
            AuthRequest::ResendSignup { email } => provider.resend(OtpType::Signup, &email).await,
            AuthRequest::UpdatePassword { password } => {
                provider.update_user_password(&password).await.map(|_| ())
            }
            AuthRequest::SignOut | AuthRequest::ReleaseRecovery => provider.sign_out().await,
        };

        AuthResponse { action, result }
    }
}

/// Answer to an [`AuthRequest`].
#[derive(Debug)]
pub struct AuthResponse {
    pub action: AuthAction,
    pub result: IdentityResult<()>,
}
