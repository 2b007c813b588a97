use super::{check_required, AuthForm, AuthRequest, ScreenOutcome, ScreenStatus};
use crate::forms::TextInput;
use crate::messages;
use identity_client::IdentityResult;

/// "Verify Your Email": confirm the sign-up code sent to the pending email.
///
/// Verification and resending have separate busy flags; verification is
/// refused while either is set.
#[derive(Debug, Clone)]
pub struct OtpVerificationScreen {
    code: TextInput,
    status: ScreenStatus,
    resending: bool,
    email: Option<String>,
}

impl Default for OtpVerificationScreen {
    fn default() -> Self {
        Self {
            code: TextInput::new("Verification Code", "6-digit code"),
            status: ScreenStatus::default(),
            resending: false,
            email: None,
        }
    }
}

impl OtpVerificationScreen {
    /// Fresh form for `email`.
    pub fn reset_for(&mut self, email: Option<&str>) {
        *self = Self {
            email: email.map(str::to_string),
            ..Self::default()
        };
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn is_resending(&self) -> bool {
        self.resending
    }

    fn pending_email(&mut self) -> Option<String> {
        match &self.email {
            Some(email) => Some(email.clone()),
            None => {
                self.status.clear_messages();
                self.status.fail(messages::MISSING_PENDING_EMAIL);
                None
            }
        }
    }

    pub fn begin_submit(&mut self) -> Option<AuthRequest> {
        if self.status.busy || self.resending {
            return None;
        }
        if !check_required(&[&self.code], &mut self.status) {
            return None;
        }
        let email = self.pending_email()?;
        self.status.begin();
        Some(AuthRequest::VerifySignup {
            email,
            token: self.code.value().trim().to_string(),
        })
    }

    pub fn begin_resend(&mut self) -> Option<AuthRequest> {
        if self.status.busy || self.resending {
            return None;
        }
        let email = self.pending_email()?;
        self.status.clear_messages();
        self.resending = true;
        Some(AuthRequest::ResendSignup { email })
    }

    /// Answer to the verification. Success arrives as a sign-in event.
    pub fn complete_verification(&mut self, result: IdentityResult<()>) -> ScreenOutcome {
        if !self.status.busy {
            return ScreenOutcome::Stay;
        }
        self.status.busy = false;
        if let Err(e) = result {
            self.status
                .fail(messages::provider_message_or(&e, messages::GENERIC_FAILURE));
        }
        ScreenOutcome::Stay
    }

    pub fn complete_resend(&mut self, result: IdentityResult<()>) -> ScreenOutcome {
        if !self.resending {
            return ScreenOutcome::Stay;
        }
        self.resending = false;

        let message = match result {
            Ok(()) => messages::RESEND_SENT.to_string(),
            Err(e) => {
                messages::failure_message(&e, messages::RESEND_RATE_LIMITED, messages::RESEND_FAILED)
            }
        };
        self.status.info = Some(message);
        ScreenOutcome::Stay
    }
}

impl AuthForm for OtpVerificationScreen {
    fn inputs(&self) -> Vec<&TextInput> {
        vec![&self.code]
    }

    fn input_mut(&mut self, index: usize) -> Option<&mut TextInput> {
        (index == 0).then_some(&mut self.code)
    }

    fn status(&self) -> &ScreenStatus {
        &self.status
    }

    fn submit_label(&self) -> &'static str {
        if self.status.busy {
            "Verifying..."
        } else {
            "Verify Email"
        }
    }

    fn prompt(&self) -> Option<String> {
        let email = self.email.as_deref().unwrap_or("your email");
        Some(format!(
            "A 6-digit verification code has been sent to {}. Please enter it below.",
            email
        ))
    }

    fn is_locked(&self) -> bool {
        self.status.busy || self.resending
    }
}
