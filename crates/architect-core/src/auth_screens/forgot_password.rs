use super::{check_required, AuthForm, AuthRequest, ScreenOutcome, ScreenStatus};
use crate::forms::TextInput;
use crate::messages;
use identity_client::IdentityResult;

/// The two halves of the reset page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetStage {
    Email,
    Otp,
}

/// "Reset Your Password": request a code, then verify it.
#[derive(Debug, Clone)]
pub struct ForgotPasswordScreen {
    stage: ResetStage,
    email: TextInput,
    code: TextInput,
    status: ScreenStatus,
    submitted_email: Option<String>,
}

impl Default for ForgotPasswordScreen {
    fn default() -> Self {
        Self {
            stage: ResetStage::Email,
            email: TextInput::new("Email Address", "you@example.com"),
            code: TextInput::new("Verification Code", "6-digit code"),
            status: ScreenStatus::default(),
            submitted_email: None,
        }
    }
}

impl ForgotPasswordScreen {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn stage(&self) -> ResetStage {
        self.stage
    }

    pub fn begin_submit(&mut self) -> Option<AuthRequest> {
        if self.status.busy {
            return None;
        }

        match self.stage {
            ResetStage::Email => {
                if !check_required(&[&self.email], &mut self.status) {
                    return None;
                }
                let email = self.email.value().trim().to_string();
                self.status.begin();
                self.submitted_email = Some(email.clone());
                Some(AuthRequest::RequestReset { email })
            }
            ResetStage::Otp => {
                if !check_required(&[&self.code], &mut self.status) {
                    return None;
                }
                let email = self
                    .submitted_email
                    .clone()
                    .unwrap_or_else(|| self.email.value().trim().to_string());
                self.status.error = None;
                self.status.busy = true;
                Some(AuthRequest::VerifyRecovery {
                    email,
                    token: self.code.value().trim().to_string(),
                })
            }
        }
    }

    /// Answer to the reset-code request.
    pub fn complete_reset_request(&mut self, result: IdentityResult<()>) -> ScreenOutcome {
        if !self.status.busy || self.stage != ResetStage::Email {
            return ScreenOutcome::Stay;
        }
        self.status.busy = false;

        match result {
            Ok(()) => {
                self.status.info = Some(messages::RESET_CODE_SENT.to_string());
                self.stage = ResetStage::Otp;
            }
            Err(e) => {
                self.submitted_email = None;
                self.status.fail(messages::failure_message(
                    &e,
                    messages::RESET_RATE_LIMITED,
                    messages::RESET_FAILED,
                ));
            }
        }
        ScreenOutcome::Stay
    }

    /// Answer to the recovery-code verification. Success is signalled by the
    /// provider's password-recovery event, not here.
    pub fn complete_verification(&mut self, result: IdentityResult<()>) -> ScreenOutcome {
        if !self.status.busy || self.stage != ResetStage::Otp {
            return ScreenOutcome::Stay;
        }
        self.status.busy = false;

        if let Err(e) = result {
            self.status
                .fail(messages::provider_message_or(&e, messages::GENERIC_FAILURE));
        }
        ScreenOutcome::Stay
    }
}

impl AuthForm for ForgotPasswordScreen {
    fn inputs(&self) -> Vec<&TextInput> {
        match self.stage {
            ResetStage::Email => vec![&self.email],
            ResetStage::Otp => vec![&self.code],
        }
    }

    fn input_mut(&mut self, index: usize) -> Option<&mut TextInput> {
        match (self.stage, index) {
            (ResetStage::Email, 0) => Some(&mut self.email),
            (ResetStage::Otp, 0) => Some(&mut self.code),
            _ => None,
        }
    }

    fn status(&self) -> &ScreenStatus {
        &self.status
    }

    fn submit_label(&self) -> &'static str {
        match (self.status.busy, self.stage) {
            (true, _) => "Sending...",
            (false, ResetStage::Email) => "Send Code",
            (false, ResetStage::Otp) => "Verify Code",
        }
    }

    fn prompt(&self) -> Option<String> {
        match self.stage {
            ResetStage::Email => Some(
                "Enter your email address and we will send you a 6-digit code to reset your password."
                    .to_string(),
            ),
            ResetStage::Otp => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use identity_client::IdentityError;

    fn requested() -> ForgotPasswordScreen {
        let mut screen = ForgotPasswordScreen::default();
        screen.input_mut(0).unwrap().set_value("kapha@example.com");
        assert_eq!(
            screen.begin_submit(),
            Some(AuthRequest::RequestReset {
                email: "kapha@example.com".to_string()
            })
        );
        screen
    }

    #[test]
    fn test_code_sent_moves_to_otp_stage() {
        let mut screen = requested();
        screen.complete_reset_request(Ok(()));
        assert_eq!(screen.stage(), ResetStage::Otp);
        assert_eq!(screen.status().info.as_deref(), Some(messages::RESET_CODE_SENT));
        assert_eq!(screen.inputs()[0].label, "Verification Code");
        assert_eq!(screen.submit_label(), "Verify Code");
    }

    #[test]
    fn test_rate_limited_reset() {
        let mut screen = requested();
        screen.complete_reset_request(Err(IdentityError::from_response(429, "")));
        assert_eq!(screen.stage(), ResetStage::Email);
        assert_eq!(
            screen.status().error.as_deref(),
            Some(messages::RESET_RATE_LIMITED)
        );
    }

    #[test]
    fn test_server_failure_without_message_uses_fallback() {
        let mut screen = requested();
        screen.complete_reset_request(Err(IdentityError::from_response(500, "")));
        assert_eq!(screen.status().error.as_deref(), Some(messages::RESET_FAILED));
    }

    #[test]
    fn test_verify_uses_requested_email() {
        let mut screen = requested();
        screen.complete_reset_request(Ok(()));
        screen.input_mut(0).unwrap().set_value("654321");

        assert_eq!(
            screen.begin_submit(),
            Some(AuthRequest::VerifyRecovery {
                email: "kapha@example.com".to_string(),
                token: "654321".to_string()
            })
        );
        // The "code sent" line stays up while verifying.
        assert!(screen.status().info.is_some());

        let err = IdentityError::from_response(403, r#"{"msg":"Token has expired or is invalid"}"#);
        screen.complete_verification(Err(err));
        assert_eq!(
            screen.status().error.as_deref(),
            Some("Token has expired or is invalid")
        );
    }
}
