use super::{check_required, AuthForm, AuthRequest, ScreenOutcome, ScreenStatus};
use crate::forms::TextInput;
use crate::messages;
use identity_client::IdentityResult;

/// "Create Your Account".
#[derive(Debug, Clone)]
pub struct SignupScreen {
    email: TextInput,
    password: TextInput,
    confirm_password: TextInput,
    status: ScreenStatus,
    submitted_email: Option<String>,
}

impl Default for SignupScreen {
    fn default() -> Self {
        Self {
            email: TextInput::new("Email Address", "you@example.com"),
            password: TextInput::secret("Password", "Minimum 6 characters"),
            confirm_password: TextInput::secret("Confirm Password", "••••••••"),
            status: ScreenStatus::default(),
            submitted_email: None,
        }
    }
}

impl SignupScreen {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn begin_submit(&mut self) -> Option<AuthRequest> {
        if self.status.busy {
            return None;
        }
        if !check_required(
            &[&self.email, &self.password, &self.confirm_password],
            &mut self.status,
        ) {
            return None;
        }
        if self.password.value() != self.confirm_password.value() {
            self.status.clear_messages();
            self.status.fail(messages::PASSWORDS_DO_NOT_MATCH);
            return None;
        }

        let email = self.email.value().trim().to_string();
        self.status.begin();
        self.submitted_email = Some(email.clone());
        Some(AuthRequest::SignUp {
            email,
            password: self.password.value().to_string(),
        })
    }

    pub fn complete(&mut self, result: IdentityResult<()>) -> ScreenOutcome {
        if !self.status.busy {
            return ScreenOutcome::Stay;
        }
        self.status.busy = false;
        let email = self.submitted_email.take().unwrap_or_default();

        match result {
            Ok(()) => ScreenOutcome::VerificationRequired(email),
            Err(e) => {
                self.status.fail(messages::failure_message(
                    &e,
                    messages::SIGNUP_RATE_LIMITED,
                    messages::GENERIC_FAILURE,
                ));
                ScreenOutcome::Stay
            }
        }
    }
}

impl AuthForm for SignupScreen {
    fn inputs(&self) -> Vec<&TextInput> {
        vec![&self.email, &self.password, &self.confirm_password]
    }

    fn input_mut(&mut self, index: usize) -> Option<&mut TextInput> {
        match index {
            0 => Some(&mut self.email),
            1 => Some(&mut self.password),
            2 => Some(&mut self.confirm_password),
            _ => None,
        }
    }

    fn status(&self) -> &ScreenStatus {
        &self.status
    }

    fn submit_label(&self) -> &'static str {
        if self.status.busy {
            "Creating Account..."
        } else {
            "Create Account"
        }
    }
}
