use super::{check_required, AuthForm, AuthRequest, ScreenOutcome, ScreenStatus};
use crate::forms::TextInput;
use crate::messages;
use identity_client::IdentityResult;
use tracing::info;

/// "Welcome Back": email and password sign-in.
#[derive(Debug, Clone)]
pub struct LoginScreen {
    email: TextInput,
    password: TextInput,
    status: ScreenStatus,
    submitted_email: Option<String>,
}

impl Default for LoginScreen {
    fn default() -> Self {
        Self {
            email: TextInput::new("Email Address", "you@example.com"),
            password: TextInput::secret("Password", "••••••••"),
            status: ScreenStatus::default(),
            submitted_email: None,
        }
    }
}

impl LoginScreen {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn begin_submit(&mut self) -> Option<AuthRequest> {
        if self.status.busy {
            return None;
        }
        if !check_required(&[&self.email, &self.password], &mut self.status) {
            return None;
        }

        let email = self.email.value().trim().to_string();
        self.status.begin();
        self.submitted_email = Some(email.clone());
        Some(AuthRequest::SignIn {
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
            // The session arrives through the auth-change subscription.
            Ok(()) => ScreenOutcome::Stay,
            Err(e) if e.is_email_not_confirmed() => {
                info!(email = %email, "Sign-in needs email confirmation");
                ScreenOutcome::VerificationRequired(email)
            }
            Err(e) => {
                self.status.fail(messages::failure_message(
                    &e,
                    messages::LOGIN_RATE_LIMITED,
                    messages::GENERIC_FAILURE,
                ));
                ScreenOutcome::Stay
            }
        }
    }
}

impl AuthForm for LoginScreen {
    fn inputs(&self) -> Vec<&TextInput> {
        vec![&self.email, &self.password]
    }

    fn input_mut(&mut self, index: usize) -> Option<&mut TextInput> {
        match index {
            0 => Some(&mut self.email),
            1 => Some(&mut self.password),
            _ => None,
        }
    }

    fn status(&self) -> &ScreenStatus {
        &self.status
    }

    fn submit_label(&self) -> &'static str {
        if self.status.busy {
            "Logging in..."
        } else {
            "Login"
        }
    }
}
