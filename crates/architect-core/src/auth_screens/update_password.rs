use super::{check_required, AuthForm, AuthRequest, ScreenOutcome, ScreenStatus};
use crate::forms::TextInput;
use crate::messages;
use identity_client::IdentityResult;

/// "Set a New Password", shown after a recovery code was accepted.
#[derive(Debug, Clone)]
pub struct UpdatePasswordScreen {
    password: TextInput,
    confirm_password: TextInput,
    status: ScreenStatus,
}

impl Default for UpdatePasswordScreen {
    fn default() -> Self {
        Self {
            password: TextInput::secret("New Password", "Minimum 6 characters"),
            confirm_password: TextInput::secret("Confirm New Password", "••••••••"),
            status: ScreenStatus::default(),
        }
    }
}

impl UpdatePasswordScreen {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn begin_submit(&mut self) -> Option<AuthRequest> {
        if self.status.busy {
            return None;
        }
        if !check_required(&[&self.password, &self.confirm_password], &mut self.status) {
            return None;
        }
        if self.password.value() != self.confirm_password.value() {
            self.status.clear_messages();
            self.status.fail(messages::PASSWORDS_DO_NOT_MATCH);
            return None;
        }
        if self.password.value().chars().count() < messages::MIN_PASSWORD_LEN {
            self.status.clear_messages();
            self.status.fail(messages::PASSWORD_TOO_SHORT);
            return None;
        }

        self.status.begin();
        Some(AuthRequest::UpdatePassword {
            password: self.password.value().to_string(),
        })
    }

    pub fn complete(&mut self, result: IdentityResult<()>) -> ScreenOutcome {
        if !self.status.busy {
            return ScreenOutcome::Stay;
        }
        self.status.busy = false;

        match result {
            Ok(()) => {
                self.password.clear();
                self.confirm_password.clear();
                self.status.info = Some(messages::PASSWORD_UPDATED.to_string());
                ScreenOutcome::PasswordUpdated
            }
            Err(e) => {
                self.status
                    .fail(messages::provider_message_or(&e, messages::GENERIC_FAILURE));
                ScreenOutcome::Stay
            }
        }
    }
}

impl AuthForm for UpdatePasswordScreen {
    fn inputs(&self) -> Vec<&TextInput> {
        vec![&self.password, &self.confirm_password]
    }

    fn input_mut(&mut self, index: usize) -> Option<&mut TextInput> {
        match index {
            0 => Some(&mut self.password),
            1 => Some(&mut self.confirm_password),
            _ => None,
        }
    }

    fn status(&self) -> &ScreenStatus {
        &self.status
    }

    fn submit_label(&self) -> &'static str {
        if self.status.busy {
            "Updating..."
        } else {
            "Update Password"
        }
    }
}
