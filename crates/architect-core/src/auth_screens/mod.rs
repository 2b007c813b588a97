//! Controllers for the five authentication screens.
//!
//! Each screen owns its inputs plus a [`ScreenStatus`]. Submitting produces
//! an [`AuthRequest`] (or a local validation error) and marks the screen busy;
//! the matching `complete_*` call clears the flag and maps the provider's
//! answer to inline text or a [`ScreenOutcome`]. Completions that arrive
//! while the screen is not busy are ignored.

mod forgot_password;
mod login;
mod otp_verification;
mod request;
mod signup;
mod update_password;

pub use forgot_password::{ForgotPasswordScreen, ResetStage};
pub use login::LoginScreen;
pub use otp_verification::OtpVerificationScreen;
pub use request::{AuthAction, AuthRequest, AuthResponse};
pub use signup::SignupScreen;
pub use update_password::UpdatePasswordScreen;

use crate::forms::TextInput;
use crate::messages;

/// Busy flag plus the inline error and info lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenStatus {
    pub busy: bool,
    pub error: Option<String>,
    pub info: Option<String>,
}

impl ScreenStatus {
    fn clear_messages(&mut self) {
        self.error = None;
        self.info = None;
    }

    fn begin(&mut self) {
        self.clear_messages();
        self.busy = true;
    }

    fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }
}

/// What the composer should do after a screen handled a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenOutcome {
    Stay,
    VerificationRequired(String),
    PasswordUpdated,
}

/// Uniform view of a screen for the front end.
pub trait AuthForm {
    /// Inputs in focus order.
    fn inputs(&self) -> Vec<&TextInput>;

    fn input_mut(&mut self, index: usize) -> Option<&mut TextInput>;

    fn status(&self) -> &ScreenStatus;

    /// Label of the submit action in its current state.
    fn submit_label(&self) -> &'static str;

    /// Extra explanatory line above the inputs, if any.
    fn prompt(&self) -> Option<String> {
        None
    }

    fn is_locked(&self) -> bool {
        self.status().busy
    }
}

/// Put the required-field message on the first blank input.
fn check_required(inputs: &[&TextInput], status: &mut ScreenStatus) -> bool {
    match inputs.iter().find(|input| input.is_blank()) {
        Some(input) => {
            status.clear_messages();
            status.fail(format!("{}: {}", input.label, messages::REQUIRED_FIELD));
            false
        }
        None => true,
    }
}
