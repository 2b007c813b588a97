//! The page flow owned by the root composer.

use crate::error::{FlowError, FlowResult};
use crate::page_fsm::{AuthPage, PageMachine, PageMachineInput};
use std::fmt;
use tracing::{debug, warn};

/// Selected authentication page plus the email waiting for OTP confirmation.
///
/// The pending email is only ever present on the OTP verification page: it
/// is set by [`AuthPageFlow::require_verification`] and cleared by every
/// other transition.
pub struct AuthPageFlow {
    machine: PageMachine,
    pending_email: Option<String>,
}

impl fmt::Debug for AuthPageFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthPageFlow")
            .field("page", &self.page())
            .field("pending_email", &self.pending_email)
            .finish()
    }
}

impl Default for AuthPageFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthPageFlow {
    /// Start on the login page.
    pub fn new() -> Self {
        Self {
            machine: PageMachine::new(),
            pending_email: None,
        }
    }

    /// The visible page.
    pub fn page(&self) -> AuthPage {
        AuthPage::from(self.machine.state())
    }

    /// Email address the OTP verification page should confirm.
    pub fn pending_email(&self) -> Option<&str> {
        self.pending_email.as_deref()
    }

    /// User asked for the login page.
    pub fn show_login(&mut self) -> FlowResult<AuthPage> {
        self.transition(PageMachineInput::RequestLogin, None)
    }

    /// User asked for the sign-up page.
    pub fn show_signup(&mut self) -> FlowResult<AuthPage> {
        self.transition(PageMachineInput::RequestSignup, None)
    }

    /// User asked to reset a forgotten password.
    pub fn show_forgot_password(&mut self) -> FlowResult<AuthPage> {
        self.transition(PageMachineInput::RequestPasswordReset, None)
    }

    /// A sign-up succeeded or a sign-in reported an unconfirmed email.
    pub fn require_verification(&mut self, email: impl Into<String>) -> FlowResult<AuthPage> {
        let email = email.into();
        if email.trim().is_empty() {
            return Err(FlowError::MissingEmail);
        }
        self.transition(PageMachineInput::VerificationRequired, Some(email))
    }

    /// The identity provider reported a password recovery in progress.
    ///
    /// Accepted from every page.
    pub fn password_recovery(&mut self) -> FlowResult<AuthPage> {
        self.transition(PageMachineInput::PasswordRecovery, None)
    }

    /// The new password was saved and the confirmation delay has elapsed.
    pub fn password_updated(&mut self) -> FlowResult<AuthPage> {
        self.transition(PageMachineInput::PasswordUpdated, None)
    }

    /// Return to the login page unconditionally (used on sign-out).
    pub fn reset(&mut self) {
        let old_page = self.page();
        self.machine = PageMachine::new();
        self.pending_email = None;
        debug!(old_page = %old_page, new_page = %self.page(), "Auth page flow reset");
    }

    fn transition(
        &mut self,
        input: PageMachineInput,
        pending_email: Option<String>,
    ) -> FlowResult<AuthPage> {
        let old_page = self.page();

        if self.machine.consume(&input).is_err() {
            warn!(page = %old_page, input = ?input, "Rejected auth page transition");
            return Err(FlowError::InvalidTransition {
                page: old_page.to_string(),
                input: format!("{:?}", input),
            });
        }

        self.pending_email = pending_email;
        let new_page = self.page();

        if old_page != new_page {
            debug!(old_page = %old_page, new_page = %new_page, "Auth page transition");
        }

        Ok(new_page)
    }
}
