//! Authentication page state machine using rust-fsm.
//!
//! ## State Diagram
//!
//! ```text
//!            RequestLogin / RequestSignup / RequestPasswordReset /
//!            VerificationRequired (any of the four, from any of the four)
//!   ┌──────────┬───────────────┬──────────────────┬────────────────────┐
//!   │  Login   │    Signup     │  ForgotPassword  │  OtpVerification   │
//!   └────┬─────┴───────┬───────┴────────┬─────────┴──────────┬─────────┘
//!        │             │                │                    │
//!        └─────────────┴── PasswordRecovery ─────────────────┘
//!                              │
//!                              ▼
//!                    ┌───────────────────┐
//!                    │  UpdatePassword   │ ── PasswordUpdated / RequestLogin ──► Login
//!                    └───────────────────┘
//! ```
//!
//! `PasswordRecovery` is accepted in every state so an identity-provider
//! recovery signal always wins over whatever page the user requested last.
//! There is no terminal state: signing in leaves the flow entirely.

use rust_fsm::*;
use serde::{Deserialize, Serialize};
use std::fmt;

state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub page_machine(Login)

    Login => {
        RequestLogin => Login,
        RequestSignup => Signup,
        RequestPasswordReset => ForgotPassword,
        VerificationRequired => OtpVerification,
        PasswordRecovery => UpdatePassword
    },
    Signup => {
        RequestLogin => Login,
        RequestSignup => Signup,
        RequestPasswordReset => ForgotPassword,
        VerificationRequired => OtpVerification,
        PasswordRecovery => UpdatePassword
    },
    ForgotPassword => {
        RequestLogin => Login,
        RequestSignup => Signup,
        RequestPasswordReset => ForgotPassword,
        VerificationRequired => OtpVerification,
        PasswordRecovery => UpdatePassword
    },
    OtpVerification => {
        RequestLogin => Login,
        RequestSignup => Signup,
        RequestPasswordReset => ForgotPassword,
        VerificationRequired => OtpVerification,
        PasswordRecovery => UpdatePassword
    },
    UpdatePassword => {
        RequestLogin => Login,
        PasswordRecovery => UpdatePassword,
        PasswordUpdated => Login
    }
}

pub use page_machine::Input as PageMachineInput;
pub use page_machine::State as PageMachineState;
pub use page_machine::StateMachine as PageMachine;

/// The authentication screen currently selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthPage {
    Login,
    Signup,
    ForgotPassword,
    UpdatePassword,
    OtpVerification,
}

impl AuthPage {
    /// Every page, in display order.
    pub const ALL: [AuthPage; 5] = [
        AuthPage::Login,
        AuthPage::Signup,
        AuthPage::ForgotPassword,
        AuthPage::UpdatePassword,
        AuthPage::OtpVerification,
    ];

    /// Stable identifier, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthPage::Login => "login",
            AuthPage::Signup => "signup",
            AuthPage::ForgotPassword => "forgot-password",
            AuthPage::UpdatePassword => "update-password",
            AuthPage::OtpVerification => "otp-verification",
        }
    }

    /// Heading shown above the page's form.
    pub fn title(&self) -> &'static str {
        match self {
            AuthPage::Login => "Welcome Back",
            AuthPage::Signup => "Create Your Account",
            AuthPage::ForgotPassword => "Reset Your Password",
            AuthPage::UpdatePassword => "Set a New Password",
            AuthPage::OtpVerification => "Verify Your Email",
        }
    }

    /// Pages the user can open directly through links.
    pub fn is_user_navigable(&self) -> bool {
        !matches!(self, AuthPage::UpdatePassword)
    }
}

impl fmt::Display for AuthPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&PageMachineState> for AuthPage {
    fn from(state: &PageMachineState) -> Self {
        match state {
            PageMachineState::Login => AuthPage::Login,
            PageMachineState::Signup => AuthPage::Signup,
            PageMachineState::ForgotPassword => AuthPage::ForgotPassword,
            PageMachineState::UpdatePassword => AuthPage::UpdatePassword,
            PageMachineState::OtpVerification => AuthPage::OtpVerification,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAVIGATION: [PageMachineInput; 4] = [
        PageMachineInput::RequestLogin,
        PageMachineInput::RequestSignup,
        PageMachineInput::RequestPasswordReset,
        PageMachineInput::VerificationRequired,
    ];

    fn expected_target(input: &PageMachineInput) -> PageMachineState {
        match input {
            PageMachineInput::RequestLogin => PageMachineState::Login,
            PageMachineInput::RequestSignup => PageMachineState::Signup,
            PageMachineInput::RequestPasswordReset => PageMachineState::ForgotPassword,
            PageMachineInput::VerificationRequired => PageMachineState::OtpVerification,
            PageMachineInput::PasswordRecovery => PageMachineState::UpdatePassword,
            PageMachineInput::PasswordUpdated => PageMachineState::Login,
        }
    }

    fn machine_at(input: &PageMachineInput) -> PageMachine {
        let mut machine = PageMachine::new();
        machine.consume(input).unwrap();
        machine
    }

    #[test]
    fn test_initial_state_is_login() {
        let machine = PageMachine::new();
        assert_eq!(*machine.state(), PageMachineState::Login);
    }

    #[test]
    fn test_every_navigable_page_reaches_every_other() {
        for from in &NAVIGATION {
            for to in &NAVIGATION {
                let mut machine = machine_at(from);
                machine.consume(to).unwrap();
                assert_eq!(*machine.state(), expected_target(to), "{:?} -> {:?}", from, to);
            }
        }
    }

    #[test]
    fn test_password_recovery_accepted_everywhere() {
        for from in &NAVIGATION {
            let mut machine = machine_at(from);
            machine.consume(&PageMachineInput::PasswordRecovery).unwrap();
            assert_eq!(*machine.state(), PageMachineState::UpdatePassword);

            // Repeated recovery signals keep the page.
            machine.consume(&PageMachineInput::PasswordRecovery).unwrap();
            assert_eq!(*machine.state(), PageMachineState::UpdatePassword);
        }
    }

    #[test]
    fn test_password_updated_returns_to_login() {
        let mut machine = machine_at(&PageMachineInput::PasswordRecovery);

        machine.consume(&PageMachineInput::PasswordUpdated).unwrap();
        assert_eq!(*machine.state(), PageMachineState::Login);
    }

    #[test]
    fn test_password_updated_rejected_outside_update_page() {
        for from in &NAVIGATION {
            let mut machine = machine_at(from);
            let before = machine.state().clone();

            assert!(machine.consume(&PageMachineInput::PasswordUpdated).is_err());
            assert_eq!(*machine.state(), before);
        }
    }

    #[test]
    fn test_update_page_only_links_back_to_login() {
        let mut machine = machine_at(&PageMachineInput::PasswordRecovery);

        assert!(machine.consume(&PageMachineInput::RequestSignup).is_err());
        assert!(machine.consume(&PageMachineInput::RequestPasswordReset).is_err());
        assert!(machine.consume(&PageMachineInput::VerificationRequired).is_err());
        assert_eq!(*machine.state(), PageMachineState::UpdatePassword);

        machine.consume(&PageMachineInput::RequestLogin).unwrap();
        assert_eq!(*machine.state(), PageMachineState::Login);
    }

    #[test]
    fn test_auth_page_from_state() {
        assert_eq!(AuthPage::from(&PageMachineState::Login), AuthPage::Login);
        assert_eq!(
            AuthPage::from(&PageMachineState::OtpVerification),
            AuthPage::OtpVerification
        );
        assert_eq!(
            AuthPage::from(&PageMachineState::UpdatePassword),
            AuthPage::UpdatePassword
        );
    }

    #[test]
    fn test_auth_page_serialization() {
        let json = serde_json::to_string(&AuthPage::ForgotPassword).unwrap();
        assert_eq!(json, "\"forgot-password\"");

        for page in AuthPage::ALL {
            let json = serde_json::to_string(&page).unwrap();
            assert_eq!(json, format!("\"{}\"", page.as_str()));
        }
    }

    #[test]
    fn test_titles() {
        assert_eq!(AuthPage::Login.title(), "Welcome Back");
        assert_eq!(AuthPage::Signup.title(), "Create Your Account");
        assert_eq!(AuthPage::ForgotPassword.title(), "Reset Your Password");
        assert_eq!(AuthPage::UpdatePassword.title(), "Set a New Password");
        assert_eq!(AuthPage::OtpVerification.title(), "Verify Your Email");
    }
}
