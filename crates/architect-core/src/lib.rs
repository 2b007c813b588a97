//! Application core for Diet Architect.
//!
//! Everything here is synchronous state plus request values: the front end
//! asks the [`RootComposer`] for an [`AuthRequest`] or [`GenerationRequest`],
//! runs it wherever it likes, and hands the result back. The composer is the
//! only owner of session, page and form state.

mod auth_screens;
mod composer;
mod forms;
pub mod messages;
mod output;
mod patient_form;
mod screen;

pub use auth_screens::{
    AuthAction, AuthForm, AuthRequest, AuthResponse, ForgotPasswordScreen, LoginScreen,
    OtpVerificationScreen, ResetStage, ScreenOutcome, ScreenStatus, SignupScreen,
    UpdatePasswordScreen,
};
pub use composer::{GenerationRequest, RootComposer};
pub use forms::TextInput;
pub use output::{OutputView, PlanOutput, FAILURE_HTML, PLACEHOLDER_HTML, VALIDATION_HTML};
pub use patient_form::{FieldKind, PatientField, PatientForm};
pub use screen::Screen;
