//! Root composer: the single owner of application state.
//!
//! The front end drives it with three kinds of input:
//! - user intents (navigation, submit, typing), which may yield a request value
//! - finished requests, handed back through `apply_auth_response` and
//!   `complete_generation`
//! - auth-state changes, drained from the provider subscription
//!
//! Nothing here blocks; every outbound call is returned to the caller to run.

use crate::auth_screens::{
    AuthAction, AuthForm, AuthRequest, AuthResponse, ForgotPasswordScreen, LoginScreen,
    OtpVerificationScreen, ScreenOutcome, SignupScreen, UpdatePasswordScreen,
};
use crate::output::{PlanOutput, FAILURE_HTML, VALIDATION_HTML};
use crate::patient_form::PatientForm;
use crate::screen::Screen;
use auth_page_flow::{AuthPage, AuthPageFlow};
use diet_plan_generator::{DietPlanGenerator, GenerationResult, PatientData};
use identity_client::{AuthChange, AuthEvent, AuthSubscription, IdentityProvider, Session};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// A diet plan call, detached from the composer.
#[derive(Clone)]
pub struct GenerationRequest {
    generator: DietPlanGenerator,
    patient: PatientData,
}

impl GenerationRequest {
    pub fn patient(&self) -> &PatientData {
        &self.patient
    }

    pub async fn run(self) -> GenerationResult<String> {
        self.generator.generate_diet_plan(&self.patient).await
    }
}

pub struct RootComposer {
    provider: Arc<dyn IdentityProvider>,
    generator: DietPlanGenerator,
    subscription: Option<AuthSubscription>,

    is_loading_session: bool,
    session: Option<Session>,
    signing_out: bool,

    flow: AuthPageFlow,
    login: LoginScreen,
    signup: SignupScreen,
    forgot_password: ForgotPasswordScreen,
    otp_verification: OtpVerificationScreen,
    update_password: UpdatePasswordScreen,
    redirect_delay: Duration,
    redirect_at: Option<Instant>,
    /// The provider holds a recovery session the UI never adopted.
    recovery_held: bool,
    /// A release request is waiting to be handed to the front end.
    release_pending: bool,
    /// A release is in flight; its `SIGNED_OUT` must not reset the pages.
    releasing_recovery: bool,

    patient: PatientData,
    patient_form: PatientForm,
    output: PlanOutput,
}

impl RootComposer {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        generator: DietPlanGenerator,
        redirect_delay: Duration,
    ) -> Self {
        Self {
            provider,
            generator,
            subscription: None,
            is_loading_session: true,
            session: None,
            signing_out: false,
            flow: AuthPageFlow::new(),
            login: LoginScreen::default(),
            signup: SignupScreen::default(),
            forgot_password: ForgotPasswordScreen::default(),
            otp_verification: OtpVerificationScreen::default(),
            update_password: UpdatePasswordScreen::default(),
            redirect_delay,
            redirect_at: None,
            recovery_held: false,
            release_pending: false,
            releasing_recovery: false,
            patient: PatientData::default(),
            patient_form: PatientForm::default(),
            output: PlanOutput::default(),
        }
    }

    /// Subscribe to auth changes (once) and load the current session.
    pub async fn start(&mut self) {
        if self.subscription.is_none() {
            self.subscription = Some(self.provider.subscribe());
        }

        match self.provider.get_session().await {
            Ok(session) => {
                if let Some(session) = &session {
                    info!(user_id = %session.user.id, "Restored session");
                }
                self.session = session;
            }
            Err(e) => {
                warn!(error = %e, "Failed to load session, starting signed out");
                self.session = None;
            }
        }
        self.is_loading_session = false;
    }

    /// Release the auth subscription.
    pub fn shutdown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }

    pub fn provider(&self) -> Arc<dyn IdentityProvider> {
        self.provider.clone()
    }

    // --- Read-only state ---

    pub fn screen(&self) -> Screen {
        Screen::resolve(self.is_loading_session, self.session.as_ref(), self.flow.page())
    }

    pub fn is_loading_session(&self) -> bool {
        self.is_loading_session
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn page(&self) -> AuthPage {
        self.flow.page()
    }

    pub fn pending_email(&self) -> Option<&str> {
        self.flow.pending_email()
    }

    pub fn is_signing_out(&self) -> bool {
        self.signing_out
    }

    pub fn redirect_pending(&self) -> bool {
        self.redirect_at.is_some()
    }

    pub fn login(&self) -> &LoginScreen {
        &self.login
    }

    pub fn signup(&self) -> &SignupScreen {
        &self.signup
    }

    pub fn forgot_password(&self) -> &ForgotPasswordScreen {
        &self.forgot_password
    }

    pub fn otp_verification(&self) -> &OtpVerificationScreen {
        &self.otp_verification
    }

    pub fn update_password(&self) -> &UpdatePasswordScreen {
        &self.update_password
    }

    /// The controller behind the visible auth page.
    pub fn active_form(&self) -> &dyn AuthForm {
        match self.flow.page() {
            AuthPage::Login => &self.login,
            AuthPage::Signup => &self.signup,
            AuthPage::ForgotPassword => &self.forgot_password,
            AuthPage::OtpVerification => &self.otp_verification,
            AuthPage::UpdatePassword => &self.update_password,
        }
    }

    pub fn active_form_mut(&mut self) -> &mut dyn AuthForm {
        match self.flow.page() {
            AuthPage::Login => &mut self.login,
            AuthPage::Signup => &mut self.signup,
            AuthPage::ForgotPassword => &mut self.forgot_password,
            AuthPage::OtpVerification => &mut self.otp_verification,
            AuthPage::UpdatePassword => &mut self.update_password,
        }
    }

    pub fn patient(&self) -> &PatientData {
        &self.patient
    }

    pub fn patient_form(&self) -> &PatientForm {
        &self.patient_form
    }

    pub fn output(&self) -> &PlanOutput {
        &self.output
    }

    // --- Auth-state changes ---

    /// Apply every queued auth change. Returns how many were handled.
    pub fn drain_auth_changes(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let change = match self.subscription.as_mut() {
                Some(subscription) => subscription.try_next(),
                None => None,
            };
            let Some(change) = change else {
                break;
            };
            self.handle_auth_change(change);
            handled += 1;
        }
        handled
    }

    pub fn handle_auth_change(&mut self, change: AuthChange) {
        debug!(event = %change.event, has_session = change.session.is_some(), "Auth change");

        match change.event {
            AuthEvent::PasswordRecovery => {
                // The recovery session only authorizes the password update.
                if self.session.is_none() {
                    self.recovery_held = true;
                }
                if self.flow.password_recovery().is_ok() {
                    self.update_password.reset();
                    self.redirect_at = None;
                }
            }
            AuthEvent::SignedIn | AuthEvent::InitialSession => {
                self.session = change.session;
            }
            AuthEvent::TokenRefreshed | AuthEvent::UserUpdated => {
                if self.session.is_some() {
                    if let Some(session) = change.session {
                        self.session = Some(session);
                    }
                }
            }
            AuthEvent::SignedOut if self.releasing_recovery && self.session.is_none() => {
                debug!("Recovery session released");
                self.releasing_recovery = false;
            }
            AuthEvent::SignedOut => self.clear_session(),
        }
    }

    fn clear_session(&mut self) {
        self.session = None;
        self.redirect_at = None;
        self.recovery_held = false;
        self.release_pending = false;
        self.releasing_recovery = false;
        self.flow.reset();
        self.reset_auth_screens();
    }

    /// Queue a release of the recovery session once Update Password is left.
    fn leave_update_password(&mut self) {
        if self.recovery_held {
            self.recovery_held = false;
            self.release_pending = true;
        }
    }

    /// The sign-out that drops a recovery session nobody uses any more.
    /// Hand it to the provider like any other request.
    pub fn take_release_request(&mut self) -> Option<AuthRequest> {
        if !self.release_pending || self.session.is_some() {
            self.release_pending = false;
            return None;
        }
        self.release_pending = false;
        self.releasing_recovery = true;
        Some(AuthRequest::ReleaseRecovery)
    }

    fn reset_auth_screens(&mut self) {
        self.login.reset();
        self.signup.reset();
        self.forgot_password.reset();
        self.otp_verification.reset_for(None);
        self.update_password.reset();
    }

    // --- Navigation ---

    fn active_screen_busy(&self) -> bool {
        self.active_form().is_locked()
    }

    pub fn show_login(&mut self) -> bool {
        if self.active_screen_busy() {
            return false;
        }
        let leaving_update = self.flow.page() == AuthPage::UpdatePassword;
        match self.flow.show_login() {
            Ok(_) => {
                if leaving_update {
                    self.leave_update_password();
                }
                self.redirect_at = None;
                self.login.reset();
                true
            }
            Err(_) => false,
        }
    }

    pub fn show_signup(&mut self) -> bool {
        if self.active_screen_busy() {
            return false;
        }
        match self.flow.show_signup() {
            Ok(_) => {
                self.signup.reset();
                true
            }
            Err(_) => false,
        }
    }

    pub fn show_forgot_password(&mut self) -> bool {
        if self.active_screen_busy() {
            return false;
        }
        match self.flow.show_forgot_password() {
            Ok(_) => {
                self.forgot_password.reset();
                true
            }
            Err(_) => false,
        }
    }

    fn require_verification(&mut self, email: String) {
        match self.flow.require_verification(email) {
            Ok(_) => {
                let pending = self.flow.pending_email().map(str::to_string);
                self.otp_verification.reset_for(pending.as_deref());
            }
            Err(e) => warn!(error = %e, "Could not open verification page"),
        }
    }

    // --- Auth requests ---

    /// Submit the visible auth page.
    pub fn submit_auth(&mut self) -> Option<AuthRequest> {
        if self.session.is_some() {
            return None;
        }
        match self.flow.page() {
            AuthPage::Login => self.login.begin_submit(),
            AuthPage::Signup => self.signup.begin_submit(),
            AuthPage::ForgotPassword => self.forgot_password.begin_submit(),
            AuthPage::OtpVerification => self.otp_verification.begin_submit(),
            // Wait for the redirect once the password is saved.
            AuthPage::UpdatePassword if self.redirect_at.is_some() => None,
            AuthPage::UpdatePassword => self.update_password.begin_submit(),
        }
    }

    /// Ask for a fresh sign-up code. Only meaningful on the verification page.
    pub fn resend_code(&mut self) -> Option<AuthRequest> {
        if self.session.is_some() || self.flow.page() != AuthPage::OtpVerification {
            return None;
        }
        self.otp_verification.begin_resend()
    }

    pub fn begin_logout(&mut self) -> Option<AuthRequest> {
        if self.session.is_none() || self.signing_out {
            return None;
        }
        self.signing_out = true;
        Some(AuthRequest::SignOut)
    }

    /// Page a response belongs to; outcomes for other pages are dropped.
    fn page_for(action: AuthAction) -> Option<AuthPage> {
        match action {
            AuthAction::SignIn => Some(AuthPage::Login),
            AuthAction::SignUp => Some(AuthPage::Signup),
            AuthAction::RequestReset | AuthAction::VerifyRecovery => {
                Some(AuthPage::ForgotPassword)
            }
            AuthAction::VerifySignup | AuthAction::ResendSignup => {
                Some(AuthPage::OtpVerification)
            }
            AuthAction::UpdatePassword => Some(AuthPage::UpdatePassword),
            AuthAction::SignOut | AuthAction::ReleaseRecovery => None,
        }
    }

    /// Hand a finished auth request back.
    pub fn apply_auth_response(&mut self, response: AuthResponse, now: Instant) {
        let AuthResponse { action, result } = response;
        match &result {
            Ok(()) => debug!(action = %action, "Auth request succeeded"),
            Err(e) => debug!(action = %action, error = %e, "Auth request failed"),
        }

        let outcome = match action {
            AuthAction::SignIn => self.login.complete(result),
            AuthAction::SignUp => self.signup.complete(result),
            AuthAction::RequestReset => self.forgot_password.complete_reset_request(result),
            AuthAction::VerifyRecovery => self.forgot_password.complete_verification(result),
            AuthAction::VerifySignup => self.otp_verification.complete_verification(result),
            AuthAction::ResendSignup => self.otp_verification.complete_resend(result),
            AuthAction::UpdatePassword => self.update_password.complete(result),
            AuthAction::SignOut => {
                if let Err(e) = result {
                    warn!(error = %e, "Sign-out reported an error");
                }
                self.signing_out = false;
                self.clear_session();
                ScreenOutcome::Stay
            }
            AuthAction::ReleaseRecovery => {
                if let Err(e) = result {
                    warn!(error = %e, "Releasing the recovery session reported an error");
                }
                ScreenOutcome::Stay
            }
        };

        if outcome == ScreenOutcome::Stay {
            return;
        }
        if Self::page_for(action) != Some(self.flow.page()) {
            debug!(action = %action, page = %self.flow.page(), "Dropping outcome for a page no longer shown");
            return;
        }

        match outcome {
            ScreenOutcome::VerificationRequired(email) => self.require_verification(email),
            ScreenOutcome::PasswordUpdated => {
                self.redirect_at = Some(now + self.redirect_delay);
                info!(
                    delay_ms = self.redirect_delay.as_millis() as u64,
                    "Password updated, redirecting to login"
                );
            }
            ScreenOutcome::Stay => {}
        }
    }

    /// Fire the pending login redirect once its deadline has passed.
    /// Returns true if the page changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(deadline) = self.redirect_at else {
            return false;
        };
        if now < deadline {
            return false;
        }

        self.redirect_at = None;
        match self.flow.password_updated() {
            Ok(_) => {
                self.leave_update_password();
                self.login.reset();
                self.update_password.reset();
                true
            }
            Err(e) => {
                warn!(error = %e, "Password update redirect skipped");
                false
            }
        }
    }

    // --- Patient form and generation ---

    pub fn focus_next_field(&mut self) {
        self.patient_form.focus_next();
    }

    pub fn focus_prev_field(&mut self) {
        self.patient_form.focus_prev();
    }

    pub fn type_patient_char(&mut self, c: char) -> bool {
        self.patient_form.insert_char(&mut self.patient, c)
    }

    pub fn patient_backspace(&mut self) {
        self.patient_form.backspace(&mut self.patient);
    }

    pub fn cycle_patient_option(&mut self, forward: bool) {
        self.patient_form.cycle_option(&mut self.patient, forward);
    }

    /// Start a plan for the current patient, unless one is running or a
    /// required field is empty.
    pub fn begin_generation(&mut self) -> Option<GenerationRequest> {
        if self.output.is_generating() {
            return None;
        }
        let missing = self.patient.missing_required_fields();
        if !missing.is_empty() {
            debug!(missing = ?missing, "Diet plan request missing required fields");
            self.output.show(VALIDATION_HTML);
            return None;
        }

        self.output.begin();
        Some(GenerationRequest {
            generator: self.generator.clone(),
            patient: self.patient.clone(),
        })
    }

    pub fn complete_generation(&mut self, result: GenerationResult<String>) {
        if !self.output.is_generating() {
            return;
        }
        match result {
            Ok(html) => self.output.show(html),
            Err(e) => {
                error!(error = %e, "Error generating diet plan");
                self.output.show(FAILURE_HTML);
            }
        }
    }
}

impl Drop for RootComposer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
