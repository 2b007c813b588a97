//! Application state for the TUI: the composer plus view-only state.

use super::theme::{Theme, ThemeMode};
use architect_core::{AuthRequest, AuthResponse, GenerationRequest, RootComposer, Screen};
use auth_page_flow::AuthPage;
use diet_plan_generator::GenerationResult;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::debug;

/// A finished background call.
#[derive(Debug)]
pub enum TaskResult {
    Auth(AuthResponse),
    Generation(GenerationResult<String>),
}

/// Main application state.
pub struct App {
    pub composer: RootComposer,
    pub theme: Theme,

    /// Focused input on the current auth page.
    pub auth_focus: usize,
    /// First visible line of the plan output.
    pub plan_scroll: u16,
    pub spinner_frame: usize,
    pub status_message: Option<String>,

    shown_screen: Screen,
    tasks: mpsc::UnboundedSender<TaskResult>,
    pub(super) results: mpsc::UnboundedReceiver<TaskResult>,
}

impl App {
    pub fn new(composer: RootComposer, theme_mode: ThemeMode) -> Self {
        let (tasks, results) = mpsc::unbounded_channel();
        let shown_screen = composer.screen();
        Self {
            composer,
            theme: Theme::from_mode(theme_mode),
            auth_focus: 0,
            plan_scroll: 0,
            spinner_frame: 0,
            status_message: None,
            shown_screen,
            tasks,
            results,
        }
    }

    pub async fn start(&mut self) {
        self.composer.start().await;
        self.sync_focus();
    }

    pub fn shutdown(&mut self) {
        self.composer.shutdown();
    }

    /// Reset view state when the composer moved to another screen, and keep
    /// the auth focus inside the current page's inputs.
    pub fn sync_focus(&mut self) {
        let screen = self.composer.screen();
        if screen != self.shown_screen {
            debug!(from = ?self.shown_screen, to = ?screen, "Screen changed");
            self.shown_screen = screen;
            self.auth_focus = 0;
            self.plan_scroll = 0;
        }
        let inputs = self.composer.active_form().inputs().len();
        if inputs > 0 && self.auth_focus >= inputs {
            self.auth_focus = inputs - 1;
        }
    }

    pub fn screen(&self) -> Screen {
        self.composer.screen()
    }

    /// True while something is in flight and the spinner should move.
    pub fn is_busy(&self) -> bool {
        match self.composer.screen() {
            Screen::Loading => true,
            Screen::Auth(_) => self.composer.active_form().is_locked(),
            Screen::Main => {
                self.composer.output().is_generating() || self.composer.is_signing_out()
            }
        }
    }

    // --- Focus and typing ---

    pub fn focus_next(&mut self) {
        match self.composer.screen() {
            Screen::Auth(_) => {
                let inputs = self.composer.active_form().inputs().len();
                if inputs > 0 {
                    self.auth_focus = (self.auth_focus + 1) % inputs;
                }
            }
            Screen::Main => self.composer.focus_next_field(),
            Screen::Loading => {}
        }
    }

    pub fn focus_prev(&mut self) {
        match self.composer.screen() {
            Screen::Auth(_) => {
                let inputs = self.composer.active_form().inputs().len();
                if inputs > 0 {
                    self.auth_focus = (self.auth_focus + inputs - 1) % inputs;
                }
            }
            Screen::Main => self.composer.focus_prev_field(),
            Screen::Loading => {}
        }
    }

    pub fn type_char(&mut self, c: char) {
        match self.composer.screen() {
            Screen::Auth(_) => {
                let focus = self.auth_focus;
                let form = self.composer.active_form_mut();
                if form.is_locked() {
                    return;
                }
                if let Some(input) = form.input_mut(focus) {
                    input.push(c);
                }
            }
            Screen::Main => {
                if !self.composer.output().is_generating() {
                    self.composer.type_patient_char(c);
                }
            }
            Screen::Loading => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.composer.screen() {
            Screen::Auth(_) => {
                let focus = self.auth_focus;
                let form = self.composer.active_form_mut();
                if form.is_locked() {
                    return;
                }
                if let Some(input) = form.input_mut(focus) {
                    input.backspace();
                }
            }
            Screen::Main => {
                if !self.composer.output().is_generating() {
                    self.composer.patient_backspace();
                }
            }
            Screen::Loading => {}
        }
    }

    pub fn cycle_option(&mut self, forward: bool) {
        if self.composer.screen() == Screen::Main && !self.composer.output().is_generating() {
            self.composer.cycle_patient_option(forward);
        }
    }

    // --- Actions ---

    /// Enter: submit the auth page or request a plan.
    pub fn submit(&mut self) {
        match self.composer.screen() {
            Screen::Auth(_) => {
                if let Some(request) = self.composer.submit_auth() {
                    self.spawn_auth(request);
                }
            }
            Screen::Main => {
                if let Some(request) = self.composer.begin_generation() {
                    self.plan_scroll = 0;
                    self.spawn_generation(request);
                }
            }
            Screen::Loading => {}
        }
    }

    pub fn resend_code(&mut self) {
        if let Some(request) = self.composer.resend_code() {
            self.spawn_auth(request);
        }
    }

    pub fn logout(&mut self) {
        if let Some(request) = self.composer.begin_logout() {
            self.spawn_auth(request);
        }
    }

    pub fn show_page(&mut self, page: AuthPage) {
        if !matches!(self.composer.screen(), Screen::Auth(_)) {
            return;
        }
        let changed = match page {
            AuthPage::Login => self.composer.show_login(),
            AuthPage::Signup => self.composer.show_signup(),
            AuthPage::ForgotPassword => self.composer.show_forgot_password(),
            AuthPage::OtpVerification | AuthPage::UpdatePassword => false,
        };
        if changed {
            self.auth_focus = 0;
        } else {
            self.set_status_message("Not available from this page".to_string());
        }
    }

    /// Fire the login redirect and drop any recovery session left behind.
    pub fn tick(&mut self, now: Instant) {
        self.composer.tick(now);
        if let Some(request) = self.composer.take_release_request() {
            self.spawn_auth(request);
        }
    }

    pub fn scroll_plan(&mut self, lines: i32) {
        let next = i32::from(self.plan_scroll) + lines;
        self.plan_scroll = next.clamp(0, i32::from(u16::MAX)) as u16;
    }

    pub fn apply_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Auth(response) => {
                self.composer.apply_auth_response(response, Instant::now())
            }
            TaskResult::Generation(result) => self.composer.complete_generation(result),
        }
    }

    fn spawn_auth(&self, request: AuthRequest) {
        debug!(action = %request.action(), "Spawning auth request");
        let provider = self.composer.provider();
        let tasks = self.tasks.clone();
        tokio::spawn(async move {
            let response = request.execute(&*provider).await;
            let _ = tasks.send(TaskResult::Auth(response));
        });
    }

    fn spawn_generation(&self, request: GenerationRequest) {
        debug!("Spawning diet plan generation");
        let tasks = self.tasks.clone();
        tokio::spawn(async move {
            let result = request.run().await;
            let _ = tasks.send(TaskResult::Generation(result));
        });
    }

    // --- Status line and spinner ---

    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn clear_status_message(&mut self) {
        self.status_message = None;
    }

    pub fn spinner_char(&self) -> char {
        const SPINNER_FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    pub fn advance_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }
}
