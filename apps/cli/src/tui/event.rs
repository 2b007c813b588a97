//! Keyboard event handling for the TUI.

use super::app::App;
use anyhow::Result;
use architect_core::Screen;
use auth_page_flow::AuthPage;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Lines moved by PgUp/PgDn in the plan panel.
const PAGE_SCROLL: i32 = 10;

/// Handle input events. Returns true if the app should quit.
pub fn handle_events(app: &mut App) -> Result<bool> {
    if event::poll(Duration::from_millis(100))? {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                return Ok(false);
            }
            app.clear_status_message();
            return Ok(handle_key_event(app, key));
        }
    }

    Ok(false)
}

/// Handle a key event. Returns true if the app should quit.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return handle_control_key(app, key.code);
    }

    match key.code {
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.focus_prev();
            } else {
                app.focus_next();
            }
        }
        KeyCode::BackTab | KeyCode::Up => app.focus_prev(),
        KeyCode::Down => app.focus_next(),
        KeyCode::Left => app.cycle_option(false),
        KeyCode::Right => app.cycle_option(true),
        KeyCode::Enter => app.submit(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::PageUp => app.scroll_plan(-PAGE_SCROLL),
        KeyCode::PageDown => app.scroll_plan(PAGE_SCROLL),
        KeyCode::Char(c) => app.type_char(c),
        _ => {}
    }

    false
}

fn handle_control_key(app: &mut App, code: KeyCode) -> bool {
    match code {
        KeyCode::Char('c') => return true,
        KeyCode::Char('s') => app.show_page(AuthPage::Signup),
        KeyCode::Char('f') => app.show_page(AuthPage::ForgotPassword),
        KeyCode::Char('l') => app.show_page(AuthPage::Login),
        KeyCode::Char('r') => {
            if app.screen() == Screen::Auth(AuthPage::OtpVerification) {
                app.resend_code();
            }
        }
        KeyCode::Char('o') => {
            if app.screen() == Screen::Main {
                app.logout();
            }
        }
        _ => {}
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::tests::started_app;
    use architect_core::AuthForm;

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(app: &mut App, c: char) -> bool {
        handle_key_event(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    #[tokio::test]
    async fn test_ctrl_c_quits() {
        let mut app = started_app().await;
        assert!(ctrl(&mut app, 'c'));
        assert!(!press(&mut app, KeyCode::Char('q')));
    }

    #[tokio::test]
    async fn test_page_links() {
        let mut app = started_app().await;

        ctrl(&mut app, 's');
        assert_eq!(app.screen(), Screen::Auth(AuthPage::Signup));

        ctrl(&mut app, 'l');
        assert_eq!(app.screen(), Screen::Auth(AuthPage::Login));

        ctrl(&mut app, 'f');
        assert_eq!(app.screen(), Screen::Auth(AuthPage::ForgotPassword));
    }

    #[tokio::test]
    async fn test_tab_and_backtab_move_focus() {
        let mut app = started_app().await;
        ctrl(&mut app, 's');
        app.sync_focus();

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.auth_focus, 2);

        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.auth_focus, 1);

        handle_key_event(&mut app, KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT));
        assert_eq!(app.auth_focus, 0);
    }

    #[tokio::test]
    async fn test_chars_edit_the_focused_input() {
        let mut app = started_app().await;
        for c in "kapha@example.com".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Backspace);

        assert_eq!(
            app.composer.login().inputs()[0].value(),
            "kapha@example.co"
        );
    }

    #[tokio::test]
    async fn test_resend_ignored_outside_verification() {
        let mut app = started_app().await;
        ctrl(&mut app, 'r');
        assert!(!app.is_busy());
        assert_eq!(app.screen(), Screen::Auth(AuthPage::Login));
    }
}
