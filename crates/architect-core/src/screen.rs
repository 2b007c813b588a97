//! Top-level screen selection.

use auth_page_flow::AuthPage;
use identity_client::Session;

/// What the UI shows. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Auth(AuthPage),
    Main,
}

impl Screen {
    pub fn resolve(is_loading_session: bool, session: Option<&Session>, page: AuthPage) -> Self {
        if is_loading_session {
            Screen::Loading
        } else if session.is_some() {
            Screen::Main
        } else {
            Screen::Auth(page)
        }
    }
}
