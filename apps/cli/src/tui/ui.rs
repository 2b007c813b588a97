//! Main render function and layout for the TUI.

use super::app::App;
use super::components::{auth_panel, centered_rect, patient_panel, plan_panel};
use super::theme::Theme;
use architect_core::Screen;
use auth_page_flow::AuthPage;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};

const APP_TITLE: &str = "Ayurvedic Diet Architect";

/// Render the entire application.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let theme = app.theme;

    Clear.render(area, frame.buffer_mut());
    Block::default()
        .style(Style::default().bg(theme.bg))
        .render(area, frame.buffer_mut());

    // Header, content, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, app, chunks[0]);

    match app.screen() {
        Screen::Loading => render_loading(frame, app, chunks[1]),
        Screen::Auth(page) => auth_panel::render(frame, app, page, chunks[1]),
        Screen::Main => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                .split(chunks[1]);
            patient_panel::render(frame, app, columns[0]);
            plan_panel::render(frame, app, columns[1]);
        }
    }

    render_status_bar(frame, app, chunks[2]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let mut spans = vec![Span::styled(
        format!(" {} ", APP_TITLE),
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    )];

    if let Some(session) = app.composer.session() {
        let who = session.email().unwrap_or("signed in");
        spans.push(Span::styled(
            format!("| {} ", who),
            Style::default().fg(theme.text_secondary),
        ));
        if app.composer.is_signing_out() {
            spans.push(Span::styled(
                format!("{} Logging out...", app.spinner_char()),
                Style::default().fg(theme.spinner),
            ));
        }
    }

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.bg_panel));
    frame.render_widget(header, area);
}

fn render_loading(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let rect = centered_rect(30, 1, area);
    let message = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("{} ", app.spinner_char()),
            Style::default().fg(theme.spinner),
        ),
        Span::styled("Loading...", Style::default().fg(theme.text_muted)),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(message, rect);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let (text, color) = match &app.status_message {
        Some(msg) => (msg.clone(), theme.warning),
        None => (key_hints(app.screen()).to_string(), theme.text_muted),
    };

    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(text, Style::default().fg(color)),
    ]))
    .style(Style::default().bg(theme.bg_panel));

    frame.render_widget(status, area);
}

/// Default status line for a screen.
fn key_hints(screen: Screen) -> &'static str {
    match screen {
        Screen::Loading => "Ctrl-C quit",
        Screen::Auth(AuthPage::OtpVerification) => {
            "Tab/↓ next | Shift-Tab/↑ prev | Enter submit | Ctrl-R resend | Ctrl-C quit"
        }
        Screen::Auth(_) => "Tab/↓ next | Shift-Tab/↑ prev | Enter submit | Ctrl-C quit",
        Screen::Main => {
            "Tab/↓ next | Shift-Tab/↑ prev | ←/→ change option | Enter generate | PgUp/PgDn scroll | Ctrl-O logout | Ctrl-C quit"
        }
    }
}

/// Helper to create a styled block for panels.
pub fn panel_block<'a>(title: &str, is_active: bool, theme: &Theme) -> Block<'a> {
    let border_color = if is_active {
        theme.border_active
    } else {
        theme.border
    };

    let title_color = if is_active {
        theme.accent
    } else {
        theme.text_secondary
    };

    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {} ", title))
        .title_style(Style::default().fg(title_color))
        .style(Style::default().bg(theme.bg_panel))
}
