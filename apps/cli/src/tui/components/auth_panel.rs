//! Centered card for the authentication pages.

use super::{centered_rect, wrap_lines};
use crate::tui::app::App;
use crate::tui::ui::panel_block;
use architect_core::AuthForm;
use auth_page_flow::AuthPage;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

const CARD_WIDTH: u16 = 64;

/// Key hints for the links shown under each page.
fn page_links(page: AuthPage) -> &'static [(&'static str, &'static str)] {
    match page {
        AuthPage::Login => &[
            ("Ctrl-F", "Forgot password?"),
            ("Ctrl-S", "Don't have an account? Sign up"),
        ],
        AuthPage::Signup => &[("Ctrl-L", "Already have an account? Log in")],
        AuthPage::ForgotPassword => &[("Ctrl-L", "Back to login")],
        AuthPage::OtpVerification => &[
            ("Ctrl-R", "Didn't receive a code? Resend"),
            ("Ctrl-L", "Back to login"),
        ],
        AuthPage::UpdatePassword => &[("Ctrl-L", "Back to login")],
    }
}

/// Keep the end of `text` visible within `width` columns.
pub fn tail_to_width(text: &str, width: usize) -> String {
    let mut used = 0;
    let mut start = text.len();
    for (idx, c) in text.char_indices().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = idx;
    }
    text[start..].to_string()
}

pub fn render(frame: &mut Frame, app: &App, page: AuthPage, area: Rect) {
    let theme = &app.theme;
    let form = app.composer.active_form();
    let status = form.status();
    let inner_width = CARD_WIDTH.saturating_sub(4);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        page.title(),
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::default());

    if let Some(prompt) = form.prompt() {
        for line in wrap_lines(&prompt, inner_width) {
            lines.push(Line::from(Span::styled(
                line,
                Style::default().fg(theme.text_secondary),
            )));
        }
        lines.push(Line::default());
    }

    for (idx, input) in form.inputs().into_iter().enumerate() {
        let focused = idx == app.auth_focus;
        lines.push(Line::from(Span::styled(
            input.label,
            Style::default().fg(if focused {
                theme.accent
            } else {
                theme.text_secondary
            }),
        )));

        let marker = if focused { "> " } else { "  " };
        let field_width = usize::from(inner_width.saturating_sub(3));
        let value = if input.value().is_empty() {
            Span::styled(input.placeholder, Style::default().fg(theme.text_muted))
        } else {
            Span::styled(
                tail_to_width(&input.display_value(), field_width),
                Style::default().fg(theme.text),
            )
        };
        let mut row = vec![Span::styled(marker, Style::default().fg(theme.accent)), value];
        if focused && !form.is_locked() {
            row.push(Span::styled("_", Style::default().fg(theme.accent)));
        }
        lines.push(Line::from(row).style(if focused {
            Style::default().bg(theme.bg_selection)
        } else {
            Style::default()
        }));
        lines.push(Line::default());
    }

    if let Some(error) = &status.error {
        for line in wrap_lines(error, inner_width) {
            lines.push(Line::from(Span::styled(line, Style::default().fg(theme.error))));
        }
    }
    if let Some(info) = &status.info {
        for line in wrap_lines(info, inner_width) {
            lines.push(Line::from(Span::styled(line, Style::default().fg(theme.success))));
        }
    }

    let mut button = vec![Span::styled(
        format!("[ {} ]", form.submit_label()),
        Style::default()
            .fg(theme.bg)
            .bg(if form.is_locked() {
                theme.text_muted
            } else {
                theme.accent
            })
            .add_modifier(Modifier::BOLD),
    )];
    if form.is_locked() {
        button.push(Span::styled(
            format!(" {}", app.spinner_char()),
            Style::default().fg(theme.spinner),
        ));
    }
    lines.push(Line::default());
    lines.push(Line::from(button));
    lines.push(Line::default());

    for (key, label) in page_links(page) {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<7}", key), Style::default().fg(theme.info)),
            Span::styled(*label, Style::default().fg(theme.text_muted)),
        ]));
    }

    let height = lines.len() as u16 + 2;
    let card = centered_rect(CARD_WIDTH, height, area);

    frame.render_widget(Clear, card);
    let block = panel_block("Ayurvedic Diet Architect", true, theme);
    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left);
    frame.render_widget(paragraph, card);
}
