//! Generated Diet Plan panel.
//!
//! The plan is model-produced HTML. It is shown as-is, wrapped to the panel
//! width and scrolled with PgUp/PgDn.

use super::wrap_lines;
use crate::tui::app::App;
use crate::tui::ui::panel_block;
use architect_core::OutputView;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Clamp a scroll offset so the last line stays on screen.
pub fn clamp_scroll(scroll: u16, total_lines: usize, visible: u16) -> u16 {
    let max = total_lines.saturating_sub(usize::from(visible));
    scroll.min(u16::try_from(max).unwrap_or(u16::MAX))
}

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = app.theme;
    let block = panel_block("Generated Diet Plan", false, &theme);
    let inner = block.inner(area);

    let paragraph = match app.composer.output().view() {
        OutputView::Loading => {
            let lines = vec![
                Line::default(),
                Line::from(Span::styled(
                    app.spinner_char().to_string(),
                    Style::default().fg(theme.spinner),
                )),
                Line::from(Span::styled(
                    "Generating diet plan...",
                    Style::default().fg(theme.text_muted),
                )),
            ];
            Paragraph::new(lines).alignment(Alignment::Center)
        }
        OutputView::Markup(html) => {
            let wrapped = wrap_lines(html, inner.width);
            app.plan_scroll = clamp_scroll(app.plan_scroll, wrapped.len(), inner.height);
            let lines: Vec<Line> = wrapped
                .into_iter()
                .map(|line| Line::from(Span::styled(line, Style::default().fg(theme.text))))
                .collect();
            Paragraph::new(lines).scroll((app.plan_scroll, 0))
        }
    };

    frame.render_widget(paragraph.block(block), area);
}
