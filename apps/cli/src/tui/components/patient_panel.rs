//! Patient Details form.

use super::auth_panel::tail_to_width;
use crate::tui::app::App;
use crate::tui::ui::panel_block;
use architect_core::{FieldKind, PatientField};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Label with a `*` for required fields.
fn field_label(field: PatientField) -> String {
    if field.is_required() {
        format!("{} *", field.label())
    } else {
        field.label().to_string()
    }
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let patient = app.composer.patient();
    let focused_field = app.composer.patient_form().focused();
    let generating = app.composer.output().is_generating();
    let value_width = usize::from(area.width.saturating_sub(8));

    let mut lines: Vec<Line> = Vec::new();
    for field in PatientField::ALL {
        let focused = field == focused_field;
        lines.push(Line::from(Span::styled(
            field_label(field),
            Style::default().fg(if focused {
                theme.accent
            } else {
                theme.text_secondary
            }),
        )));

        let value = field.value(patient);
        let marker = if focused { "> " } else { "  " };
        let mut row = vec![Span::styled(marker, Style::default().fg(theme.accent))];
        match field.kind() {
            FieldKind::Select(_) => {
                row.push(Span::styled("< ", Style::default().fg(theme.text_muted)));
                row.push(Span::styled(value.to_string(), Style::default().fg(theme.text)));
                row.push(Span::styled(" >", Style::default().fg(theme.text_muted)));
            }
            FieldKind::Text | FieldKind::Number if value.is_empty() => {
                row.push(Span::styled(
                    field.placeholder(),
                    Style::default().fg(theme.text_muted),
                ));
            }
            FieldKind::Text | FieldKind::Number => {
                row.push(Span::styled(
                    tail_to_width(value, value_width),
                    Style::default().fg(theme.text),
                ));
            }
        }
        lines.push(Line::from(row).style(if focused {
            Style::default().bg(theme.bg_selection)
        } else {
            Style::default()
        }));
    }

    lines.push(Line::default());
    let button = if generating {
        Span::styled(
            format!("[ Generating... {} ]", app.spinner_char()),
            Style::default().fg(theme.bg).bg(theme.text_muted),
        )
    } else {
        Span::styled(
            "[ Enter: Generate Diet Plan ]",
            Style::default()
                .fg(theme.bg)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
    };
    lines.push(Line::from(button));

    let paragraph = Paragraph::new(lines).block(panel_block("Patient Details", true, theme));
    frame.render_widget(paragraph, area);
}
