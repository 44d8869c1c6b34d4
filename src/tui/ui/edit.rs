//! Likelihood-ratio editor (sub-state of the result step).

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::styles::ClinicalTheme;
use crate::tui::wizard::{EditField, Wizard};

use super::result::render_summary;
use super::{render_footer, render_header};

const EDIT_HINTS: [(&str, &str); 4] = [
    ("↑↓", "Field"),
    ("Enter", "Apply"),
    ("R", "Restore Catalog"),
    ("Esc", "Cancel"),
];

pub fn render_edit(f: &mut Frame, area: Rect, wizard: &Wizard) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    render_header(f, chunks[0], wizard.step);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    let fields = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .margin(1)
        .split(columns[0]);

    let form = &wizard.edit_form;
    render_ratio_field(f, fields[0], "LR+ (positive result)", &form.positive, form.field == EditField::Positive);
    render_ratio_field(f, fields[1], "LR- (negative result)", &form.negative, form.field == EditField::Negative);

    let note = Paragraph::new(vec![
        Line::from(Span::styled(
            "Edited values apply to this assessment only.",
            ClinicalTheme::text_muted(),
        )),
        Line::from(Span::styled(
            "The test catalog is left unchanged.",
            ClinicalTheme::text_muted(),
        )),
    ]);
    f.render_widget(note, fields[2]);

    if let Some(result) = &wizard.result {
        render_summary(f, columns[1], result);
    }

    render_footer(f, chunks[2], &EDIT_HINTS, form.error_message.as_deref());
}

fn render_ratio_field(f: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
    let (border_style, title_style) = if focused {
        (ClinicalTheme::border_focused(), ClinicalTheme::focused())
    } else {
        (ClinicalTheme::border(), ClinicalTheme::text_secondary())
    };

    let content = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(value.to_string(), ClinicalTheme::text()),
        if focused {
            Span::styled("▌", ClinicalTheme::cursor())
        } else {
            Span::raw("")
        },
    ]))
    .block(
        Block::default()
            .title(Span::styled(format!(" {label} "), title_style))
            .borders(Borders::ALL)
            .border_style(border_style),
    );

    f.render_widget(content, area);
}
