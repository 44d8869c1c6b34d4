//! Test selection step.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::domain::TestCatalog;
use crate::tui::styles::ClinicalTheme;
use crate::tui::wizard::Wizard;

use super::{render_footer, render_header};

const SELECT_HINTS: [(&str, &str); 4] = [
    ("↑↓", "Choose"),
    ("Enter", "Calculate"),
    ("Esc", "Back"),
    ("Q", "Quit"),
];

pub fn render_selection(f: &mut Frame, area: Rect, wizard: &Wizard, catalog: &TestCatalog) {
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
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .margin(1)
        .split(chunks[1]);

    render_test_list(f, columns[0], wizard.selected_test, catalog);
    render_test_details(f, columns[1], wizard, catalog);

    render_footer(f, chunks[2], &SELECT_HINTS, wizard.error_message.as_deref());
}

fn render_test_list(f: &mut Frame, area: Rect, selected: usize, catalog: &TestCatalog) {
    let lines: Vec<Line> = catalog
        .tests()
        .iter()
        .enumerate()
        .map(|(i, test)| {
            if i == selected {
                Line::from(Span::styled(format!(" ▶ {} ", test.name), ClinicalTheme::selected()))
            } else {
                Line::from(Span::styled(format!("   {} ", test.name), ClinicalTheme::text()))
            }
        })
        .collect();

    let block = Block::default()
        .title(Span::styled(" Select Diagnostic Test ", ClinicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(ClinicalTheme::border_focused());

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_test_details(f: &mut Frame, area: Rect, wizard: &Wizard, catalog: &TestCatalog) {
    let block = Block::default()
        .title(Span::styled(" Test Parameters ", ClinicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(ClinicalTheme::border());

    let Some(test) = catalog.tests().get(wizard.selected_test) else {
        f.render_widget(block, area);
        return;
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Threshold: ", ClinicalTheme::text_secondary()),
            Span::styled(format!("{}%", test.threshold), ClinicalTheme::text()),
        ]),
        Line::from(vec![
            Span::styled("LR+: ", ClinicalTheme::text_secondary()),
            Span::styled(format!("{:.1}", test.likelihood_ratio_positive), ClinicalTheme::text()),
        ]),
        Line::from(vec![
            Span::styled("LR-: ", ClinicalTheme::text_secondary()),
            Span::styled(format!("{:.2}", test.likelihood_ratio_negative), ClinicalTheme::text()),
        ]),
    ];

    if let Some(source) = &test.source {
        lines.push(Line::from(vec![
            Span::styled("Source: ", ClinicalTheme::text_secondary()),
            Span::styled(source.clone(), ClinicalTheme::text_muted()),
        ]));
    }

    if let Some(pre_test) = wizard.live_pre_test() {
        lines.push(Line::from(""));
        let (note, style) = if pre_test < test.threshold {
            ("below this test's threshold", ClinicalTheme::warning())
        } else {
            ("within this test's range", ClinicalTheme::success())
        };
        lines.push(Line::from(vec![
            Span::styled(format!("Pre-test {pre_test:.1}% is "), ClinicalTheme::text_secondary()),
            Span::styled(note, style),
        ]));
    }

    let details = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(details, area);
}
