//! Age and clinician-estimate entry steps.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::tui::styles::ClinicalTheme;
use crate::tui::wizard::{Wizard, WizardStep};

use super::{render_footer, render_header};

const ENTRY_HINTS: [(&str, &str); 3] = [("Enter", "Next"), ("Esc", "Back"), ("Ctrl+Q", "Quit")];

/// Render the age or probability step.
pub fn render_entry(f: &mut Frame, area: Rect, wizard: &Wizard) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_header(f, chunks[0], wizard.step);
    render_entry_body(f, chunks[1], wizard);
    render_footer(f, chunks[2], &ENTRY_HINTS, wizard.error_message.as_deref());
}

fn render_entry_body(f: &mut Frame, area: Rect, wizard: &Wizard) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let fields = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)])
        .split(columns[0]);

    render_field(
        f,
        fields[0],
        "Patient's Age",
        "years",
        &wizard.age_input,
        wizard.step == WizardStep::CollectAge,
    );
    if wizard.step == WizardStep::CollectProbability {
        render_field(
            f,
            fields[1],
            "Clinician's Estimated Probability (%)",
            "0-100",
            &wizard.probability_input,
            true,
        );
    }

    render_live_panel(f, columns[1], wizard);
}

fn render_field(f: &mut Frame, area: Rect, label: &str, hint: &str, value: &str, focused: bool) {
    let (border_style, title_style) = if focused {
        (ClinicalTheme::border_focused(), ClinicalTheme::focused())
    } else {
        (ClinicalTheme::border(), ClinicalTheme::text_secondary())
    };

    let block = Block::default()
        .title(Span::styled(format!(" {label} "), title_style))
        .borders(Borders::ALL)
        .border_style(border_style);

    let value_display = if value.is_empty() {
        Span::styled(hint.to_string(), ClinicalTheme::text_muted())
    } else {
        Span::styled(value.to_string(), ClinicalTheme::text())
    };

    let content = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        value_display,
        if focused {
            Span::styled("▌", ClinicalTheme::cursor())
        } else {
            Span::raw("")
        },
    ]))
    .block(block);

    f.render_widget(content, area);
}

/// Baseline and pre-test probability as the user types.
fn render_live_panel(f: &mut Frame, area: Rect, wizard: &Wizard) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_probability_gauge(f, chunks[0], " Baseline (Age-based) ", wizard.live_baseline());
    render_probability_gauge(f, chunks[1], " Adjusted Pre-test ", wizard.live_pre_test());

    let note = Paragraph::new(vec![
        Line::from(Span::styled(
            "The age-based population rate acts as a floor:",
            ClinicalTheme::text_muted(),
        )),
        Line::from(Span::styled(
            "estimates below it are raised to the baseline.",
            ClinicalTheme::text_muted(),
        )),
    ])
    .block(Block::default().borders(Borders::NONE));
    f.render_widget(note, chunks[2]);
}

fn render_probability_gauge(f: &mut Frame, area: Rect, title: &str, percent: Option<f64>) {
    let block = Block::default()
        .title(Span::styled(title.to_string(), ClinicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(ClinicalTheme::border());

    match percent {
        Some(p) => {
            let gauge = Gauge::default()
                .block(block)
                .gauge_style(ClinicalTheme::probability(p))
                .ratio((p / 100.0).clamp(0.0, 1.0))
                .label(format!("{p:.1}%"));
            f.render_widget(gauge, area);
        }
        None => {
            let empty = Paragraph::new(Span::styled(" --", ClinicalTheme::text_muted())).block(block);
            f.render_widget(empty, area);
        }
    }
}
