//! Result view: recommendation, calculation details and nomogram.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::domain::{CalculationResult, LikelihoodSource};
use crate::tui::styles::ClinicalTheme;
use crate::tui::wizard::Wizard;

use super::nomogram::render_nomogram;
use super::{render_footer, render_header};

const RESULT_HINTS: [(&str, &str); 5] = [
    ("E", "Edit LRs"),
    ("P", "Toggle Branch"),
    ("N", "New Assessment"),
    ("Esc", "Change Test"),
    ("Q", "Quit"),
];

pub fn render_result(f: &mut Frame, area: Rect, wizard: &Wizard) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    render_header(f, chunks[0], wizard.step);

    match &wizard.result {
        Some(result) => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(chunks[1]);

            render_summary(f, columns[0], result);
            render_nomogram(f, columns[1], result, wizard.branch);
        }
        None => {
            let empty = Paragraph::new(Span::styled("No result yet", ClinicalTheme::text_muted()))
                .alignment(Alignment::Center);
            f.render_widget(empty, chunks[1]);
        }
    }

    render_footer(f, chunks[2], &RESULT_HINTS, wizard.error_message.as_deref());
}

/// Recommendation banner above the detail panels.
pub fn render_summary(f: &mut Frame, area: Rect, result: &CalculationResult) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Recommendation
            Constraint::Min(12),   // Details
            Constraint::Length(5), // Interpretation
        ])
        .split(area);

    let style = ClinicalTheme::recommendation(result.recommendation);
    let banner = Paragraph::new(vec![
        Line::from(Span::styled(result.recommendation.to_string(), style)),
        Line::from(Span::styled(result.recommendation_message(), ClinicalTheme::text_secondary())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(style),
    );
    f.render_widget(banner, chunks[0]);

    render_details(f, chunks[1], result);

    let interpretation: Vec<Line> = result
        .interpretation()
        .into_iter()
        .map(|line| Line::from(Span::styled(line, ClinicalTheme::text())))
        .collect();
    let interpretation = Paragraph::new(interpretation)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(Span::styled(" Interpretation ", ClinicalTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(ClinicalTheme::border()),
        );
    f.render_widget(interpretation, chunks[2]);
}

fn row(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {label:<22}"), ClinicalTheme::text_secondary()),
        Span::styled(value, ClinicalTheme::text()),
    ])
}

fn change_row(label: &str, delta: f64) -> Line<'static> {
    let sign = if delta > 0.0 { "+" } else { "" };
    Line::from(vec![
        Span::styled(format!("  {label:<22}"), ClinicalTheme::text_secondary()),
        Span::styled(format!("{sign}{delta:.1}%"), ClinicalTheme::change(delta)),
    ])
}

fn render_details(f: &mut Frame, area: Rect, result: &CalculationResult) {
    let mut lines = vec![
        Line::from(Span::styled("Initial Probabilities", ClinicalTheme::focused())),
        row("Clinician's Estimate:", format!("{:.1}%", result.clinician_probability)),
        row("Baseline (Age-based):", format!("{:.1}%", result.baseline_probability)),
        row("Adjusted Pre-test:", format!("{:.1}%", result.adjusted_pre_test_probability)),
        Line::from(Span::styled("Test Parameters", ClinicalTheme::focused())),
        row("Test Threshold:", format!("{}%", result.threshold)),
        row("LR+:", format!("{:.1}", result.likelihood_ratio_positive)),
        row("LR-:", format!("{:.2}", result.likelihood_ratio_negative)),
    ];

    if result.likelihood_source == LikelihoodSource::Override {
        let source = result
            .likelihood_provenance
            .clone()
            .unwrap_or_else(|| "custom".to_string());
        lines.push(Line::from(Span::styled(
            format!("  (edited: {source})"),
            ClinicalTheme::warning(),
        )));
    }

    lines.extend([
        Line::from(Span::styled("Post-Test Probabilities", ClinicalTheme::focused())),
        row("Positive Result:", format!("{:.1}%", result.post_test_probability_if_positive)),
        row("Negative Result:", format!("{:.1}%", result.post_test_probability_if_negative)),
        change_row("Positive Change:", result.change_if_positive),
        change_row("Negative Change:", result.change_if_negative),
    ]);

    let details = Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(" Calculation Details ", ClinicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(ClinicalTheme::border()),
    );
    f.render_widget(details, area);
}
