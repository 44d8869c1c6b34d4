//! UI module: View components for the TUI.

pub mod edit;
pub mod entry;
pub mod nomogram;
pub mod result;
pub mod selection;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::ClinicalTheme;
use crate::tui::wizard::WizardStep;

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(vec![Span::styled(
            "DISCLAIMER: This tool provides indicative estimates and does not replace professional medical evaluation.",
            ClinicalTheme::text_muted(),
        )]),
        Line::from(vec![Span::styled(
            "Likelihood ratios come from published cohorts and may not match your population.",
            ClinicalTheme::text_muted(),
        )]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(ClinicalTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}

/// Title bar with step progress.
pub fn render_header(f: &mut Frame, area: Rect, step: WizardStep) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ClinicalTheme::text()),
        Span::styled("Alzheimer's Pre-Test Calculator", ClinicalTheme::title()),
        Span::styled(" │ ", ClinicalTheme::text_muted()),
        Span::styled(
            format!("Step {} of 4: {}", step.number(), step.title()),
            ClinicalTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicalTheme::border()),
    );

    f.render_widget(header, area);
}

/// Footer showing either an error or the key hints.
pub fn render_footer(f: &mut Frame, area: Rect, hints: &[(&str, &str)], error: Option<&str>) {
    let content = match error {
        Some(err) => Line::from(vec![
            Span::styled("! ", ClinicalTheme::danger()),
            Span::styled(err.to_string(), ClinicalTheme::danger()),
        ]),
        None => Line::from(
            hints
                .iter()
                .flat_map(|(key, desc)| {
                    [
                        Span::styled(format!("[{key}] "), ClinicalTheme::key_hint()),
                        Span::styled(format!("{desc} "), ClinicalTheme::key_desc()),
                    ]
                })
                .collect::<Vec<_>>(),
        ),
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ClinicalTheme::border()),
    );

    f.render_widget(footer, area);
}
