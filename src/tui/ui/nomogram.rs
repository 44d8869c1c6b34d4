//! Fagan nomogram drawn on a braille canvas.

use ratatui::{
    layout::Rect,
    style::Color,
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Points},
        Block, Borders,
    },
    Frame,
};

use crate::domain::nomogram::{LIKELIHOOD_RATIO_TICKS, PROBABILITY_TICKS};
use crate::domain::{CalculationResult, NomogramLayout};
use crate::tui::styles::ClinicalTheme;
use crate::tui::wizard::NomogramBranch;

const LEFT_AXIS_X: f64 = 0.12;
const MIDDLE_AXIS_X: f64 = 0.5;
const RIGHT_AXIS_X: f64 = 0.88;

/// Canvas y grows upward, layout y grows downward.
fn flip(y: f64) -> f64 {
    -y
}

fn format_ratio(lr: f64) -> String {
    if lr < 1.0 {
        format!("{lr:.1}")
    } else {
        format!("{lr:.0}")
    }
}

pub fn render_nomogram(f: &mut Frame, area: Rect, result: &CalculationResult, branch: NomogramBranch) {
    let layout = NomogramLayout::default();
    let (top, bottom) = layout.extent();
    let margin = (bottom - top) * 0.04;

    let (likelihood_ratio, post_test, branch_label, line_color) = match branch {
        NomogramBranch::Positive => (
            result.likelihood_ratio_positive,
            result.post_test_probability_if_positive,
            "positive result",
            ClinicalTheme::SUCCESS,
        ),
        NomogramBranch::Negative => (
            result.likelihood_ratio_negative,
            result.post_test_probability_if_negative,
            "negative result",
            ClinicalTheme::DANGER,
        ),
    };
    let reading = layout.reading(result.adjusted_pre_test_probability, likelihood_ratio, post_test);

    let block = Block::default()
        .title(Span::styled(
            format!(" Fagan Nomogram ({branch_label}) "),
            ClinicalTheme::subtitle(),
        ))
        .borders(Borders::ALL)
        .border_style(ClinicalTheme::border());

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, 1.0])
        .y_bounds([flip(bottom) - margin, flip(top) + margin])
        .paint(move |ctx| {
            for x in [LEFT_AXIS_X, MIDDLE_AXIS_X, RIGHT_AXIS_X] {
                ctx.draw(&CanvasLine::new(x, flip(bottom), x, flip(top), ClinicalTheme::SECONDARY_LIGHT));
            }

            for tick in PROBABILITY_TICKS {
                ctx.print(
                    0.0,
                    flip(layout.pre_test_y(tick)),
                    Span::styled(format!("{tick}"), ClinicalTheme::text_muted()),
                );
                ctx.print(
                    RIGHT_AXIS_X + 0.02,
                    flip(layout.post_test_y(tick)),
                    Span::styled(format!("{tick}"), ClinicalTheme::text_muted()),
                );
            }
            for tick in LIKELIHOOD_RATIO_TICKS {
                ctx.print(
                    MIDDLE_AXIS_X + 0.02,
                    flip(layout.likelihood_ratio_y(tick)),
                    Span::styled(format_ratio(tick), ClinicalTheme::text_muted()),
                );
            }

            ctx.layer();

            ctx.draw(&CanvasLine::new(
                LEFT_AXIS_X,
                flip(reading.pre_test_y),
                RIGHT_AXIS_X,
                flip(reading.post_test_y),
                line_color,
            ));
            ctx.draw(&Points {
                coords: &[(LEFT_AXIS_X, flip(reading.pre_test_y))],
                color: ClinicalTheme::INFO,
            });
            ctx.draw(&Points {
                coords: &[(MIDDLE_AXIS_X, flip(reading.likelihood_ratio_y))],
                color: Color::White,
            });
            ctx.draw(&Points {
                coords: &[(RIGHT_AXIS_X, flip(reading.post_test_y))],
                color: line_color,
            });
        });

    f.render_widget(canvas, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_labels() {
        assert_eq!(format_ratio(0.2), "0.2");
        assert_eq!(format_ratio(20.0), "20");
    }
}
