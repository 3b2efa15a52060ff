//! Five-axis risk radar drawn on a Ratatui canvas.
//!
//! The geometry lives in [`radar_point`] so it can be tested without a
//! terminal; `render()` only draws.

use std::f64::consts::{FRAC_PI_2, TAU};

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        Widget,
        canvas::{Canvas, Line as CanvasLine},
    },
};

use crate::domain::{RISK_AXES, RiskVector};

/// Reference rings drawn behind the profile.
const RINGS: [f64; 4] = [0.25, 0.5, 0.75, 1.0];

/// Position of `value` on axis `axis` (of `n`), first axis pointing up and the
/// rest following clockwise.
pub fn radar_point(axis: usize, n: usize, value: f64) -> (f64, f64) {
    let angle = FRAC_PI_2 - TAU * axis as f64 / n as f64;
    (value * angle.cos(), value * angle.sin())
}

/// Closed polygon through one value per axis.
fn polygon(values: &[f64]) -> Vec<(f64, f64)> {
    let n = values.len();
    let mut pts: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .map(|(i, v)| radar_point(i, n, v.clamp(0.0, 1.0)))
        .collect();
    if let Some(first) = pts.first().copied() {
        pts.push(first);
    }
    pts
}

pub struct RiskRadar<'a> {
    pub risk: &'a RiskVector,
}

impl Widget for RiskRadar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 16 || area.height < 6 {
            buf.set_string(area.x, area.y, "Radar area too small.", Style::default().fg(Color::Yellow));
            return;
        }

        let values = *self.risk.values();
        let n = values.len();

        Canvas::default()
            .marker(Marker::Braille)
            // Wider x range leaves room for axis labels on the sides.
            .x_bounds([-1.8, 1.8])
            .y_bounds([-1.3, 1.3])
            .paint(move |ctx| {
                for ring in RINGS {
                    let pts = polygon(&[ring; 5]);
                    for w in pts.windows(2) {
                        ctx.draw(&CanvasLine {
                            x1: w[0].0,
                            y1: w[0].1,
                            x2: w[1].0,
                            y2: w[1].1,
                            color: Color::DarkGray,
                        });
                    }
                }
                for axis in 0..n {
                    let (x, y) = radar_point(axis, n, 1.0);
                    ctx.draw(&CanvasLine { x1: 0.0, y1: 0.0, x2: x, y2: y, color: Color::DarkGray });
                }

                ctx.layer();
                let profile = polygon(&values);
                for w in profile.windows(2) {
                    ctx.draw(&CanvasLine {
                        x1: w[0].0,
                        y1: w[0].1,
                        x2: w[1].0,
                        y2: w[1].1,
                        color: Color::Cyan,
                    });
                }

                for (axis, label) in RISK_AXES.iter().enumerate() {
                    let (x, y) = radar_point(axis, n, 1.12);
                    // Shift left-side labels so they end at the axis tip.
                    let x = if x < -0.1 { x - 0.045 * label.len() as f64 } else { x };
                    ctx.print(
                        x,
                        y,
                        Span::styled(format!("{label} {:.2}", values[axis]), Style::default().fg(Color::Gray)),
                    );
                }
            })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_axis_points_up() {
        let (x, y) = radar_point(0, 5, 1.0);
        assert!(x.abs() < 1e-12);
        assert!((y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn axes_go_clockwise() {
        let (x, _) = radar_point(1, 5, 1.0);
        assert!(x > 0.0, "second axis should be on the right");
        let (x, _) = radar_point(4, 5, 1.0);
        assert!(x < 0.0, "last axis should be on the left");
    }

    #[test]
    fn polygon_is_closed_and_clamped() {
        let pts = polygon(&[0.3, 2.0, 0.0, 0.4, 0.5]);
        assert_eq!(pts.len(), 6);
        assert_eq!(pts.first(), pts.last());
        let (x, y) = pts[1];
        assert!(((x * x + y * y).sqrt() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn renders_into_small_buffer_without_panicking() {
        let risk = RiskVector([0.3, 0.4, 0.3, 0.4, 0.5]);
        let area = Rect::new(0, 0, 40, 14);
        let mut buf = Buffer::empty(area);
        RiskRadar { risk: &risk }.render(area, &mut buf);

        let tiny = Rect::new(0, 0, 10, 3);
        let mut buf = Buffer::empty(tiny);
        RiskRadar { risk: &risk }.render(tiny, &mut buf);
    }
}
