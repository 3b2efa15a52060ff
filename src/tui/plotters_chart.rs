//! Plotters-powered prediction history chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using
//! `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Cost-over-time chart. Bounds come from [`history_bounds`].
pub struct HistoryChart<'a> {
    /// `(prediction number, cost)` pairs, oldest first.
    pub points: &'a [(f64, f64)],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub fmt_y: fn(f64) -> String,
}

/// Axis bounds for a history series, padded so single points and flat
/// histories still get a usable range.
pub fn history_bounds(points: &[(f64, f64)]) -> ([f64; 2], [f64; 2]) {
    let (mut x0, mut x1) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y0, mut y1) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in points {
        x0 = x0.min(x);
        x1 = x1.max(x);
        y0 = y0.min(y);
        y1 = y1.max(y);
    }

    if !(x0.is_finite() && x1.is_finite()) {
        return ([0.0, 1.0], [0.0, 1.0]);
    }
    if x1 - x0 < 1.0 {
        x0 -= 0.5;
        x1 += 0.5;
    }

    let pad = ((y1 - y0).abs() * 0.1).max(y1.abs() * 0.05).max(1.0);
    let lower = (y0 - pad).max(0.0);
    ([x0, x1], [lower, y1 + pad])
}

impl Widget for HistoryChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters cannot lay out axes in very small areas.
        if area.width < 24 || area.height < 6 {
            buf.set_string(area.x, area.y, "History chart needs more room.", Style::default().fg(Color::Yellow));
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        let finite = [x0, x1, y0, y1].iter().all(|v| v.is_finite());
        if !finite || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 9)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(5)
                .y_labels(4)
                .x_label_formatter(&|v| format!("#{v:.0}"))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let line_color = RGBColor(0, 128, 128); // teal

            chart.draw_series(LineSeries::new(self.points.iter().copied(), &line_color))?;
            // A lone prediction has no line; mark every point so it still shows.
            chart.draw_series(
                self.points
                    .iter()
                    .map(|&(x, y)| Pixel::new((x, y), RGBColor(0, 255, 255))),
            )?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_gets_unit_bounds() {
        assert_eq!(history_bounds(&[]), ([0.0, 1.0], [0.0, 1.0]));
    }

    #[test]
    fn single_point_is_centered_with_padding() {
        let (x, y) = history_bounds(&[(1.0, 20_000.0)]);
        assert_eq!(x, [0.5, 1.5]);
        assert!(y[0] < 20_000.0 && y[1] > 20_000.0);
    }

    #[test]
    fn lower_bound_never_goes_negative() {
        let (_, y) = history_bounds(&[(1.0, 0.0), (2.0, 10.0)]);
        assert_eq!(y[0], 0.0);
        assert!(y[1] > 10.0);
    }
}
