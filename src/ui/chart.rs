//! Chart preview widgets for bar and pie data.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use crate::data::DataPoint;

use super::theme::Theme;

/// Widest a single bar is allowed to render
const MAX_BAR_WIDTH: u16 = 9;

/// Bar chart preview, one colored bar per data point
pub struct BarPreview<'a> {
    points: &'a [DataPoint],
    title: &'a str,
    theme: &'a Theme,
}

impl<'a> BarPreview<'a> {
    pub fn new(points: &'a [DataPoint], title: &'a str, theme: &'a Theme) -> Self {
        BarPreview {
            points,
            title,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let renderable: Vec<(usize, &DataPoint)> = self
            .points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.value > 0.0)
            .collect();

        if renderable.is_empty() {
            render_empty(frame, area, self.title, self.theme, focused);
            return;
        }

        let bars: Vec<Bar> = renderable
            .iter()
            .map(|(i, point)| {
                let color = self.theme.point_color(&point.color, *i);
                Bar::default()
                    .label(Line::from(point.label.clone()))
                    .value(point.value.round().max(0.0) as u64)
                    .text_value(format!("{:.0}", point.value))
                    .style(Style::default().fg(color))
            })
            .collect();

        // Size bars to fill the panel without overflowing it
        let inner_width = area.width.saturating_sub(2);
        let count = renderable.len() as u16;
        let bar_width = (inner_width / count.max(1))
            .saturating_sub(1)
            .clamp(1, MAX_BAR_WIDTH);

        let chart = BarChart::default()
            .block(preview_block(self.title, self.theme, focused))
            .data(BarGroup::default().bars(&bars))
            .bar_width(bar_width)
            .bar_gap(1);

        frame.render_widget(chart, area);
    }
}

/// Pie chart preview rendered as a proportional breakdown: one colored
/// band per slice with its share of the total
pub struct PiePreview<'a> {
    points: &'a [DataPoint],
    title: &'a str,
    theme: &'a Theme,
}

impl<'a> PiePreview<'a> {
    pub fn new(points: &'a [DataPoint], title: &'a str, theme: &'a Theme) -> Self {
        PiePreview {
            points,
            title,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let shares = slice_shares(self.points);
        if shares.iter().all(|s| *s <= 0.0) {
            render_empty(frame, area, self.title, self.theme, focused);
            return;
        }

        let label_width = self
            .points
            .iter()
            .map(|p| p.label.chars().count())
            .max()
            .unwrap_or(0)
            .min(20);
        let inner_width = area.width.saturating_sub(2) as usize;
        // label + two separators + band + percentage column
        let band_width = inner_width.saturating_sub(label_width + 10).max(4);

        let mut lines: Vec<Line> = Vec::with_capacity(self.points.len() * 2);
        for (i, (point, share)) in self.points.iter().zip(shares.iter()).enumerate() {
            let color = self.theme.point_color(&point.color, i);
            let filled = (share * band_width as f64).round() as usize;
            let band: String = "█".repeat(filled.min(band_width));

            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:<label_width$.label_width$}", point.label),
                    self.theme.normal_style(),
                ),
                Span::raw("  "),
                Span::styled(band, Style::default().fg(color)),
                Span::raw(" "),
                Span::styled(
                    format!("{:.1}%", share * 100.0),
                    Style::default().add_modifier(Modifier::DIM),
                ),
            ]));
            lines.push(Line::from(""));
        }

        let paragraph = Paragraph::new(lines).block(preview_block(self.title, self.theme, focused));
        frame.render_widget(paragraph, area);
    }
}

/// Each point's share of the total value, in row order. Non-positive
/// values get a zero share; a non-positive total zeroes everything.
pub fn slice_shares(points: &[DataPoint]) -> Vec<f64> {
    let total: f64 = points.iter().map(|p| p.value.max(0.0)).sum();
    if total <= 0.0 {
        return vec![0.0; points.len()];
    }
    points.iter().map(|p| p.value.max(0.0) / total).collect()
}

fn preview_block<'a>(title: &'a str, theme: &Theme, focused: bool) -> Block<'a> {
    let border_style = if focused {
        theme.focused_border_style()
    } else {
        theme.border_style()
    };
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border_style)
        .title_style(theme.title_style())
}

fn render_empty(frame: &mut Frame, area: Rect, title: &str, theme: &Theme, focused: bool) {
    let block = preview_block(title, theme, focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let message = Paragraph::new("No positive values to chart")
        .style(Style::default().add_modifier(Modifier::DIM))
        .alignment(ratatui::layout::Alignment::Center);
    frame.render_widget(message, inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(value: f64) -> DataPoint {
        DataPoint::new("p", value, "#fff")
    }

    #[test]
    fn test_slice_shares_sum_to_one() {
        let shares = slice_shares(&[point(42.0), point(35.0), point(18.0), point(5.0)]);
        let total: f64 = shares.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!((shares[0] - 0.42).abs() < 1e-9);
    }

    #[test]
    fn test_negative_values_get_zero_share() {
        let shares = slice_shares(&[point(-5.0), point(10.0)]);
        assert_eq!(shares[0], 0.0);
        assert_eq!(shares[1], 1.0);
    }

    #[test]
    fn test_zero_total_zeroes_all_shares() {
        let shares = slice_shares(&[point(0.0), point(-1.0)]);
        assert_eq!(shares, vec![0.0, 0.0]);
    }

    #[test]
    fn test_empty_points_give_empty_shares() {
        assert!(slice_shares(&[]).is_empty());
    }
}
