//! Temperature sparkline widget for the daily forecast

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Block characters for different temperature levels (8 levels)
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Maps a value to a block, normalised to the `min..max` range.
/// A flat series renders at mid height.
fn value_to_block(value: f64, min: f64, max: f64) -> char {
    let span = max - min;
    if span <= f64::EPSILON {
        return BLOCKS[3];
    }
    let normalized = ((value - min) / span).clamp(0.0, 1.0);
    let index = ((normalized * 7.0).round() as usize).min(7);
    BLOCKS[index]
}

fn series_range(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        })
}

/// Renders the series as a plain string of block characters
pub fn sparkline_text(values: &[f64]) -> String {
    let (min, max) = series_range(values);
    values.iter().map(|v| value_to_block(*v, min, max)).collect()
}

/// A sparkline widget showing daily temperatures, one column group per day
pub struct TemperatureChart<'a> {
    /// Daily temperatures
    values: &'a [f64],
    /// Columns per day
    bar_width: u16,
    /// Highlighted day (index into values)
    highlight: Option<usize>,
    style: Style,
    highlight_style: Style,
}

impl<'a> TemperatureChart<'a> {
    pub fn new(values: &'a [f64]) -> Self {
        Self {
            values,
            bar_width: 1,
            highlight: None,
            style: Style::default().fg(Color::Cyan),
            highlight_style: Style::default().fg(Color::Yellow),
        }
    }

    pub fn bar_width(mut self, width: u16) -> Self {
        self.bar_width = width.max(1);
        self
    }

    pub fn highlight(mut self, index: usize) -> Self {
        self.highlight = Some(index);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn highlight_style(mut self, style: Style) -> Self {
        self.highlight_style = style;
        self
    }
}

impl<'a> Widget for TemperatureChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 || self.values.is_empty() {
            return;
        }

        let (min, max) = series_range(self.values);
        let bar_width = self.bar_width as usize;
        let days_visible = (area.width as usize / bar_width).min(self.values.len());

        for (i, value) in self.values.iter().take(days_visible).enumerate() {
            let block = value_to_block(*value, min, max);
            let style = if self.highlight == Some(i) {
                self.highlight_style
            } else {
                self.style
            };

            for col in 0..bar_width.saturating_sub(1).max(1) {
                let x = area.x + (i * bar_width + col) as u16;
                if let Some(cell) = buf.cell_mut((x, area.y)) {
                    cell.set_char(block).set_style(style);
                }
            }
        }
    }
}
