//! Forecast screen rendering
//!
//! Renders the resolved forecast for one city: today's maximum, a temperature
//! chart across the forecast window, and a per-day table with the mood for
//! each day.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::ForecastResult;
use crate::mood::DayRecommendation;
use crate::ui::theme::{temperature_color, Palette};
use crate::ui::widgets::TemperatureChart;

/// Columns per day in the chart
const CHART_BAR_WIDTH: u16 = 4;

/// Renders the forecast screen
///
/// Falls back to an empty message when no forecast has been resolved yet.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let palette = app.theme.palette();

    let Some(forecast) = app.forecast.as_deref() else {
        let empty = Paragraph::new(Span::styled(
            " No forecast loaded. Press / to search.",
            Style::default().fg(palette.muted),
        ));
        frame.render_widget(empty, area);
        return;
    };

    let main_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .title(Span::styled(
            format!(" {} ", forecast.display_name()),
            Style::default()
                .fg(palette.text)
                .add_modifier(Modifier::BOLD),
        ));
    let inner_area = main_block.inner(area);
    frame.render_widget(main_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Today + location
            Constraint::Length(3), // Chart
            Constraint::Min(3),    // Day table
            Constraint::Length(1), // Help bar
        ])
        .split(inner_area);

    render_today(frame, chunks[0], app, forecast, &palette);
    render_chart(frame, chunks[1], app, forecast, &palette);
    render_days(frame, chunks[2], app, forecast, &palette);
    render_help_bar(frame, chunks[3], &palette);
}

fn render_today(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    forecast: &ForecastResult,
    palette: &Palette,
) {
    let today = match forecast.today() {
        Some(day) => {
            let mut spans = vec![
                Span::styled(" Today  ", Style::default().fg(palette.muted)),
                Span::styled(
                    format!("{:.1}°C", day.max_temperature_c),
                    Style::default()
                        .fg(temperature_color(day.max_temperature_c))
                        .add_modifier(Modifier::BOLD),
                ),
            ];
            if let Some((low, high)) = forecast.temperature_range() {
                spans.push(Span::styled(
                    format!("   highs {:.1} to {:.1}°C", low, high),
                    Style::default().fg(palette.muted),
                ));
            }
            Line::from(spans)
        }
        None => Line::from(Span::styled(
            " No forecast days available.",
            Style::default().fg(palette.muted),
        )),
    };

    let mut location = format!(" {:.2}, {:.2}", forecast.latitude, forecast.longitude);
    if let Some(tz) = &forecast.timezone {
        location.push_str(&format!("  {}", tz));
    }
    if let Some(updated) = app.last_updated {
        location.push_str(&format!("  updated {}", updated.format("%H:%M")));
    }

    let lines = vec![
        today,
        Line::from(Span::styled(location, Style::default().fg(palette.muted))),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_chart(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    forecast: &ForecastResult,
    palette: &Palette,
) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(palette.muted))
        .title(" Daily max ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chart_area = Rect {
        x: inner.x + 1,
        width: inner.width.saturating_sub(1),
        ..inner
    };
    let values = forecast.max_series();
    frame.render_widget(
        TemperatureChart::new(&values)
            .bar_width(CHART_BAR_WIDTH)
            .highlight(app.selected_day)
            .style(Style::default().fg(palette.accent))
            .highlight_style(Style::default().fg(palette.highlight)),
        chart_area,
    );
}

fn render_days(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    forecast: &ForecastResult,
    palette: &Palette,
) {
    let mut lines = Vec::with_capacity(forecast.days.len() + 1);
    lines.push(Line::from(Span::styled(
        format!(" {:<2}{:<13}{:>8}{:>9}   {}", "", "Day", "Max", "Min", "Mood"),
        Style::default()
            .fg(palette.muted)
            .add_modifier(Modifier::BOLD),
    )));

    for (index, (day, rec)) in forecast
        .days
        .iter()
        .zip(app.recommendations.iter())
        .enumerate()
    {
        let selected = index == app.selected_day;
        let cursor = if selected { "\u{25B8} " } else { "  " }; // ▸
        let label_style = if selected {
            Style::default()
                .fg(palette.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.text)
        };
        let min = day
            .min_temperature_c
            .map(|t| format!("{:.1}°C", t))
            .unwrap_or_else(|| "--".to_string());

        lines.push(Line::from(vec![
            Span::styled(format!(" {}{:<13}", cursor, day.label()), label_style),
            Span::styled(
                format!("{:>6.1}°C", day.max_temperature_c),
                Style::default().fg(temperature_color(day.max_temperature_c)),
            ),
            Span::styled(format!("{:>9}", min), Style::default().fg(palette.muted)),
            Span::raw("   "),
            mood_span(rec, palette),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn mood_span(rec: &DayRecommendation, palette: &Palette) -> Span<'static> {
    Span::styled(rec.message(), Style::default().fg(palette.text))
}

fn render_help_bar(frame: &mut Frame, area: Rect, palette: &Palette) {
    let help_line = Line::from(vec![
        Span::styled("\u{2190}/h \u{2192}/l", Style::default().fg(palette.accent)),
        Span::styled(" Day  ", Style::default().fg(palette.muted)),
        Span::styled("/", Style::default().fg(palette.accent)),
        Span::styled(" Search  ", Style::default().fg(palette.muted)),
        Span::styled("1-9", Style::default().fg(palette.accent)),
        Span::styled(" Quick city  ", Style::default().fg(palette.muted)),
        Span::styled("t", Style::default().fg(palette.accent)),
        Span::styled(" Theme  ", Style::default().fg(palette.muted)),
        Span::styled("?", Style::default().fg(palette.accent)),
        Span::styled(" Help  ", Style::default().fg(palette.muted)),
        Span::styled("q", Style::default().fg(palette.accent)),
        Span::styled(" Quit", Style::default().fg(palette.muted)),
    ]);

    frame.render_widget(Paragraph::new(help_line), area);
}
