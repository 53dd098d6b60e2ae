//! Search screen rendering
//!
//! Shows the city input box, the loading or error status of the latest
//! lookup, and the quick-pick cities.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, AppState};
use crate::ui::theme::Palette;

/// Renders the search screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let palette = app.theme.palette();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(3), // Input box
            Constraint::Length(3), // Status
            Constraint::Min(3),    // Quick cities
            Constraint::Length(1), // Help bar
        ])
        .split(area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            " City Forecast",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  ({} theme)", app.theme.name()),
            Style::default().fg(palette.muted),
        ),
    ]));
    frame.render_widget(title, chunks[0]);

    render_input(frame, chunks[1], app, &palette);
    render_status(frame, chunks[2], app, &palette);
    render_quick_cities(frame, chunks[3], app, &palette);
    render_help_bar(frame, chunks[4], app, &palette);
}

fn render_input(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let editing = app.state == AppState::Search;
    let border = if editing { palette.accent } else { palette.muted };
    let cursor = if editing { "\u{258F}" } else { "" }; // ▏

    let input = Paragraph::new(Line::from(vec![
        Span::styled(app.input.clone(), Style::default().fg(palette.text)),
        Span::styled(cursor, Style::default().fg(palette.accent)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" City "),
    );
    frame.render_widget(input, area);
}

fn render_status(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let line = match &app.state {
        AppState::Loading(city) => Line::from(Span::styled(
            format!(" Loading forecast for {}...", city),
            Style::default().fg(palette.highlight),
        )),
        AppState::Error(message) => Line::from(Span::styled(
            format!(" {}", message),
            Style::default().fg(palette.error),
        )),
        _ => match &app.input_message {
            Some(message) => Line::from(Span::styled(
                format!(" {}", message),
                Style::default().fg(palette.error),
            )),
            None => Line::from(Span::styled(
                " Type a city name and press Enter",
                Style::default().fg(palette.muted),
            )),
        },
    };

    frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: false }), area);
}

fn render_quick_cities(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let mut lines = vec![Line::from(Span::styled(
        " Quick cities",
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    for (i, city) in app.quick_cities.iter().take(9).enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", i + 1), Style::default().fg(palette.accent)),
            Span::styled(city.clone(), Style::default().fg(palette.text)),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_help_bar(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let keys: &[(&str, &str)] = match app.state {
        AppState::Search => &[("Enter", " Search  "), ("Esc", " Back  "), ("Ctrl-C", " Quit")],
        AppState::Loading(_) => &[("?", " Help  "), ("q", " Quit")],
        _ => &[
            ("/", " Search  "),
            ("1-9", " Quick city  "),
            ("t", " Theme  "),
            ("?", " Help  "),
            ("q", " Quit"),
        ],
    };

    let spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, label)| {
            [
                Span::styled(*key, Style::default().fg(palette.accent)),
                Span::styled(*label, Style::default().fg(palette.muted)),
            ]
        })
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &App) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_search_shows_input_and_quick_cities() {
        let mut app = App::new();
        app.input = "Lisbon".to_string();
        let content = draw(&app);

        assert!(content.contains("Lisbon"));
        assert!(content.contains("Quick cities"));
        assert!(content.contains("Tokyo"));
    }

    #[test]
    fn test_search_shows_validation_message() {
        let mut app = App::new();
        app.submit("   ");
        let content = draw(&app);
        assert!(content.contains("Please enter a valid city name"));
    }

    #[test]
    fn test_loading_and_error_status() {
        let mut app = App::new();
        app.submit("Rome");
        assert!(draw(&app).contains("Loading forecast for Rome"));

        app.state = AppState::Error("Failed to fetch weather data".to_string());
        assert!(draw(&app).contains("Failed to fetch weather data"));
    }
}
