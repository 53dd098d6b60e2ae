//! UI rendering module for City Forecast
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod forecast_view;
pub mod help_overlay;
pub mod search;
pub mod theme;
pub mod widgets;

use ratatui::{style::Style, widgets::Block, Frame};

use crate::app::{App, AppState};

pub use forecast_view::render as render_forecast;
pub use help_overlay::render as render_help_overlay;
pub use search::render as render_search;

/// Renders the current view, with the help overlay on top when open
pub fn render(frame: &mut Frame, app: &App) {
    let palette = app.theme.palette();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.text)),
        frame.area(),
    );

    match &app.state {
        AppState::Search | AppState::Loading(_) | AppState::Error(_) => {
            render_search(frame, app)
        }
        AppState::Forecast => render_forecast(frame, app),
    }

    if app.show_help {
        render_help_overlay(frame, app.theme);
    }
}
