//! Application state management for City Forecast
//!
//! This module contains the interactive view's state, handling keyboard
//! input and the state transitions driven by lookup results.

use std::sync::Arc;

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::Config;
use crate::data::{CityQuery, ForecastResult};
use crate::lookup::LookupMessage;
use crate::mood::{recommend, DayRecommendation};
use crate::ui::theme::Theme;

/// Application state enum representing the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Typing a city name
    Search,
    /// Waiting for the forecast of the given city
    Loading(String),
    /// Showing the latest forecast
    Forecast,
    /// The latest lookup failed with this message
    Error(String),
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Text in the search box
    pub input: String,
    /// Inline message under the search box (e.g. validation failure)
    pub input_message: Option<String>,
    /// Most recently resolved forecast
    pub forecast: Option<Arc<ForecastResult>>,
    /// Recommendations for `forecast`, one per day
    pub recommendations: Vec<DayRecommendation>,
    /// Highlighted day in the forecast view
    pub selected_day: usize,
    pub theme: Theme,
    /// Cities bound to the number keys
    pub quick_cities: Vec<String>,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// When the current forecast was received
    pub last_updated: Option<DateTime<Local>>,
    /// City the event loop should look up next
    pub pending_lookup: Option<String>,
    /// Key of the most recent request; older responses are ignored
    latest_request: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Creates a new App instance with default settings
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    /// Creates a new App instance using the theme and quick cities from `config`
    pub fn with_config(config: &Config) -> Self {
        Self {
            state: AppState::Search,
            input: String::new(),
            input_message: None,
            forecast: None,
            recommendations: Vec::new(),
            selected_day: 0,
            theme: config.theme,
            quick_cities: config.quick_cities.clone(),
            show_help: false,
            should_quit: false,
            last_updated: None,
            pending_lookup: None,
            latest_request: None,
        }
    }

    /// Takes the next city to look up, if any
    pub fn take_pending_lookup(&mut self) -> Option<String> {
        self.pending_lookup.take()
    }

    /// Requests a lookup for `city`
    ///
    /// A blank city shows the validation message and stays in search.
    pub fn submit(&mut self, city: &str) {
        match CityQuery::parse(city) {
            Ok(query) => {
                self.input_message = None;
                self.latest_request = Some(query.key().to_string());
                self.pending_lookup = Some(query.display().to_string());
                self.state = AppState::Loading(query.display().to_string());
            }
            Err(err) => {
                self.input_message = Some(err.to_string());
                self.state = AppState::Search;
            }
        }
    }

    /// Applies a message from the lookup worker
    ///
    /// Messages for anything but the most recent request are dropped.
    pub fn apply_lookup_message(&mut self, message: LookupMessage) {
        let is_latest = CityQuery::parse(message.city())
            .ok()
            .map(|q| Some(q.key().to_string()) == self.latest_request)
            .unwrap_or(false);
        if !is_latest {
            tracing::debug!(city = message.city(), "ignoring stale lookup message");
            return;
        }

        match message {
            LookupMessage::Started { .. } => {}
            LookupMessage::Resolved { forecast, .. } => {
                self.recommendations = recommend(&forecast);
                self.forecast = Some(forecast);
                self.selected_day = 0;
                self.last_updated = Some(Local::now());
                self.state = AppState::Forecast;
            }
            LookupMessage::Failed { error, .. } => {
                self.state = AppState::Error(error.to_string());
            }
        }
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - Search: type to edit, `Enter` submit, `Backspace` delete, `Esc` back
    /// - Forecast/Error: `/` or `s` search, `1`-`9` quick cities, `h`/`l` or
    ///   arrows select day, `t` toggle theme, `?` help, `q`/`Esc` quit
    /// - `Ctrl-C` quits from anywhere
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            self.should_quit = true;
            return;
        }

        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        match self.state {
            AppState::Search => match key_event.code {
                KeyCode::Enter => {
                    let city = self.input.clone();
                    self.submit(&city);
                }
                KeyCode::Backspace => {
                    self.input.pop();
                }
                KeyCode::Esc => {
                    if self.forecast.is_some() {
                        self.state = AppState::Forecast;
                    } else {
                        self.should_quit = true;
                    }
                }
                KeyCode::Char(c) => {
                    self.input.push(c);
                    self.input_message = None;
                }
                _ => {}
            },
            AppState::Loading(_) => match key_event.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
            AppState::Forecast | AppState::Error(_) => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Char('/') | KeyCode::Char('s') => {
                    self.start_search();
                }
                KeyCode::Char('t') => {
                    self.toggle_theme();
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                KeyCode::Char('h') | KeyCode::Left => {
                    self.select_previous_day();
                }
                KeyCode::Char('l') | KeyCode::Right => {
                    self.select_next_day();
                }
                KeyCode::Char(c @ '1'..='9') => {
                    let index = c as usize - '1' as usize;
                    self.select_quick_city(index);
                }
                _ => {}
            },
        }
    }

    /// Opens the search box with an empty input
    pub fn start_search(&mut self) {
        self.input.clear();
        self.input_message = None;
        self.state = AppState::Search;
    }

    /// Looks up the quick city at `index`, if one is configured
    pub fn select_quick_city(&mut self, index: usize) {
        if let Some(city) = self.quick_cities.get(index).cloned() {
            self.input = city.clone();
            self.submit(&city);
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    /// Number of days in the current forecast
    pub fn day_count(&self) -> usize {
        self.forecast.as_ref().map(|f| f.days.len()).unwrap_or(0)
    }

    /// Moves the day highlight left, wrapping to the last day
    fn select_previous_day(&mut self) {
        let count = self.day_count();
        if count == 0 {
            return;
        }
        if self.selected_day == 0 {
            self.selected_day = count - 1;
        } else {
            self.selected_day -= 1;
        }
    }

    /// Moves the day highlight right, wrapping to the first day
    fn select_next_day(&mut self) {
        let count = self.day_count();
        if count == 0 {
            return;
        }
        self.selected_day = (self.selected_day + 1) % count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DailyForecast, FetchError};
    use crate::resolver::ResolveError;

    /// Helper to create a KeyEvent for testing
    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key_event(KeyCode::Char(c)));
        }
    }

    fn sample_forecast(name: &str) -> Arc<ForecastResult> {
        Arc::new(ForecastResult {
            city_name: name.to_string(),
            country: None,
            latitude: 0.0,
            longitude: 0.0,
            timezone: None,
            days: (1..=7)
                .map(|d| DailyForecast {
                    date: format!("2024-07-{:02}", d),
                    max_temperature_c: 5.0 * d as f64,
                    min_temperature_c: None,
                })
                .collect(),
        })
    }

    fn resolved(city: &str, forecast: Arc<ForecastResult>) -> LookupMessage {
        LookupMessage::Resolved {
            city: city.to_string(),
            forecast,
        }
    }

    /// App showing a forecast for London
    fn app_with_forecast() -> App {
        let mut app = App::new();
        app.submit("London");
        app.take_pending_lookup();
        app.apply_lookup_message(resolved("London", sample_forecast("London")));
        app
    }

    #[test]
    fn test_initial_state_is_search() {
        let app = App::new();
        assert_eq!(app.state, AppState::Search);
        assert!(app.input.is_empty());
        assert!(app.forecast.is_none());
        assert!(!app.show_help);
        assert!(!app.should_quit);
        assert_eq!(app.quick_cities.len(), 5);
    }

    #[test]
    fn test_typing_and_backspace_edit_input() {
        let mut app = App::new();
        type_text(&mut app, "Pariss");
        app.handle_key(key_event(KeyCode::Backspace));
        assert_eq!(app.input, "Paris");
    }

    #[test]
    fn test_enter_submits_normalized_city() {
        let mut app = App::new();
        type_text(&mut app, "  new   York ");
        app.handle_key(key_event(KeyCode::Enter));

        assert_eq!(app.state, AppState::Loading("new York".to_string()));
        assert_eq!(app.take_pending_lookup().as_deref(), Some("new York"));
        assert!(app.take_pending_lookup().is_none());
    }

    #[test]
    fn test_enter_with_blank_input_shows_validation_without_lookup() {
        let mut app = App::new();
        type_text(&mut app, "   ");
        app.handle_key(key_event(KeyCode::Enter));

        assert_eq!(app.state, AppState::Search);
        assert_eq!(
            app.input_message.as_deref(),
            Some("Please enter a valid city name")
        );
        assert!(app.take_pending_lookup().is_none());
    }

    #[test]
    fn test_typing_clears_validation_message() {
        let mut app = App::new();
        app.handle_key(key_event(KeyCode::Enter));
        assert!(app.input_message.is_some());
        type_text(&mut app, "R");
        assert!(app.input_message.is_none());
    }

    #[test]
    fn test_resolved_message_shows_forecast() {
        let app = app_with_forecast();
        assert_eq!(app.state, AppState::Forecast);
        assert_eq!(app.forecast.as_ref().unwrap().city_name, "London");
        assert_eq!(app.recommendations.len(), 7);
        assert!(app.last_updated.is_some());
    }

    #[test]
    fn test_resolved_message_matches_case_insensitively() {
        let mut app = App::new();
        app.submit("LONDON");
        app.apply_lookup_message(resolved("london", sample_forecast("London")));
        assert_eq!(app.state, AppState::Forecast);
    }

    #[test]
    fn test_failed_message_shows_error() {
        let mut app = App::new();
        app.submit("Nowhereville");
        app.apply_lookup_message(LookupMessage::Failed {
            city: "Nowhereville".to_string(),
            error: ResolveError::NotFound {
                query: "Nowhereville".to_string(),
            },
        });
        match &app.state {
            AppState::Error(msg) => assert!(msg.contains("Nowhereville")),
            other => panic!("Expected Error state, got {:?}", other),
        }
    }

    #[test]
    fn test_stale_messages_are_ignored() {
        let mut app = App::new();
        app.submit("Paris");
        app.submit("Rome");

        app.apply_lookup_message(resolved("Paris", sample_forecast("Paris")));
        assert_eq!(app.state, AppState::Loading("Rome".to_string()));

        app.apply_lookup_message(LookupMessage::Failed {
            city: "Paris".to_string(),
            error: ResolveError::Upstream(FetchError::Timeout),
        });
        assert_eq!(app.state, AppState::Loading("Rome".to_string()));
    }

    #[test]
    fn test_started_message_keeps_loading() {
        let mut app = App::new();
        app.submit("Rome");
        app.apply_lookup_message(LookupMessage::Started {
            city: "Rome".to_string(),
        });
        assert_eq!(app.state, AppState::Loading("Rome".to_string()));
    }

    #[test]
    fn test_slash_and_s_start_new_search() {
        let mut app = app_with_forecast();
        app.handle_key(key_event(KeyCode::Char('/')));
        assert_eq!(app.state, AppState::Search);
        assert!(app.input.is_empty());

        let mut app = app_with_forecast();
        app.handle_key(key_event(KeyCode::Char('s')));
        assert_eq!(app.state, AppState::Search);
    }

    #[test]
    fn test_esc_in_search_returns_to_forecast() {
        let mut app = app_with_forecast();
        app.handle_key(key_event(KeyCode::Char('/')));
        app.handle_key(key_event(KeyCode::Esc));
        assert_eq!(app.state, AppState::Forecast);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_esc_in_search_without_forecast_quits() {
        let mut app = App::new();
        app.handle_key(key_event(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn test_number_keys_pick_quick_cities() {
        let mut app = app_with_forecast();
        app.handle_key(key_event(KeyCode::Char('2')));
        assert_eq!(app.state, AppState::Loading("Paris".to_string()));
        assert_eq!(app.take_pending_lookup().as_deref(), Some("Paris"));
    }

    #[test]
    fn test_number_key_without_quick_city_does_nothing() {
        let mut app = app_with_forecast();
        app.handle_key(key_event(KeyCode::Char('9')));
        assert_eq!(app.state, AppState::Forecast);
        assert!(app.take_pending_lookup().is_none());
    }

    #[test]
    fn test_number_keys_are_text_in_search() {
        let mut app = App::new();
        type_text(&mut app, "1");
        assert_eq!(app.input, "1");
        assert_eq!(app.state, AppState::Search);
    }

    #[test]
    fn test_t_toggles_theme() {
        let mut app = app_with_forecast();
        assert_eq!(app.theme, Theme::Light);
        app.handle_key(key_event(KeyCode::Char('t')));
        assert_eq!(app.theme, Theme::Dark);
        app.handle_key(key_event(KeyCode::Char('t')));
        assert_eq!(app.theme, Theme::Light);
    }

    #[test]
    fn test_t_in_search_is_text() {
        let mut app = App::new();
        type_text(&mut app, "t");
        assert_eq!(app.theme, Theme::Light);
        assert_eq!(app.input, "t");
    }

    #[test]
    fn test_day_selection_wraps() {
        let mut app = app_with_forecast();
        app.handle_key(key_event(KeyCode::Left));
        assert_eq!(app.selected_day, 6);
        app.handle_key(key_event(KeyCode::Char('l')));
        assert_eq!(app.selected_day, 0);
        app.handle_key(key_event(KeyCode::Right));
        assert_eq!(app.selected_day, 1);
        app.handle_key(key_event(KeyCode::Char('h')));
        assert_eq!(app.selected_day, 0);
    }

    #[test]
    fn test_help_overlay_intercepts_keys() {
        let mut app = app_with_forecast();
        app.handle_key(key_event(KeyCode::Char('?')));
        assert!(app.show_help);

        app.handle_key(key_event(KeyCode::Char('t')));
        assert_eq!(app.theme, Theme::Light);

        app.handle_key(key_event(KeyCode::Esc));
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_q_quits_from_forecast_and_error() {
        let mut app = app_with_forecast();
        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);

        let mut app = App::new();
        app.state = AppState::Error("boom".to_string());
        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_keys_ignored_during_loading() {
        let mut app = App::new();
        app.submit("Rome");
        app.handle_key(key_event(KeyCode::Char('t')));
        app.handle_key(key_event(KeyCode::Char('/')));
        assert_eq!(app.state, AppState::Loading("Rome".to_string()));
        assert_eq!(app.theme, Theme::Light);

        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_while_typing() {
        let mut app = App::new();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_with_config_uses_theme_and_quick_cities() {
        let config = Config {
            theme: Theme::Dark,
            quick_cities: vec!["Lima".to_string()],
            ..Default::default()
        };
        let app = App::with_config(&config);
        assert_eq!(app.theme, Theme::Dark);
        assert_eq!(app.quick_cities, vec!["Lima".to_string()]);
    }
}
