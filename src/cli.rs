//! Command-line interface parsing for City Forecast
//!
//! This module handles parsing of CLI arguments using clap. A city on the
//! command line runs a one-shot lookup; no city opens the interactive view.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::config::Config;
use crate::ui::theme::Theme;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified theme name is not recognized
    #[error("Invalid theme: '{0}'. Valid themes: light, dark")]
    InvalidTheme(String),

    /// A zero timeout would fail every request
    #[error("Invalid timeout: must be at least 1 second")]
    InvalidTimeout,
}

/// City Forecast - 7-day temperature forecast and activity suggestions
#[derive(Parser, Debug)]
#[command(name = "cityforecast")]
#[command(about = "Look up a city's 7-day forecast with activity suggestions")]
#[command(version)]
pub struct Cli {
    /// City to look up; omit to open the interactive view
    ///
    /// Examples:
    ///   cityforecast London
    ///   cityforecast new york --json
    #[arg(num_args = 0..)]
    pub city: Vec<String>,

    /// Print the forecast as JSON
    #[arg(long)]
    pub json: bool,

    /// Leave out the daily activity suggestions
    #[arg(long)]
    pub no_mood: bool,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Color theme for the interactive view (light, dark)
    #[arg(long, value_name = "THEME")]
    pub theme: Option<String>,

    /// Path to a config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub print_config: bool,
}

/// How the binary should run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Look up one city and print the result
    OneShot { city: String },
    /// Open the terminal UI
    Interactive,
    /// Print the effective configuration
    PrintConfig,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    pub mode: Mode,
    pub json: bool,
    pub show_mood: bool,
    pub theme: Option<Theme>,
    pub timeout_secs: Option<u64>,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Interactive,
            json: false,
            show_mood: true,
            theme: None,
            timeout_secs: None,
        }
    }
}

/// Parses a theme string argument into a Theme.
pub fn parse_theme_arg(s: &str) -> Result<Theme, CliError> {
    Theme::from_name(s).ok_or_else(|| CliError::InvalidTheme(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// City words are joined with single spaces; the resolver does the rest
    /// of the normalization, including rejecting a blank city.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let theme = cli.theme.as_deref().map(parse_theme_arg).transpose()?;
        if cli.timeout == Some(0) {
            return Err(CliError::InvalidTimeout);
        }

        let mode = if cli.print_config {
            Mode::PrintConfig
        } else if cli.city.is_empty() {
            Mode::Interactive
        } else {
            Mode::OneShot {
                city: cli.city.join(" "),
            }
        };

        Ok(StartupConfig {
            mode,
            json: cli.json,
            show_mood: !cli.no_mood,
            theme,
            timeout_secs: cli.timeout,
        })
    }

    /// Applies command-line overrides on top of the loaded config
    pub fn apply(&self, config: &mut Config) {
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = secs;
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
    }
}
