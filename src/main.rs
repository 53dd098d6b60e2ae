//! City Forecast - Look up a city's daily forecast from the terminal
//!
//! With a city argument the forecast is printed once; without one a terminal
//! UI opens for repeated searches.

use std::error::Error;
use std::io;
use std::panic;
use std::process;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use cityforecast::app::App;
use cityforecast::cli::{Cli, Mode, StartupConfig};
use cityforecast::config::{Config, Logging};
use cityforecast::data::{HttpJsonFetcher, ReqwestFetcher};
use cityforecast::lookup::{try_recv, LookupHandle};
use cityforecast::report::{format_forecast, JsonReport};
use cityforecast::resolver::{ForecastResolver, ResolveError};
use cityforecast::ui;

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Initialize logging with path and level configuration
///
/// The terminal UI owns stdout and stderr, so it only logs when a file is set.
fn init_logging(logging: &Logging, interactive: bool) -> io::Result<()> {
    use tracing_subscriber::EnvFilter;

    if !logging.enable {
        return Ok(());
    }

    let level = match logging.level.to_uppercase().as_str() {
        "TRACE" => "trace",
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARN" => "warn",
        "ERROR" => "error",
        _ => "warn",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if let Some(path) = logging.path.as_deref().filter(|p| !p.is_empty()) {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
        return Ok(());
    }

    if !interactive {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }

    Ok(())
}

/// Exit status for a failed lookup: bad input vs. upstream trouble
fn exit_code(err: &ResolveError) -> i32 {
    if err.is_retryable() {
        1
    } else {
        2
    }
}

/// Resolves one city and prints the forecast, returning the exit status
async fn run_once(
    resolver: &ForecastResolver,
    city: &str,
    startup: &StartupConfig,
) -> Result<i32, Box<dyn Error>> {
    match resolver.resolve(city).await {
        Ok(forecast) => {
            if startup.json {
                let report = JsonReport::new(&forecast, startup.show_mood);
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", format_forecast(&forecast, startup.show_mood));
            }
            Ok(0)
        }
        Err(err) => {
            eprintln!("{}", err);
            Ok(exit_code(&err))
        }
    }
}

/// Runs the terminal UI until the user quits
async fn run_tui(resolver: ForecastResolver, config: &Config) -> Result<(), Box<dyn Error>> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::with_config(config);
    let mut lookups = LookupHandle::new(resolver);

    let result = run_event_loop(&mut terminal, &mut app, &mut lookups);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    lookups: &mut LookupHandle,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        if let Some(city) = app.take_pending_lookup() {
            lookups.request(city);
        }

        while let Some(message) = try_recv(lookups) {
            app.apply_lookup_message(message);
        }

        // Check if we should quit
        if app.should_quit {
            return Ok(());
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let startup = match StartupConfig::from_cli(&cli) {
        Ok(startup) => startup,
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(2);
        }
    };

    let mut config = Config::load(cli.config.as_deref())?;
    startup.apply(&mut config);
    config.validate()?;

    let city = match &startup.mode {
        Mode::PrintConfig => {
            print!("{}", config.to_toml()?);
            return Ok(());
        }
        Mode::OneShot { city } => Some(city.clone()),
        Mode::Interactive => None,
    };

    init_logging(&config.logging, city.is_none())?;
    tracing::debug!(?config, "starting");

    let fetcher: Arc<dyn HttpJsonFetcher> = Arc::new(ReqwestFetcher::new(config.timeout())?);
    let resolver = ForecastResolver::with_requests(
        fetcher,
        config.geocoding_request(),
        config.forecast_request(),
    );

    match city {
        Some(city) => {
            let code = run_once(&resolver, &city, &startup).await?;
            if code != 0 {
                process::exit(code);
            }
            Ok(())
        }
        None => run_tui(resolver, &config).await,
    }
}
