use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::{CrosstermBackend, Terminal};
use std::fs::{self, OpenOptions};
use std::io::{stdout, Stdout};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::{info, Level};
use tunpu_core::generation::{GeminiClient, TextGenerator};
use tunpu_core::settings::{default_log_path, LoggingSettings, Settings};
mod events;
mod ui;
use ui::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = match Settings::new() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Warning: Failed to load settings: {}. Using defaults.", e);
            Settings::default()
        }
    };
    settings.validate().context("invalid configuration")?;
    init_logging(&settings.logging)?;
    info!(
        model = %settings.generation.model,
        api_key = settings.has_api_key(),
        "starting tunpu"
    );

    let generator: Arc<dyn TextGenerator> = Arc::new(GeminiClient::new(&settings.generation)?);
    let mut terminal = init_terminal()?;
    let mut app = App::new(settings, generator);

    let result = app.run(&mut terminal).await;

    restore_terminal(&mut terminal)?;

    result
}

/// The terminal belongs to the UI, so logs go to a file.
fn init_logging(logging: &LoggingSettings) -> Result<()> {
    let path = logging.file.clone().unwrap_or_else(default_log_path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    let level = Level::from_str(&logging.level).unwrap_or(Level::INFO);

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .init();
    Ok(())
}

fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
