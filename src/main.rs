mod app;
mod client;
mod config;
mod date;
mod day_view;
mod grid;
mod input;
mod preference;
mod state;
mod tabs;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing_subscriber::{fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt};

use app::{App, Effect, Message};
use client::{DayProvider, HttpProvider};
use config::Config;
use preference::{FileStore, MemoryStore, PreferenceStore, ThemePreference};

#[derive(Parser, Debug)]
#[command(name = "dcal")]
#[command(about = "TUI calendar dashboard with daily schedule and notes")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(long, default_value = "~/.config/darkwall-cal/config.toml")]
    config: String,

    /// Day-data provider base URL (overrides provider.base_url)
    #[arg(long)]
    base_url: Option<String>,

    /// Log file (default: dcal.log in the user data dir)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging. The dashboard owns the terminal, so logs go to a file.
    let log_path = cli.log_file.clone().unwrap_or_else(config::default_log_path);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "darkwall_cal=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(log_writer(&log_path))
                .with_ansi(false),
        )
        .init();

    // Load config
    let mut config = Config::load(&cli.config)?;
    if let Some(base_url) = cli.base_url {
        config.provider.base_url = base_url;
    }

    let provider: Arc<dyn DayProvider> = Arc::new(HttpProvider::new(&config.provider)?);
    let theme = ThemePreference::load(open_store(&config));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new(config, theme, date::today());

    // Run main loop
    let result = run_app(&mut terminal, &mut app, provider).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

/// Append to `path`; logs are dropped if it cannot be opened
fn log_writer(path: &Path) -> BoxMakeWriter {
    let opened = path
        .parent()
        .map_or(Ok(()), std::fs::create_dir_all)
        .and_then(|()| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
        });

    match opened {
        Ok(file) => BoxMakeWriter::new(std::sync::Mutex::new(file)),
        Err(e) => {
            // Still on the normal screen here
            eprintln!("dcal: cannot open log file {}: {}", path.display(), e);
            BoxMakeWriter::new(io::sink)
        }
    }
}

/// Preferences file, or a session-only store if it cannot be read
fn open_store(config: &Config) -> Box<dyn PreferenceStore> {
    let path = config.storage.preferences_path();
    match FileStore::open(path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!("Theme preference will not persist: {:#}", e);
            Box::new(MemoryStore::default())
        }
    }
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    provider: Arc<dyn DayProvider>,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    dispatch(app.start(), &provider, &tx);

    loop {
        let size = terminal.size()?;
        let layout = ui::DashboardLayout::compute(Rect::new(0, 0, size.width, size.height));
        app.set_panel_height(usize::from(layout.panel_body.height));

        terminal.draw(|f| ui::draw(f, app))?;

        // Provider results
        while let Ok(msg) = rx.try_recv() {
            let effects = app.update(msg);
            dispatch(effects, &provider, &tx);
        }

        if event::poll(Duration::from_millis(50))? {
            let msg = match event::read()? {
                Event::Key(key) => input::key_message(app, key),
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    let area = Rect::new(0, 0, size.width, size.height);
                    input::mouse_message(app, area, mouse)
                }
                _ => None,
            };

            if let Some(msg) = msg {
                let effects = app.update(msg);
                dispatch(effects, &provider, &tx);
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}

/// Run provider effects in the background; results come back as messages
fn dispatch(effects: Vec<Effect>, provider: &Arc<dyn DayProvider>, tx: &UnboundedSender<Message>) {
    for effect in effects {
        let provider = Arc::clone(provider);
        let tx = tx.clone();
        match effect {
            Effect::FetchDay(tag) => {
                tokio::spawn(async move {
                    let result = provider.fetch_day(&tag.key).await;
                    // Receiver only goes away on quit
                    let _ = tx.send(Message::DayLoaded { tag, result });
                });
            }
            Effect::SubmitNote { key, text } => {
                tokio::spawn(async move {
                    let result = provider.submit_note(&key, &text).await;
                    let _ = tx.send(Message::NoteSubmitted { key, result });
                });
            }
        }
    }
}
