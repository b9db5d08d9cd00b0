mod app;
mod config;
mod error;
mod event;
mod input;
mod scores;
mod sim;
mod ui;

use std::fs::File;
use std::io;

use anyhow::Context;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use app::App;
use config::Config;
use event::{Event, EventHandler};
use scores::HighScoreFile;
use sim::GameSession;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

fn init_logging(config: &Config) -> anyhow::Result<()> {
    let file = File::create(&config.log_file)
        .with_context(|| format!("cannot create log file {}", config.log_file.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let config_path = Config::default_path();
    let config = Config::load(&config_path)?;
    init_logging(&config)?;
    log::info!("config from {}: {:?}", config_path.display(), config);

    // A missing or corrupt high-score file stops us before the terminal is touched
    let store = HighScoreFile::load(&config.high_score_path)?;
    log::debug!("high score file at {}", store.path().display());

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let release_events = supports_keyboard_enhancement().unwrap_or(false);
    if release_events {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    log::info!("key release events: {}", release_events);
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(GameSession::new(store, rng), release_events);
    let result = run(&mut terminal, &mut app, config.tick_rate_ms);

    // Restore terminal even when the loop failed
    if release_events {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        log::error!("game loop failed: {:#}", err);
    }
    log::info!("exiting, high score {}", app.session.high_score());
    result
}

fn run(terminal: &mut Tui, app: &mut App, tick_rate_ms: u64) -> anyhow::Result<()> {
    let event_handler = EventHandler::new(tick_rate_ms);

    loop {
        terminal
            .draw(|frame| ui::render(frame, app))
            .context("drawing frame")?;

        match event_handler.next()? {
            Event::Tick => app.on_tick(),
            Event::Key(key) => app.on_key(key),
            Event::Mouse(mouse) => app.on_mouse(mouse),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
