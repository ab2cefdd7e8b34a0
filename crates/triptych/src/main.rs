mod app;
mod compositor;
mod config;
mod editor;
mod exporter;
mod highlight;
mod sandbox;
mod ui;
mod ui_state;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::LevelFilter;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{io, time::Duration, time::Instant};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger with debug fallback for development
    let mut logger = env_logger::Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        logger.filter_level(LevelFilter::Info);
        logger.filter_module("triptych", LevelFilter::Debug);
    }
    logger.init();

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    // Setup terminal
    if let Err(e) = enable_raw_mode() {
        eprintln!("Failed to initialize the terminal: {}", e);
        return Err(e.into());
    }
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
        let _ = disable_raw_mode();
        eprintln!("Failed to configure the terminal: {}", e);
        return Err(e.into());
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = match app::App::new().await {
        Ok(app) => {
            log::info!("Application initialized successfully");
            app
        }
        Err(e) => {
            restore_terminal()?;
            eprintln!("Failed to initialize the application: {}", e);
            if let Some(source) = e.source() {
                eprintln!("Details: {}", source);
            }
            return Err(e);
        }
    };

    let res = run_app(&mut terminal, app).await;

    // Restore terminal
    restore_terminal()?;

    if let Err(err) = res {
        eprintln!("Error while running the application: {}", err);
        if let Some(source) = err.source() {
            eprintln!("Caused by: {}", source);
        }
        log::error!("Application error: {}", err);
        return Err(err);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: app::App) -> Result<()> {
    loop {
        if let Err(e) = terminal.draw(|f| ui::draw(f, &mut app)) {
            log::error!("Terminal draw error: {}", e);
            // Continue running despite draw errors
        }

        // Expire stale status messages and fire any due debounced render.
        app.update_status();
        if let Err(e) = app.tick(Instant::now()).await {
            log::error!("Preview render error: {}", e);
            app.ui_state.set_error(format!("Render failed: {}", e));
        }

        if app.should_quit() {
            log::info!("Application shutdown requested");
            break;
        }

        // The poll timeout is the loop tick; it bounds how late after its
        // deadline a debounced render can fire.
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if let Err(e) = handle_key_event_safe(key, &mut app).await {
                        log::error!("Key event handling error: {}", e);
                        app.ui_state.set_error(format!("Key handling error: {}", e));
                    }
                }
                Event::Resize(_, _) => {
                    // Handled implicitly through next draw
                }
                Event::Mouse(_) => {
                    // Ignore mouse events for now
                }
                _ => {}
            }
        }
    }

    app.sandbox.cleanup().await;
    log::info!("Application loop ended successfully");
    Ok(())
}

async fn handle_key_event_safe(key: crossterm::event::KeyEvent, app: &mut app::App) -> Result<()> {
    // Quit shortcuts work from any mode.
    if key.modifiers.contains(event::KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
    {
        log::info!("Exit requested");
        app.quit();
        return Ok(());
    }

    app.handle_key_event(key).await
}

/// Restore terminal to normal state
fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen, DisableMouseCapture)?;
    // Attempt to show cursor, but don't fail if it errors
    let _ = execute!(stdout, crossterm::cursor::Show);
    Ok(())
}
