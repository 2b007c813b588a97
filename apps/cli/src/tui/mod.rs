//! Ratatui-based terminal UI for Diet Architect.
//!
//! The loop owns the [`RootComposer`] exclusively. Auth and generation calls
//! run as spawned tasks; their results come back over a channel and are
//! applied in arrival order between frames.

mod app;
mod components;
mod event;
pub mod theme;
mod ui;

pub use app::App;
pub use theme::ThemeMode;

use anyhow::Result;
use architect_core::RootComposer;
use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::time::Instant;
use std::{io, panic};
use tokio::sync::mpsc::error::TryRecvError;

/// Restore terminal to normal state.
/// Called on normal exit and on panic; errors are ignored because the
/// terminal may already be restored or only partially set up.
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
}

/// Install a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));
}

/// Run the TUI until the user quits.
pub async fn run(composer: RootComposer, theme_mode: ThemeMode) -> Result<()> {
    install_panic_hook();

    let result = run_with_terminal(composer, theme_mode).await;

    // Always restore, even if setup failed partway through.
    restore_terminal();

    result
}

async fn run_with_terminal(composer: RootComposer, theme_mode: ThemeMode) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(composer, theme_mode);
    app.start().await;
    let result = run_app(&mut terminal, &mut app).await;

    app.shutdown();
    result
}

/// Main application loop.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.composer.drain_auth_changes();

        loop {
            match app.results.try_recv() {
                Ok(result) => app.apply_task_result(result),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        app.tick(Instant::now());
        app.sync_focus();

        if app.is_busy() {
            app.advance_spinner();
        }

        terminal.draw(|f| ui::render(f, app))?;

        if event::handle_events(app)? {
            break;
        }
    }

    Ok(())
}
