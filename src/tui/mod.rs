//! Terminal User Interface (TUI) for focusdot.
//!
//! Draws the moving dot, the session timer and accuracy, and turns mouse
//! input into pointer samples. Built with ratatui and crossterm.

mod app;
mod event;
mod ui;

pub use app::{dot_position, App, TuiOptions};

use std::io;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use crate::error::FocusError;
use crate::features::focus::{Clock, SessionSnapshot};

/// Run the TUI application.
///
/// Returns the final session numbers once the user quits.
///
/// # Errors
///
/// Returns an error if the TUI fails to initialize or run.
pub fn run(options: TuiOptions) -> Result<SessionSnapshot, FocusError> {
    // Setup terminal
    enable_raw_mode()
        .map_err(|e| FocusError::Terminal(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .map_err(|e| FocusError::Terminal(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| FocusError::Terminal(format!("Failed to create terminal: {e}")))?;

    // Create app state and run main loop
    let mut app = App::new(options);
    let result = run_app(&mut terminal, &mut app);
    let snapshot = app.finish();

    // Restore terminal
    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    result.map(|()| snapshot)
}

/// Run the main application loop.
fn run_app<B: Backend, C: Clock>(
    terminal: &mut Terminal<B>,
    app: &mut App<C>,
) -> Result<(), FocusError> {
    while !app.should_quit {
        app.tick();

        terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| FocusError::Terminal(format!("Failed to draw: {e}")))?;

        if let Some(event::Action::Quit) = event::handle_events(app)? {
            app.should_quit = true;
        }
    }

    Ok(())
}
