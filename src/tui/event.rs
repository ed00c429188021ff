//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

use crate::error::FocusError;
use crate::features::focus::Clock;
use crate::tui::app::App;

/// How long to wait for input before redrawing.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

const HELP: &str =
    "s:start | x:stop | r:reset | g:gaze | m:tone | +/-:volume | hold mouse on the dot | q:quit";

/// Action to take after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
}

/// Wait briefly for a terminal event and apply it to the app.
///
/// Returns an action to take, or None if no action is needed.
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn handle_events<C: Clock>(app: &mut App<C>) -> Result<Option<Action>, FocusError> {
    if !event::poll(POLL_INTERVAL)
        .map_err(|e| FocusError::Terminal(format!("Event poll failed: {e}")))?
    {
        return Ok(None);
    }

    let event =
        event::read().map_err(|e| FocusError::Terminal(format!("Event read failed: {e}")))?;
    Ok(apply_event(app, event))
}

/// Apply one terminal event.
pub fn apply_event<C: Clock>(app: &mut App<C>, event: Event) -> Option<Action> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Mouse(mouse) => {
            handle_mouse(app, mouse);
            None
        }
        _ => None,
    }
}

fn handle_key<C: Clock>(app: &mut App<C>, key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(Action::Quit),
        KeyCode::Char('s') => app.start(),
        KeyCode::Char('x') => app.stop(),
        KeyCode::Char('r') => app.reset(),
        KeyCode::Char('g') => app.toggle_gaze(),
        KeyCode::Char('m') => app.toggle_music(),
        KeyCode::Char('+' | '=') => app.volume_up(),
        KeyCode::Char('-') => app.volume_down(),
        KeyCode::Char('?') => app.status = Some(HELP.to_string()),
        _ => {}
    }
    None
}

fn handle_mouse<C: Clock>(app: &mut App<C>, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => app.mouse_down(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
            app.mouse_move(mouse.column, mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => app.mouse_up(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DotConfig, DotMotion};
    use crate::features::focus::{ManualClock, SessionState};
    use crate::tui::app::TuiOptions;
    use crossterm::event::KeyEventState;
    use ratatui::layout::Rect;

    fn app(clock: &ManualClock) -> App<ManualClock> {
        let options = TuiOptions {
            dot: DotConfig {
                motion: DotMotion::Fixed,
                ..DotConfig::default()
            },
            ..TuiOptions::default()
        };
        let mut app = App::with_clock(clock.clone(), options);
        app.set_field(Rect::new(0, 0, 80, 20));
        app
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_quit_keys() {
        let clock = ManualClock::new();
        let mut app = app(&clock);
        assert_eq!(apply_event(&mut app, key(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(apply_event(&mut app, key(KeyCode::Esc)), Some(Action::Quit));

        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(apply_event(&mut app, ctrl_c), Some(Action::Quit));
    }

    #[test]
    fn test_start_stop_keys() {
        let clock = ManualClock::new();
        let mut app = app(&clock);

        apply_event(&mut app, key(KeyCode::Char('s')));
        assert!(app.snapshot().is_running);

        apply_event(&mut app, key(KeyCode::Char('x')));
        assert!(!app.snapshot().is_running);
    }

    #[test]
    fn test_drag_onto_dot() {
        let clock = ManualClock::new();
        let mut app = app(&clock);
        apply_event(&mut app, key(KeyCode::Char('s')));

        apply_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 1, 1));
        assert_eq!(app.snapshot().state, SessionState::RunningNotFollowing);

        // Field is 640x320px, dot at (320, 160): cell (40, 10).
        apply_event(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), 40, 10));
        assert_eq!(app.snapshot().state, SessionState::RunningFollowing);

        apply_event(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 40, 10));
        assert_eq!(app.snapshot().state, SessionState::RunningNotFollowing);
    }

    #[test]
    fn test_hover_ignored_without_press() {
        let clock = ManualClock::new();
        let mut app = app(&clock);
        apply_event(&mut app, key(KeyCode::Char('s')));

        apply_event(&mut app, mouse(MouseEventKind::Moved, 40, 10));
        assert_eq!(app.snapshot().state, SessionState::RunningNotFollowing);
    }

    #[test]
    fn test_help_key() {
        let clock = ManualClock::new();
        let mut app = app(&clock);
        apply_event(&mut app, key(KeyCode::Char('?')));
        assert_eq!(app.status.as_deref(), Some(HELP));
    }
}
