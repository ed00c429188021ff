//! UI rendering for the TUI.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::features::focus::{Clock, SessionState};
use crate::tui::app::App;

const DOT: &str = "●";
const GAZE_MARK: &str = "+";

/// Render the application UI.
///
/// Also resizes the app's field to the space left for the dot.
pub fn render<C: Clock>(frame: &mut Frame<'_>, app: &mut App<C>) {
    // Create layout: header, field, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(3),    // Field
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_field(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);
}

/// Render timer, focus time and accuracy.
fn render_header<C: Clock>(frame: &mut Frame<'_>, app: &App<C>, area: Rect) {
    let snap = app.snapshot();
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let state_color = match snap.state {
        SessionState::Idle => Color::DarkGray,
        SessionState::RunningNotFollowing => Color::Yellow,
        SessionState::RunningFollowing => Color::Green,
    };
    let line = Line::from(vec![
        Span::styled(
            snap.format_total(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  Focus "),
        Span::styled(snap.format_focus(), Style::default().fg(Color::Green)),
        Span::raw("  "),
        Span::styled(snap.state.to_string(), Style::default().fg(state_color)),
    ]);
    let timer = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" focusdot "),
    );
    frame.render_widget(timer, halves[0]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Accuracy "))
        .gauge_style(Style::default().fg(Color::Green))
        .percent(u16::from(snap.accuracy_percent));
    frame.render_widget(gauge, halves[1]);
}

/// Render the field with the dot and the gaze marker.
fn render_field<C: Clock>(frame: &mut Frame<'_>, app: &mut App<C>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    app.set_field(inner);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let target = app.target();
    let (col, row) = app.pixel_to_cell(target.center_x, target.center_y);
    let dot_style = if app.snapshot().is_following {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Red)
    };
    frame.buffer_mut().set_string(col, row, DOT, dot_style);

    if let Some((x, y)) = app.last_gaze_point() {
        let (col, row) = app.pixel_to_cell(x, y);
        frame
            .buffer_mut()
            .set_string(col, row, GAZE_MARK, Style::default().fg(Color::Magenta));
    }
}

/// Render the status bar.
fn render_status_bar<C: Clock>(frame: &mut Frame<'_>, app: &App<C>, area: Rect) {
    let input = if app.is_gaze_enabled() {
        "gaze"
    } else if app.is_pressed() {
        "mouse (held)"
    } else {
        "mouse"
    };
    let tone = if app.is_music_playing() {
        format!("tone {}% {}", app.volume_percent(), level_meter(app.audio_level))
    } else {
        "tone off".to_string()
    };

    let mut text = format!("[{input}] [{tone}]");
    if let Some(status) = app.status.as_deref() {
        text.push_str("  ");
        text.push_str(status);
    }

    let status = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(status, area);
}

/// Five-step bar for an audio peak level.
fn level_meter(level: f32) -> String {
    // Ambient peaks sit around 0.06, so scale up before bucketing.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let steps = ((level * 50.0).clamp(0.0, 5.0)).round() as usize;
    format!("{}{}", "▮".repeat(steps), "▯".repeat(5 - steps))
}
