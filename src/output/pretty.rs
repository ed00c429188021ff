use colored::Colorize;

use crate::features::focus::{format_focus_time, render_accuracy_bar, SessionSnapshot};

/// Width of the accuracy bar in the summary.
const BAR_WIDTH: usize = 30;

/// Format a session summary for the terminal.
pub fn format_summary_pretty(snapshot: &SessionSnapshot) -> String {
    let mut output = format!("{}\n", "Focus session".bold());
    output.push_str(&"─".repeat(40));
    output.push('\n');

    if let Some(started) = snapshot.started_at_local() {
        output.push_str(&format!(
            "  {}: {}\n",
            "Started".dimmed(),
            started.format("%Y-%m-%d %H:%M:%S")
        ));
    }

    output.push_str(&format!(
        "  {}: {}\n",
        "Total".dimmed(),
        snapshot.format_total().cyan()
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Focus".dimmed(),
        snapshot.format_focus().green()
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Distracted".dimmed(),
        format_focus_time(snapshot.distracted_ms()).yellow()
    ));

    let percent = format!("{}%", snapshot.accuracy_percent);
    let percent = match snapshot.accuracy_percent {
        80..=100 => percent.green().bold(),
        50..=79 => percent.yellow().bold(),
        _ => percent.red().bold(),
    };
    output.push_str(&format!(
        "  {}: {} {}\n",
        "Accuracy".dimmed(),
        render_accuracy_bar(snapshot.accuracy_percent, BAR_WIDTH),
        percent
    ));

    if snapshot.total_elapsed_ms == 0 {
        output.push_str(&format!("\n  {}\n", "Session was never started".dimmed()));
    }

    output
}
