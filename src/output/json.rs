//! JSON output formatting for focusdot.

use serde::Serialize;
use serde_json::json;

use crate::error::FocusError;
use crate::features::focus::SessionSnapshot;

/// Format a session summary as JSON.
///
/// Carries the raw snapshot plus the display strings shown in the UI.
///
/// # Errors
///
/// Returns `FocusError::Parse` if JSON serialization fails.
pub fn format_summary_json(snapshot: &SessionSnapshot) -> Result<String, FocusError> {
    let output = json!({
        "state": snapshot.state,
        "total_elapsed_ms": snapshot.total_elapsed_ms,
        "focus_elapsed_ms": snapshot.focus_elapsed_ms,
        "distracted_ms": snapshot.distracted_ms(),
        "accuracy_percent": snapshot.accuracy_percent,
        "started_at": snapshot.started_at,
        "display": {
            "total": snapshot.format_total(),
            "focus": snapshot.format_focus(),
            "accuracy": format!("{}%", snapshot.accuracy_percent),
        }
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Serialize any value as pretty JSON.
///
/// # Errors
///
/// Returns `FocusError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, FocusError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::focus::SessionState;

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            state: SessionState::Idle,
            total_elapsed_ms: 10_000,
            focus_elapsed_ms: 4_000,
            accuracy_percent: 40,
            is_following: false,
            is_running: false,
            started_at: None,
        }
    }

    #[test]
    fn test_summary_json_fields() {
        let result = format_summary_json(&snapshot()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&result).unwrap();

        assert_eq!(value["state"], "idle");
        assert_eq!(value["total_elapsed_ms"], 10_000);
        assert_eq!(value["focus_elapsed_ms"], 4_000);
        assert_eq!(value["distracted_ms"], 6_000);
        assert_eq!(value["accuracy_percent"], 40);
        assert!(value["started_at"].is_null());
        assert_eq!(value["display"]["total"], "00:10");
        assert_eq!(value["display"]["focus"], "4s");
        assert_eq!(value["display"]["accuracy"], "40%");
    }

    #[test]
    fn test_to_json_generic() {
        let result = to_json(&snapshot()).unwrap();
        assert!(result.contains("\"accuracy_percent\": 40"));
        assert!(result.contains("\"is_running\": false"));
    }
}
