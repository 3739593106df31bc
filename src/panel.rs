//! Side panel text
//!
//! Pure formatting of a controller snapshot; the DOM writes live in `main.rs`.

use chrono::NaiveTime;

use crate::session::{Session, Snapshot};

/// Time of day as shown to the player, e.g. `3:04:05 PM`
pub fn format_time(time: NaiveTime) -> String {
    time.format("%-I:%M:%S %p").to_string()
}

/// One history list line
pub fn history_line(session: &Session) -> String {
    format!(
        "Session {}: {} - {}",
        session.id,
        format_time(session.started_at),
        format_time(session.ended_at)
    )
}

/// Everything the side panel displays
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelText {
    pub session_id: String,
    pub start_time: String,
    pub end_time: String,
    pub counter: String,
    pub history: Vec<String>,
}

impl PanelText {
    pub fn from_snapshot(snapshot: &Snapshot<'_>) -> Self {
        Self {
            session_id: snapshot
                .session_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            start_time: snapshot.started_at.map(format_time).unwrap_or_default(),
            end_time: snapshot.ended_at.map(format_time).unwrap_or_default(),
            counter: snapshot.remaining_secs.to_string(),
            history: snapshot.history.iter().map(history_line).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{SessionHistory, SessionId, SessionPhase};

    fn t(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_format_time_twelve_hour() {
        assert_eq!(format_time(t(15, 4, 5)), "3:04:05 PM");
        assert_eq!(format_time(t(0, 0, 9)), "12:00:09 AM");
        assert_eq!(format_time(t(11, 59, 59)), "11:59:59 AM");
    }

    #[test]
    fn test_history_line() {
        let session = Session {
            id: SessionId(4821),
            duration_secs: 72,
            started_at: t(9, 15, 0),
            ended_at: t(9, 16, 12),
        };
        assert_eq!(
            history_line(&session),
            "Session 4821: 9:15:00 AM - 9:16:12 AM"
        );
    }

    #[test]
    fn test_idle_panel_is_blank() {
        let history = SessionHistory::new();
        let snapshot = Snapshot {
            phase: SessionPhase::Idle,
            remaining_secs: 0,
            session_id: None,
            started_at: None,
            ended_at: None,
            history: &history,
        };
        let panel = PanelText::from_snapshot(&snapshot);
        assert_eq!(
            panel,
            PanelText {
                counter: "0".into(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_running_panel() {
        let history = SessionHistory::new();
        let snapshot = Snapshot {
            phase: SessionPhase::Running,
            remaining_secs: 87,
            session_id: Some(SessionId(1234)),
            started_at: Some(t(13, 0, 0)),
            ended_at: None,
            history: &history,
        };
        let panel = PanelText::from_snapshot(&snapshot);
        assert_eq!(panel.session_id, "1234");
        assert_eq!(panel.start_time, "1:00:00 PM");
        assert_eq!(panel.end_time, "");
        assert_eq!(panel.counter, "87");
        assert!(panel.history.is_empty());
    }
}
