//! Completed session log
//!
//! Append-only, in insertion order, lives as long as its controller.

use serde::Serialize;

use super::state::Session;

/// Completed sessions, oldest first
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct SessionHistory {
    entries: Vec<Session>,
}

impl SessionHistory {
    /// Create empty history
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Log a completed session
    pub(crate) fn push(&mut self, session: Session) {
        self.entries.push(session);
    }

    pub fn entries(&self) -> &[Session] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recently completed session
    pub fn last(&self) -> Option<&Session> {
        self.entries.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Session> {
        self.entries.iter()
    }

    /// Export as JSON for the console
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl<'a> IntoIterator for &'a SessionHistory {
    type Item = &'a Session;
    type IntoIter = std::slice::Iter<'a, Session>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionId;
    use chrono::NaiveTime;

    fn session(id: u32, secs: u32, start: (u32, u32, u32), end: (u32, u32, u32)) -> Session {
        Session {
            id: SessionId(id),
            duration_secs: secs,
            started_at: NaiveTime::from_hms_opt(start.0, start.1, start.2).unwrap(),
            ended_at: NaiveTime::from_hms_opt(end.0, end.1, end.2).unwrap(),
        }
    }

    #[test]
    fn test_preserves_insertion_order() {
        let mut history = SessionHistory::new();
        assert!(history.is_empty());
        history.push(session(4321, 60, (10, 0, 0), (10, 1, 0)));
        history.push(session(1234, 70, (10, 2, 0), (10, 3, 10)));

        let ids: Vec<_> = history.iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![4321, 1234]);
        assert_eq!(history.last().map(|s| s.id), Some(SessionId(1234)));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_colliding_ids_are_both_kept() {
        let mut history = SessionHistory::new();
        history.push(session(5000, 60, (9, 0, 0), (9, 1, 0)));
        history.push(session(5000, 61, (9, 2, 0), (9, 3, 1)));
        let secs: Vec<_> = history.iter().map(|s| s.duration_secs).collect();
        assert_eq!(secs, vec![60, 61]);
        assert!(history.iter().all(|s| s.id == SessionId(5000)));
    }

    #[test]
    fn test_json_export() {
        let mut history = SessionHistory::new();
        history.push(session(1111, 60, (8, 0, 0), (8, 1, 0)));
        let json = history.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["id"], 1111);
        assert_eq!(value[0]["started_at"], "08:00:00");
        assert_eq!(value[0]["ended_at"], "08:01:00");
    }
}
