//! Session records and controller state

use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::history::SessionHistory;

/// Short opaque session identifier (4 digits by default)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u32);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle phase of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// No session; waiting for a start intent
    #[default]
    Idle,
    /// Countdown in progress
    Running,
}

/// The session currently counting down
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    pub id: SessionId,
    pub duration_secs: u32,
    pub started_at: NaiveTime,
}

impl ActiveSession {
    /// Seal the session with its end time
    pub fn complete(self, ended_at: NaiveTime) -> Session {
        Session {
            id: self.id,
            duration_secs: self.duration_secs,
            started_at: self.started_at,
            ended_at,
        }
    }
}

/// A completed play-through (immutable once logged)
///
/// Times are local time of day with no date, so a session that crosses
/// midnight ends "before" it started and does not order against its
/// neighbours in the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub duration_secs: u32,
    pub started_at: NaiveTime,
    pub ended_at: NaiveTime,
}

/// Mutable state owned by one controller
#[derive(Debug, Clone, Default)]
pub struct ControllerState {
    pub phase: SessionPhase,
    /// Seconds left; only meaningful while `Running`
    pub remaining_secs: u32,
    pub active: Option<ActiveSession>,
    /// End time of the last completed session, shown until the next start
    pub last_ended_at: Option<NaiveTime>,
}

/// Read-only view handed to the presentation shell
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub phase: SessionPhase,
    pub remaining_secs: u32,
    /// Id of the running session, or of the last completed one
    pub session_id: Option<SessionId>,
    pub started_at: Option<NaiveTime>,
    pub ended_at: Option<NaiveTime>,
    pub history: &'a SessionHistory,
}

impl Snapshot<'_> {
    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }
}
