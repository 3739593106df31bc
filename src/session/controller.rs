//! Session controller
//!
//! Two states, `Idle` and `Running`:
//! - `start` from `Idle` draws an id and a length, arms the countdown timer,
//!   starts the ambient loop and launches the ball
//! - `tick` counts down once per period; the tick that reaches zero ends the
//!   session
//! - `end` logs the session, stops sound and motion, and returns to `Idle`
//!
//! Invalid transitions (start while running, tick while idle) are no-ops.

use super::clock::Clock;
use super::effects::{AudioController, MotionController};
use super::history::SessionHistory;
use super::random::RandomSource;
use super::state::{ActiveSession, ControllerState, Session, SessionId, SessionPhase, Snapshot};
use super::timer::{Scheduler, TimerHandle};
use crate::error::SettingsError;
use crate::settings::SessionRules;

/// Result of a start intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new session is counting down
    Started { id: SessionId, duration_secs: u32 },
    /// A session was already running; nothing changed
    AlreadyRunning { id: SessionId },
}

/// Result of one countdown tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No session running (stale timer); nothing changed
    Idle,
    /// Still running with this many seconds left
    Counting { remaining_secs: u32 },
    /// This tick reached zero and ended the session
    Ended(Session),
}

/// Owns the session lifecycle for one game instance
pub struct SessionController<R, C, S: Scheduler, A, M> {
    rules: SessionRules,
    rng: R,
    clock: C,
    scheduler: S,
    audio: A,
    motion: M,
    state: ControllerState,
    history: SessionHistory,
    timer: Option<S::Handle>,
}

impl<R, C, S, A, M> SessionController<R, C, S, A, M>
where
    R: RandomSource,
    C: Clock,
    S: Scheduler,
    A: AudioController,
    M: MotionController,
{
    /// Build a controller; rejects rules `SessionRules::validate` rejects
    pub fn new(
        rules: SessionRules,
        rng: R,
        clock: C,
        scheduler: S,
        audio: A,
        motion: M,
    ) -> Result<Self, SettingsError> {
        rules.validate()?;
        Ok(Self {
            rules,
            rng,
            clock,
            scheduler,
            audio,
            motion,
            state: ControllerState::default(),
            history: SessionHistory::new(),
            timer: None,
        })
    }

    /// Begin a session if none is running
    pub fn start(&mut self) -> StartOutcome {
        if let Some(active) = self.running_session() {
            log::debug!("Start ignored: session {} still running", active.id);
            return StartOutcome::AlreadyRunning { id: active.id };
        }

        // Draw order is fixed: id, length, then launch velocity
        let id = SessionId(draw_u32(&mut self.rng, self.rules.id_min, self.rules.id_max));
        let duration_secs =
            draw_u32(&mut self.rng, self.rules.min_secs, self.rules.max_secs).max(1);
        let started_at = self.clock.now();

        self.state = ControllerState {
            phase: SessionPhase::Running,
            remaining_secs: duration_secs,
            active: Some(ActiveSession {
                id,
                duration_secs,
                started_at,
            }),
            last_ended_at: None,
        };

        // Never two countdowns at once
        self.cancel_timer();
        self.timer = Some(self.scheduler.every(self.rules.tick_period()));

        let vx = self.rng.between(-self.rules.max_vx, self.rules.max_vx);
        let vy = self.rng.between(-self.rules.max_vy, self.rules.max_vy);
        self.audio.play_loop();
        self.motion.set_velocity(vx as f32, vy as f32);

        log::info!(
            "Session {} started at {} ({}s, velocity {},{})",
            id,
            started_at.format("%H:%M:%S"),
            duration_secs,
            vx,
            vy
        );

        StartOutcome::Started { id, duration_secs }
    }

    /// Advance the countdown by one period
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.phase != SessionPhase::Running {
            return TickOutcome::Idle;
        }

        self.state.remaining_secs = self.state.remaining_secs.saturating_sub(1);
        log::debug!("Countdown: {}", self.state.remaining_secs);

        if self.state.remaining_secs == 0 {
            match self.end() {
                Some(session) => TickOutcome::Ended(session),
                None => TickOutcome::Idle,
            }
        } else {
            TickOutcome::Counting {
                remaining_secs: self.state.remaining_secs,
            }
        }
    }

    /// Complete the running session and log it
    ///
    /// Normally reached through the tick that hits zero. Returns `None` when
    /// nothing is running.
    pub fn end(&mut self) -> Option<Session> {
        if self.state.phase != SessionPhase::Running {
            return None;
        }
        self.cancel_timer();

        let active = self.state.active.take()?;
        let ended_at = self.clock.now();
        let session = active.complete(ended_at);
        self.history.push(session.clone());

        self.state.phase = SessionPhase::Idle;
        self.state.remaining_secs = 0;
        self.state.last_ended_at = Some(ended_at);

        self.audio.stop();
        self.motion.stop();

        log::info!(
            "Session {} ended at {} ({} logged)",
            session.id,
            ended_at.format("%H:%M:%S"),
            self.history.len()
        );

        Some(session)
    }

    /// Stop everything without logging the running session (page teardown)
    pub fn teardown(&mut self) {
        self.cancel_timer();
        if let Some(active) = self.state.active.take() {
            self.audio.stop();
            self.motion.stop();
            log::info!(
                "Session {} dropped at teardown with {}s left",
                active.id,
                self.state.remaining_secs
            );
        }
        self.state.phase = SessionPhase::Idle;
        self.state.remaining_secs = 0;
    }

    fn cancel_timer(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }
    }

    fn running_session(&self) -> Option<&ActiveSession> {
        match self.state.phase {
            SessionPhase::Running => self.state.active.as_ref(),
            SessionPhase::Idle => None,
        }
    }
}

impl<R, C, S: Scheduler, A, M> SessionController<R, C, S, A, M> {
    /// Read-only view for the presentation shell
    pub fn snapshot(&self) -> Snapshot<'_> {
        let last = self.history.last();
        Snapshot {
            phase: self.state.phase,
            remaining_secs: self.state.remaining_secs,
            session_id: self
                .state
                .active
                .as_ref()
                .map(|a| a.id)
                .or(last.map(|s| s.id)),
            started_at: self
                .state
                .active
                .as_ref()
                .map(|a| a.started_at)
                .or(last.map(|s| s.started_at)),
            ended_at: self.state.last_ended_at,
            history: &self.history,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.phase == SessionPhase::Running
    }

    pub fn remaining_secs(&self) -> u32 {
        self.state.remaining_secs
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        self.state.active.as_ref()
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    /// Whether a countdown timer is currently armed
    pub fn timer_armed(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| t.is_active())
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn motion(&self) -> &M {
        &self.motion
    }

    pub fn motion_mut(&mut self) -> &mut M {
        &mut self.motion
    }
}

impl<R, C, S: Scheduler, A, M> Drop for SessionController<R, C, S, A, M> {
    fn drop(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

/// Draw a `u32` in `lo..=hi` through an `i32` source
fn draw_u32<R: RandomSource>(rng: &mut R, lo: u32, hi: u32) -> u32 {
    let lo_i = i32::try_from(lo).unwrap_or(i32::MAX);
    let hi_i = i32::try_from(hi).unwrap_or(i32::MAX).max(lo_i);
    let v = rng.between(lo_i, hi_i).clamp(lo_i, hi_i);
    // Non-negative after clamping to a non-negative range
    v as u32
}
