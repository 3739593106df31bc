//! Repeating countdown timer capability
//!
//! The controller arms at most one repeating timer at a time. Whoever fires
//! the timer calls `SessionController::tick`; the scheduler only owns the
//! arming and cancelling.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Handle to an armed repeating timer
pub trait TimerHandle {
    /// Stop the timer. Calling this more than once is harmless.
    fn cancel(&mut self);

    fn is_active(&self) -> bool;
}

/// Arms repeating timers
pub trait Scheduler {
    type Handle: TimerHandle;

    /// Fire every `period` until the returned handle is cancelled or dropped
    fn every(&mut self, period: Duration) -> Self::Handle;
}

/// Scheduler that never fires on its own
///
/// Tests (and the headless native run) call `tick` themselves; the scheduler
/// just tracks how many timers are live so double-arming is observable.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    live: Rc<Cell<usize>>,
    armed_total: Rc<Cell<usize>>,
    last_period: Rc<Cell<Option<Duration>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timers armed and not yet cancelled
    pub fn live_timers(&self) -> usize {
        self.live.get()
    }

    /// Timers armed over the scheduler's lifetime
    pub fn armed_total(&self) -> usize {
        self.armed_total.get()
    }

    pub fn last_period(&self) -> Option<Duration> {
        self.last_period.get()
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn every(&mut self, period: Duration) -> ManualHandle {
        self.live.set(self.live.get() + 1);
        self.armed_total.set(self.armed_total.get() + 1);
        self.last_period.set(Some(period));
        ManualHandle {
            live: Rc::clone(&self.live),
            active: true,
        }
    }
}

#[derive(Debug)]
pub struct ManualHandle {
    live: Rc<Cell<usize>>,
    active: bool,
}

impl TimerHandle for ManualHandle {
    fn cancel(&mut self) {
        if self.active {
            self.active = false;
            self.live.set(self.live.get().saturating_sub(1));
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Drop for ManualHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
