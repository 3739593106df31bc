//! Wall-clock time of day

use std::cell::Cell;

use chrono::{NaiveTime, TimeDelta};

/// Source of the current time of day
pub trait Clock {
    fn now(&self) -> NaiveTime;
}

/// Local system time (browser time zone on wasm)
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveTime {
        chrono::Local::now().time()
    }
}

/// Deterministic clock: each reading advances by `step`
#[derive(Debug, Clone)]
pub struct StepClock {
    next: Cell<NaiveTime>,
    step: TimeDelta,
}

impl StepClock {
    pub fn new(start: NaiveTime, step: TimeDelta) -> Self {
        Self {
            next: Cell::new(start),
            step,
        }
    }

    /// Move the clock forward without taking a reading
    pub fn advance(&self, by: TimeDelta) {
        self.next.set(self.next.get() + by);
    }

    /// The time the next reading will return
    pub fn peek(&self) -> NaiveTime {
        self.next.get()
    }
}

impl Clock for StepClock {
    fn now(&self) -> NaiveTime {
        let now = self.next.get();
        self.next.set(now + self.step);
        now
    }
}
