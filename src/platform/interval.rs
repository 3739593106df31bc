//! `setInterval`-backed countdown timer

use std::time::Duration;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::session::{Scheduler, TimerHandle};

/// Arms browser intervals that all invoke one callback
///
/// The callback is built once by the shell (it usually captures a `Weak` to
/// the game) and lives as long as the scheduler.
pub struct IntervalScheduler {
    callback: Closure<dyn FnMut()>,
}

impl IntervalScheduler {
    pub fn new(callback: impl FnMut() + 'static) -> Self {
        Self {
            callback: Closure::<dyn FnMut()>::new(callback),
        }
    }
}

impl Scheduler for IntervalScheduler {
    type Handle = IntervalHandle;

    fn every(&mut self, period: Duration) -> IntervalHandle {
        let millis = i32::try_from(period.as_millis()).unwrap_or(i32::MAX);
        let id = web_sys::window().and_then(|w| {
            w.set_interval_with_callback_and_timeout_and_arguments_0(
                self.callback.as_ref().unchecked_ref(),
                millis,
            )
            .ok()
        });
        if id.is_none() {
            log::error!("Failed to arm {}ms interval", millis);
        }
        IntervalHandle { id }
    }
}

/// An armed browser interval; cleared on cancel or drop
#[derive(Debug)]
pub struct IntervalHandle {
    id: Option<i32>,
}

impl TimerHandle for IntervalHandle {
    fn cancel(&mut self) {
        if let Some(id) = self.id.take() {
            if let Some(window) = web_sys::window() {
                window.clear_interval_with_handle(id);
            }
        }
    }

    fn is_active(&self) -> bool {
        self.id.is_some()
    }
}

impl Drop for IntervalHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
