//! Browser platform glue
//!
//! - Countdown timers (`setInterval` / `clearInterval`)

pub mod interval;

pub use interval::{IntervalHandle, IntervalScheduler};
