//! Bounce Clock - a bouncing ball with timed play sessions
//!
//! Core modules:
//! - `session`: Session lifecycle (start, countdown, end, history)
//! - `sim`: Ball motion inside the arena
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser timers
//! - `panel`: Side panel text
//! - `settings`: Session rules and audio preferences

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod error;
pub mod panel;
#[cfg(target_arch = "wasm32")]
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{RenderInitError, SettingsError};
pub use session::{SessionController, SessionHistory, SessionId, SessionPhase};
pub use settings::{SessionRules, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth motion)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Arena dimensions (pixels)
    pub const ARENA_WIDTH: f32 = 1000.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Ball defaults
    pub const BALL_DIAMETER: f32 = 100.0;
    pub const BALL_START_X: f32 = 400.0;
    pub const BALL_START_Y: f32 = 400.0;

    /// Session length range (seconds, inclusive)
    pub const SESSION_MIN_SECS: u32 = 60;
    pub const SESSION_MAX_SECS: u32 = 110;

    /// Session id range (inclusive, 4 digits)
    pub const SESSION_ID_MIN: u32 = 1000;
    pub const SESSION_ID_MAX: u32 = 9999;

    /// Launch velocity bounds (pixels/s, symmetric around zero)
    pub const LAUNCH_MAX_VX: i32 = 600;
    pub const LAUNCH_MAX_VY: i32 = 1200;

    /// Countdown period (milliseconds)
    pub const TICK_PERIOD_MS: u32 = 1000;
}
