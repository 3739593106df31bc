//! Side effects requested by the controller
//!
//! Fire-and-forget: the controller never waits on or inspects a result.

/// Ambient sound playback
pub trait AudioController {
    /// Start the looping ambient sound (restart if already playing)
    fn play_loop(&mut self);
    fn stop(&mut self);
}

/// Ball motion
pub trait MotionController {
    /// Set ball velocity in pixels/s
    fn set_velocity(&mut self, x: f32, y: f32);
    /// Zero the velocity
    fn stop(&mut self);
}

/// Audio backend that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioController for SilentAudio {
    fn play_loop(&mut self) {
        log::debug!("Ambient loop started (silent)");
    }

    fn stop(&mut self) {
        log::debug!("Ambient loop stopped (silent)");
    }
}
