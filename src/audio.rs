//! Audio system using Web Audio API
//!
//! The ambient "old clock" loop is generated procedurally - no external files
//! needed. A sawtooth LFO drives the gain of a short tone so each period
//! starts loud and decays to silence, which reads as a steady tick.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::session::AudioController;
use crate::settings::Settings;

/// Tone frequency of one tick (Hz)
const TICK_TONE_HZ: f32 = 1100.0;
/// Ticks per second
const TICK_RATE_HZ: f32 = 1.0;

/// Live nodes of a playing loop
struct ClockLoop {
    tone: OscillatorNode,
    lfo: OscillatorNode,
    gate: GainNode,
    depth: GainNode,
}

impl ClockLoop {
    fn stop(self) {
        self.tone.stop().ok();
        self.lfo.stop().ok();
        self.depth.disconnect().ok();
        self.gate.disconnect().ok();
    }
}

/// Audio manager for the ambient loop
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
    playing: Option<ClockLoop>,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: settings.effective_ambient_volume(),
            playing: None,
        }
    }

    /// Build and start the node graph
    ///
    /// tone -> gate -> destination, lfo -> depth -> gate.gain
    fn build_loop(ctx: &AudioContext, vol: f32) -> Option<ClockLoop> {
        let tone = ctx.create_oscillator().ok()?;
        let lfo = ctx.create_oscillator().ok()?;
        let gate = ctx.create_gain().ok()?;
        let depth = ctx.create_gain().ok()?;

        tone.set_type(OscillatorType::Triangle);
        tone.frequency().set_value(TICK_TONE_HZ);
        lfo.set_type(OscillatorType::Sawtooth);
        lfo.frequency().set_value(TICK_RATE_HZ);

        // Sawtooth runs -1..1, so gain sweeps vol..0 once per period
        gate.gain().set_value(vol * 0.5);
        depth.gain().set_value(-vol * 0.5);

        tone.connect_with_audio_node(&gate).ok()?;
        gate.connect_with_audio_node(&ctx.destination()).ok()?;
        lfo.connect_with_audio_node(&depth).ok()?;
        depth.connect_with_audio_param(&gate.gain()).ok()?;

        tone.start().ok()?;
        lfo.start().ok()?;

        Some(ClockLoop {
            tone,
            lfo,
            gate,
            depth,
        })
    }
}

impl AudioController for AudioManager {
    fn play_loop(&mut self) {
        if let Some(old) = self.playing.take() {
            old.stop();
        }
        if self.volume <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        self.playing = Self::build_loop(ctx, self.volume);
        if self.playing.is_none() {
            log::warn!("Failed to build clock loop");
        }
    }

    fn stop(&mut self) {
        if let Some(playing) = self.playing.take() {
            playing.stop();
        }
    }
}
