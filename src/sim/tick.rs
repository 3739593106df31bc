//! Fixed timestep motion
//!
//! Advances the ball and bounces it off the walls.

use super::collision::{reflect_velocity, wall_contacts};
use super::state::Arena;
use crate::consts::*;

/// Advance the arena by one fixed timestep
pub fn step(arena: &mut Arena, dt: f32) {
    if !arena.ball.is_moving() {
        return;
    }

    arena.ball.pos += arena.ball.vel * dt;

    for contact in wall_contacts(arena) {
        // Only reflect if moving into the wall
        if arena.ball.vel.dot(contact.normal) < 0.0 {
            arena.ball.vel = reflect_velocity(arena.ball.vel, contact.normal);
            arena.bounces += 1;
        }
        arena.ball.pos += contact.normal * contact.penetration;
    }
}

/// Turns variable frame deltas into fixed simulation steps
#[derive(Debug, Clone, Default)]
pub struct FrameStepper {
    accumulator: f32,
}

impl FrameStepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run as many fixed steps as `frame_dt` covers. Returns steps taken.
    pub fn advance(&mut self, arena: &mut Arena, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            step(arena, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop time we could not catch up on
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
