//! Arena and ball state

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::session::MotionController;

/// The bouncing ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Center position (pixels)
    pub pos: Vec2,
    /// Velocity (pixels/s)
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.vel != Vec2::ZERO
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// Rectangular play field holding one ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    pub size: Vec2,
    pub ball: Ball,
    /// Wall bounces since creation
    pub bounces: u64,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(
            Vec2::new(ARENA_WIDTH, ARENA_HEIGHT),
            Vec2::new(BALL_START_X, BALL_START_Y),
            BALL_DIAMETER / 2.0,
        )
    }
}

impl Arena {
    /// Create an arena; the ball is clamped inside the walls
    pub fn new(size: Vec2, ball_pos: Vec2, ball_radius: f32) -> Self {
        let mut arena = Self {
            size,
            ball: Ball::new(ball_pos, ball_radius),
            bounces: 0,
        };
        arena.ball.pos = arena.clamp_inside(ball_pos);
        arena
    }

    /// Smallest and largest legal ball center
    pub fn center_bounds(&self) -> (Vec2, Vec2) {
        let r = Vec2::splat(self.ball.radius);
        let min = r.min(self.size / 2.0);
        let max = (self.size - r).max(min);
        (min, max)
    }

    pub fn clamp_inside(&self, pos: Vec2) -> Vec2 {
        let (min, max) = self.center_bounds();
        pos.clamp(min, max)
    }
}

impl MotionController for Arena {
    fn set_velocity(&mut self, x: f32, y: f32) {
        self.ball.vel = Vec2::new(x, y);
    }

    fn stop(&mut self) {
        self.ball.vel = Vec2::ZERO;
    }
}
