//! Ball vs. arena wall contacts

use glam::Vec2;

use super::state::Arena;

/// A wall the ball is touching or past
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallContact {
    /// Wall normal pointing into the arena
    pub normal: Vec2,
    /// How far the ball is past the wall (pixels, > 0)
    pub penetration: f32,
}

/// Walls the ball currently overlaps (at most one per axis)
pub fn wall_contacts(arena: &Arena) -> Vec<WallContact> {
    let (min, max) = arena.center_bounds();
    let pos = arena.ball.pos;
    let mut contacts = Vec::with_capacity(2);

    if pos.x < min.x {
        contacts.push(WallContact {
            normal: Vec2::X,
            penetration: min.x - pos.x,
        });
    } else if pos.x > max.x {
        contacts.push(WallContact {
            normal: Vec2::NEG_X,
            penetration: pos.x - max.x,
        });
    }

    if pos.y < min.y {
        contacts.push(WallContact {
            normal: Vec2::Y,
            penetration: min.y - pos.y,
        });
    } else if pos.y > max.y {
        contacts.push(WallContact {
            normal: Vec2::NEG_Y,
            penetration: pos.y - max.y,
        });
    }

    contacts
}

/// Reflect velocity about a surface normal
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}
