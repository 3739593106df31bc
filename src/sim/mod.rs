//! Ball motion simulation
//!
//! Deliberately simple and deterministic:
//! - Fixed timestep only
//! - Rectangular arena in screen space (origin top-left, y down)
//! - Perfectly elastic wall bounces
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{WallContact, reflect_velocity, wall_contacts};
pub use state::{Arena, Ball};
pub use tick::{FrameStepper, step};
