//! # Palm Physics
//!
//! Pure math for the hand-driven particle field: particle state, hand
//! descriptors, falloff forces, spherical shell constraints and the sticky
//! center assignment used by the swarm.

pub mod assignment;
pub mod color;
pub mod constants;
pub mod forces;
pub mod hand;
pub mod particle;
pub mod shell;
pub mod transform;

pub use assignment::*;
pub use color::*;
pub use constants::*;
pub use forces::*;
pub use hand::*;
pub use particle::*;
pub use shell::*;
pub use transform::*;
