//! # Palm Field Simulation
//!
//! CPU particle simulations steered by tracked hands. Each instance runs one
//! behavior (responsive, cohesive, needle sphere or needle swarm); the
//! orchestrator fans hand snapshots and frames out to all of them.

pub mod behavior;
pub mod control;
pub mod frame;
pub mod orchestrator;
pub mod params;
pub mod simulation;
pub mod skeleton;
pub mod store;

pub use behavior::{Behavior, TickInput};
pub use control::*;
pub use frame::*;
pub use orchestrator::*;
pub use params::*;
pub use simulation::*;
pub use skeleton::*;
pub use store::*;
