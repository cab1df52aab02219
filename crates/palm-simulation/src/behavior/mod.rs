//! Per-frame update rules
//!
//! Each motion regime lives in its own module. `Behavior` is the tagged
//! union the simulation dispatches on; the variant is picked once from the
//! config and never changes.

mod cohesive;
mod needle_sphere;
mod needle_swarm;
mod responsive;

pub use cohesive::Cohesive;
pub use needle_sphere::NeedleSphere;
pub use needle_swarm::NeedleSwarm;
pub use responsive::Responsive;

use crate::params::{BehaviorKind, SimulationConfig};
use crate::skeleton::RigPose;
use crate::store::ParticleStore;
use palm_physics::{HandSnapshot, ParticleTransform};
use rand::Rng;

/// Everything a behavior reads besides the particles themselves
#[derive(Debug, Clone, Copy)]
pub struct TickInput<'a> {
    pub hands: &'a HandSnapshot,
    /// Seconds since the previous tick, already clamped
    pub delta_time: f32,
    /// Seconds since the simulation started, including this tick
    pub time: f32,
}

#[derive(Debug, Clone)]
pub enum Behavior {
    Responsive(Responsive),
    Cohesive(Cohesive),
    NeedleSphere(NeedleSphere),
    NeedleSwarm(NeedleSwarm),
}

impl Behavior {
    pub fn new(config: &SimulationConfig) -> Self {
        match config.behavior {
            BehaviorKind::Responsive => Behavior::Responsive(Responsive::new(config)),
            BehaviorKind::Cohesive => Behavior::Cohesive(Cohesive::new(config)),
            BehaviorKind::NeedleSphere => Behavior::NeedleSphere(NeedleSphere::new(config)),
            BehaviorKind::NeedleSwarm => Behavior::NeedleSwarm(NeedleSwarm::new(config)),
        }
    }

    pub fn kind(&self) -> BehaviorKind {
        match self {
            Behavior::Responsive(_) => BehaviorKind::Responsive,
            Behavior::Cohesive(_) => BehaviorKind::Cohesive,
            Behavior::NeedleSphere(_) => BehaviorKind::NeedleSphere,
            Behavior::NeedleSwarm(_) => BehaviorKind::NeedleSwarm,
        }
    }

    /// Advance every particle by one tick and write its transform.
    ///
    /// `transforms` must have one slot per particle.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        store: &mut ParticleStore,
        input: &TickInput<'_>,
        rng: &mut R,
        transforms: &mut [ParticleTransform],
    ) {
        debug_assert_eq!(store.len(), transforms.len());

        match self {
            Behavior::Responsive(b) => b.update(store, input, rng, transforms),
            Behavior::Cohesive(b) => b.update(store, transforms),
            Behavior::NeedleSphere(b) => b.update(store, input, transforms),
            Behavior::NeedleSwarm(b) => b.update(store, input, transforms),
        }
    }

    /// Meditation rigs to draw this frame (needle swarm only)
    pub fn skeletons(&self) -> &[RigPose] {
        match self {
            Behavior::NeedleSwarm(b) => b.overlay().poses(),
            _ => &[],
        }
    }
}
