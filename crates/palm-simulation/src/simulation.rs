//! CPU particle simulation for one instance
//!
//! Owns the particle store, the behavior and the transform stream the
//! renderer reads. Hand snapshots are set from outside; `update` never fails.

use crate::behavior::{Behavior, TickInput};
use crate::params::SimulationConfig;
use crate::skeleton::RigPose;
use crate::store::ParticleStore;
use palm_physics::{HandSnapshot, Particle, ParticleTransform, MAX_DELTA_TIME};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Clamp a raw frame delta into `[0, MAX_DELTA_TIME]`.
///
/// A backgrounded window can resume with a delta of several seconds; it is
/// treated as one slow frame instead of a jump.
pub fn clamp_delta_time(delta_time: f32) -> f32 {
    if delta_time.is_finite() {
        delta_time.clamp(0.0, MAX_DELTA_TIME)
    } else {
        0.0
    }
}

pub struct Simulation {
    config: SimulationConfig,
    store: ParticleStore,
    behavior: Behavior,
    hands: HandSnapshot,
    transforms: Vec<ParticleTransform>,
    rng: StdRng,
    time: f32,
    ticks: u64,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let store = ParticleStore::new(
            &mut rng,
            config.count,
            config.boundary,
            config.behavior.uses_direction(),
        );
        let transforms = store
            .iter()
            .map(|p| ParticleTransform::translate(p.position, config.size))
            .collect();
        let behavior = Behavior::new(&config);

        log::info!(
            "✓ {} simulation initialized with {} particles",
            config.behavior.label(),
            store.len()
        );

        Self {
            config,
            store,
            behavior,
            hands: HandSnapshot::empty(),
            transforms,
            rng,
            time: 0.0,
            ticks: 0,
        }
    }

    /// Replace the hands used from the next tick on
    pub fn set_hand_controls(&mut self, hands: HandSnapshot) {
        self.hands = hands;
    }

    /// Advance one tick. `delta_time` is clamped first.
    pub fn update(&mut self, delta_time: f32) {
        let delta_time = clamp_delta_time(delta_time);
        self.time += delta_time;
        self.ticks += 1;

        let input = TickInput {
            hands: &self.hands,
            delta_time,
            time: self.time,
        };

        self.behavior.update(
            &mut self.store,
            &input,
            &mut self.rng,
            &mut self.transforms,
        );
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    pub fn hands(&self) -> &HandSnapshot {
        &self.hands
    }

    pub fn particles(&self) -> &[Particle] {
        self.store.particles()
    }

    /// Direct access for seeding specific layouts
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        self.store.particles_mut()
    }

    pub fn transforms(&self) -> &[ParticleTransform] {
        &self.transforms
    }

    pub fn skeletons(&self) -> &[RigPose] {
        self.behavior.skeletons()
    }

    /// Simulated seconds so far
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::BehaviorKind;

    #[test]
    fn test_large_delta_is_clamped() {
        assert_eq!(clamp_delta_time(3.0), MAX_DELTA_TIME);
        assert_eq!(clamp_delta_time(-1.0), 0.0);
        assert_eq!(clamp_delta_time(f32::NAN), 0.0);
        assert_eq!(clamp_delta_time(0.01), 0.01);
    }

    #[test]
    fn test_time_advances_by_clamped_delta() {
        let mut sim = Simulation::new(SimulationConfig::responsive().with_count(4).with_seed(1));
        sim.update(10.0);
        assert!((sim.time() - MAX_DELTA_TIME).abs() < 1e-6);
        assert_eq!(sim.ticks(), 1);
    }

    #[test]
    fn test_one_transform_per_particle() {
        for config in SimulationConfig::reference_set() {
            let mut sim = Simulation::new(config.with_count(37).with_seed(9));
            assert_eq!(sim.transforms().len(), 37);
            sim.update(1.0 / 60.0);
            assert_eq!(sim.transforms().len(), 37);
            for (t, p) in sim.transforms().iter().zip(sim.particles()) {
                assert_eq!(t.translation, p.position);
                assert!(t.rotation.is_finite());
            }
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let run = || {
            let mut sim =
                Simulation::new(SimulationConfig::responsive().with_count(10).with_seed(5));
            for _ in 0..20 {
                sim.update(1.0 / 60.0);
            }
            sim.particles().iter().map(|p| p.position).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_skeletons_only_in_swarm() {
        let hands = HandSnapshot::new([palm_physics::HandDescriptor::new(glam::Vec3::ZERO, 0)]);
        for config in SimulationConfig::reference_set() {
            let kind = config.behavior;
            let mut sim = Simulation::new(config.with_count(4).with_seed(2));
            sim.set_hand_controls(hands.clone());
            sim.update(1.0 / 60.0);
            assert_eq!(sim.skeletons().len(), usize::from(kind == BehaviorKind::NeedleSwarm));
        }
    }
}
