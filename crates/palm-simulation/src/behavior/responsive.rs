use super::TickInput;
use crate::params::SimulationConfig;
use crate::store::ParticleStore;
use palm_physics::{apply_boundaries, attraction_force, integrate, jitter, ParticleTransform};
use rand::Rng;

/// Particles drift with a little jitter and get pulled toward nearby palms.
#[derive(Debug, Clone)]
pub struct Responsive {
    attraction_strength: f32,
    interaction_radius: f32,
    viscosity: f32,
    boundary: f32,
    size: f32,
}

impl Responsive {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            attraction_strength: config.tunables.attraction_strength(),
            interaction_radius: config.tunables.interaction_radius(),
            viscosity: config.viscosity,
            boundary: config.boundary,
            size: config.size,
        }
    }

    pub(crate) fn update<R: Rng + ?Sized>(
        &mut self,
        store: &mut ParticleStore,
        input: &TickInput<'_>,
        rng: &mut R,
        transforms: &mut [ParticleTransform],
    ) {
        for (particle, transform) in store.iter_mut().zip(transforms.iter_mut()) {
            let mut force = jitter(rng);
            for palm in input.hands.palms() {
                force += attraction_force(
                    particle.position,
                    palm,
                    self.interaction_radius,
                    self.attraction_strength,
                );
            }

            integrate(particle, force, self.viscosity);
            apply_boundaries(particle, self.boundary);

            *transform = ParticleTransform::translate(particle.position, self.size);
        }
    }
}
