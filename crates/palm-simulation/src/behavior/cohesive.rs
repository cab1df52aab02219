use crate::params::SimulationConfig;
use crate::store::ParticleStore;
use glam::Vec3;
use palm_physics::{apply_boundaries, cohesion_force, integrate, origin_pull, ParticleTransform};

/// Particles clump together while drifting back toward the origin.
///
/// Cohesion only looks at every `stride`-th particle, so a tick costs
/// O(n^2 / stride) instead of O(n^2). Neighbour positions are sampled from
/// the start of the tick.
#[derive(Debug, Clone)]
pub struct Cohesive {
    cohesion_strength: f32,
    cohesion_radius: f32,
    stride: usize,
    viscosity: f32,
    boundary: f32,
    size: f32,
    // scratch
    positions: Vec<Vec3>,
}

impl Cohesive {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            cohesion_strength: config.tunables.cohesion_strength(),
            cohesion_radius: config.tunables.cohesion_radius(),
            stride: config.tunables.cohesion_stride(),
            viscosity: config.viscosity,
            boundary: config.boundary,
            size: config.size,
            positions: Vec::with_capacity(config.count),
        }
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub(crate) fn update(
        &mut self,
        store: &mut ParticleStore,
        transforms: &mut [ParticleTransform],
    ) {
        self.positions.clear();
        self.positions.extend(store.iter().map(|p| p.position));

        for (i, (particle, transform)) in store
            .iter_mut()
            .zip(transforms.iter_mut())
            .enumerate()
        {
            let mut force = origin_pull(particle.position);

            for j in (0..self.positions.len()).step_by(self.stride) {
                if j == i {
                    continue;
                }
                force += cohesion_force(
                    particle.position,
                    self.positions[j],
                    self.cohesion_radius,
                    self.cohesion_strength,
                );
            }

            integrate(particle, force, self.viscosity);
            apply_boundaries(particle, self.boundary);

            *transform = ParticleTransform::translate(particle.position, self.size);
        }
    }
}
