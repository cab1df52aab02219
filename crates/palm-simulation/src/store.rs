//! Particle storage for one simulation instance

use glam::Vec3;
use palm_physics::{Particle, INITIAL_VELOCITY_RANGE};
use rand::Rng;

/// Owns every particle of one instance. Stores never share particles.
#[derive(Debug, Clone)]
pub struct ParticleStore {
    particles: Vec<Particle>,
}

/// Uniform random point in `[-extent, extent]^3`
fn random_in_cube<R: Rng + ?Sized>(rng: &mut R, extent: f32) -> Vec3 {
    if !extent.is_finite() || extent <= 0.0 {
        return Vec3::ZERO;
    }
    Vec3::new(
        rng.random_range(-extent..=extent),
        rng.random_range(-extent..=extent),
        rng.random_range(-extent..=extent),
    )
}

/// Uniform random unit vector
fn random_unit<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let theta = rng.random::<f32>() * std::f32::consts::TAU;
    let cos_phi = rng.random::<f32>() * 2.0 - 1.0;
    let sin_phi = (1.0 - cos_phi * cos_phi).max(0.0).sqrt();
    Vec3::new(sin_phi * theta.cos(), sin_phi * theta.sin(), cos_phi)
}

impl ParticleStore {
    /// Scatter `count` particles through the bounding cube.
    ///
    /// `with_direction` seeds a random radial direction (sphere modes);
    /// otherwise every direction is world up.
    pub fn new<R: Rng + ?Sized>(
        rng: &mut R,
        count: usize,
        boundary: f32,
        with_direction: bool,
    ) -> Self {
        let particles = (0..count)
            .map(|i| {
                let position = random_in_cube(rng, boundary);
                let velocity = random_in_cube(rng, INITIAL_VELOCITY_RANGE);
                let direction = if with_direction {
                    random_unit(rng)
                } else {
                    Vec3::Y
                };
                Particle::new(i, position, velocity, direction)
            })
            .collect();

        Self { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Particle> {
        self.particles.iter_mut()
    }
}
