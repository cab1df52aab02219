//! Force terms and integration for the free-flying behaviors
//!
//! All forces use a linear falloff: full strength at zero distance, zero at
//! the cutoff radius.

use crate::constants::*;
use crate::particle::Particle;
use glam::Vec3;
use rand::Rng;

/// Linear falloff pull from `position` toward `anchor`.
/// Zero outside `radius`, when the two points coincide, and for a radius
/// that is not a positive finite number.
pub fn falloff_pull(position: Vec3, anchor: Vec3, radius: f32, strength: f32) -> Vec3 {
    if !(radius > 0.0 && radius.is_finite()) || !strength.is_finite() {
        return Vec3::ZERO;
    }

    let offset = anchor - position;
    let dist = offset.length();

    if dist >= radius || dist * dist <= DEGENERATE_LENGTH_SQ {
        return Vec3::ZERO;
    }

    offset / dist * strength * (1.0 - dist / radius)
}

/// Attraction toward a hand palm
pub fn attraction_force(position: Vec3, palm: Vec3, radius: f32, strength: f32) -> Vec3 {
    falloff_pull(position, palm, radius, strength)
}

/// Cohesion toward a neighbouring particle
pub fn cohesion_force(position: Vec3, neighbour: Vec3, radius: f32, strength: f32) -> Vec3 {
    falloff_pull(position, neighbour, radius, strength)
}

/// Weak spring back toward the origin
pub fn origin_pull(position: Vec3) -> Vec3 {
    -ORIGIN_PULL * position
}

/// Isotropic jitter, uniform per axis in `[-JITTER_RANGE, JITTER_RANGE]`
pub fn jitter<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    Vec3::new(
        rng.random_range(-JITTER_RANGE..=JITTER_RANGE),
        rng.random_range(-JITTER_RANGE..=JITTER_RANGE),
        rng.random_range(-JITTER_RANGE..=JITTER_RANGE),
    )
}

/// `velocity += force; velocity *= viscosity; position += velocity`
pub fn integrate(particle: &mut Particle, force: Vec3, viscosity: f32) {
    particle.velocity += force;
    particle.velocity *= viscosity;
    particle.position += particle.velocity;
}

/// Clamp each axis to `[-boundary, boundary]` and bounce the clipped velocity components.
///
/// Axes are handled independently, so a corner can clip two or three at once.
pub fn apply_boundaries(particle: &mut Particle, boundary: f32) {
    let boundary = boundary.max(0.0);

    for axis in 0..3 {
        if particle.position[axis].abs() > boundary {
            particle.position[axis] = boundary.copysign(particle.position[axis]);
            particle.velocity[axis] *= BOUNCE_DAMPING;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_falloff_ignores_degenerate_radius() {
        let position = Vec3::new(1.0, 0.0, 0.0);
        for radius in [f32::NAN, f32::INFINITY, 0.0, -3.0] {
            assert_eq!(falloff_pull(position, Vec3::ZERO, radius, 2.0), Vec3::ZERO);
        }
        assert_eq!(falloff_pull(position, Vec3::ZERO, 5.0, f32::NAN), Vec3::ZERO);
    }

    #[test]
    fn test_falloff_is_maximal_near_anchor() {
        let near = attraction_force(Vec3::new(0.1, 0.0, 0.0), Vec3::ZERO, 5.0, 2.0);
        let far = attraction_force(Vec3::new(4.0, 0.0, 0.0), Vec3::ZERO, 5.0, 2.0);

        assert!(near.length() > far.length());
        assert!((near.length() - 2.0 * (1.0 - 0.1 / 5.0)).abs() < 1e-5);
        // Points toward the anchor
        assert!(near.x < 0.0 && far.x < 0.0);
    }

    #[test]
    fn test_falloff_vanishes_at_radius() {
        assert_eq!(attraction_force(Vec3::new(5.0, 0.0, 0.0), Vec3::ZERO, 5.0, 2.0), Vec3::ZERO);
        assert_eq!(attraction_force(Vec3::new(9.0, 0.0, 0.0), Vec3::ZERO, 5.0, 2.0), Vec3::ZERO);
    }

    #[test]
    fn test_coincident_points_produce_no_force() {
        let f = cohesion_force(Vec3::ONE, Vec3::ONE, 3.0, 1.0);
        assert_eq!(f, Vec3::ZERO);
        assert!(!f.is_nan());
    }

    #[test]
    fn test_zero_radius_is_inert() {
        let f = attraction_force(Vec3::X, Vec3::ZERO, 0.0, 1.0);
        assert_eq!(f, Vec3::ZERO);
    }

    #[test]
    fn test_jitter_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let j = jitter(&mut rng);
            assert!(j.abs().max_element() <= JITTER_RANGE);
        }
    }

    #[test]
    fn test_integrate_damps_then_moves() {
        let mut p = Particle::new(0, Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::Y);
        integrate(&mut p, Vec3::new(1.0, 0.0, 0.0), 0.5);

        assert_eq!(p.velocity, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(p.position, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_boundary_clamps_and_bounces_each_axis() {
        let mut p = Particle::new(
            0,
            Vec3::new(12.0, -15.0, 3.0),
            Vec3::new(1.0, -2.0, 0.5),
            Vec3::Y,
        );
        apply_boundaries(&mut p, 10.0);

        assert_eq!(p.position, Vec3::new(10.0, -10.0, 3.0));
        assert!((p.velocity.x - -0.8).abs() < 1e-6);
        assert!((p.velocity.y - 1.6).abs() < 1e-6);
        assert_eq!(p.velocity.z, 0.5);
    }
}
