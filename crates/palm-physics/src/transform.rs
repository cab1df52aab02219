//! Per-particle rigid transforms handed to the renderer

use crate::shell::safe_normalize;
use glam::{Mat4, Quat, Vec3};

/// Canonical long axis of every mesh
pub const MESH_UP: Vec3 = Vec3::Y;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Default for ParticleTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }
}

impl ParticleTransform {
    pub fn translate(translation: Vec3, scale: f32) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
            scale,
        }
    }

    pub fn oriented(translation: Vec3, rotation: Quat, scale: f32) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            self.rotation,
            self.translation,
        )
    }
}

/// Minimal rotation taking [`MESH_UP`] onto `direction`.
///
/// A zero `direction` yields the identity rotation.
pub fn align_up_to(direction: Vec3) -> Quat {
    let target = safe_normalize(direction, MESH_UP);
    Quat::from_rotation_arc(MESH_UP, target)
}

/// Rotation making a needle at `position` point at `center`.
/// `fallback` is the stored radial direction, used when the two coincide.
pub fn needle_orientation(position: Vec3, center: Vec3, fallback: Vec3) -> Quat {
    let inward = safe_normalize(center - position, -fallback);
    align_up_to(inward)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needle_points_at_center() {
        let position = Vec3::new(3.0, 4.0, 0.0);
        let rotation = needle_orientation(position, Vec3::ZERO, Vec3::X);
        let up = rotation * MESH_UP;
        let inward = (-position).normalize();
        assert!((up - inward).length() < 1e-5);
    }

    #[test]
    fn test_antiparallel_alignment_is_finite() {
        let rotation = align_up_to(Vec3::NEG_Y);
        assert!(rotation.is_finite());
        assert!(((rotation * MESH_UP) - Vec3::NEG_Y).length() < 1e-5);
    }

    #[test]
    fn test_coincident_position_uses_fallback() {
        let rotation = needle_orientation(Vec3::ONE, Vec3::ONE, Vec3::Z);
        assert!(((rotation * MESH_UP) - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_matrix_applies_translation_and_scale() {
        let t = ParticleTransform::translate(Vec3::new(1.0, 2.0, 3.0), 2.0);
        let p = t.to_matrix().transform_point3(Vec3::X);
        assert_eq!(p, Vec3::new(3.0, 2.0, 3.0));
    }
}
