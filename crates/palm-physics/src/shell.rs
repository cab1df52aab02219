//! Spherical shell geometry: projection, tangent frames and the swimming wave

use crate::constants::*;
use crate::hand::HandSnapshot;
use crate::particle::ShellGroup;
use glam::Vec3;

/// Normalize `v`, or return `fallback` when `v` is (near) zero length.
///
/// Never produces NaN as long as `fallback` is finite.
pub fn safe_normalize(v: Vec3, fallback: Vec3) -> Vec3 {
    let len_sq = v.length_squared();
    if len_sq > DEGENERATE_LENGTH_SQ && len_sq.is_finite() {
        v / len_sq.sqrt()
    } else {
        fallback
    }
}

/// Center and driving distance for the needle sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShellFrame {
    pub center: Vec3,
    pub driving_distance: f32,
}

impl ShellFrame {
    /// Derive the frame purely from the current palms.
    ///
    /// - two hands: palm midpoint, inter-palm distance
    /// - one hand: that palm, [`ONE_HAND_DRIVING_DISTANCE`]
    /// - no hands: origin, [`IDLE_DRIVING_DISTANCE`]
    pub fn from_hands(hands: &HandSnapshot) -> Self {
        match hands.hands() {
            [a, b, ..] => Self {
                center: (a.palm + b.palm) * 0.5,
                driving_distance: a.palm.distance(b.palm),
            },
            [a] => Self {
                center: a.palm,
                driving_distance: ONE_HAND_DRIVING_DISTANCE,
            },
            [] => Self {
                center: Vec3::ZERO,
                driving_distance: IDLE_DRIVING_DISTANCE,
            },
        }
    }

    pub fn radius(&self, base_radius: f32, radius_hand_scale: f32) -> f32 {
        (base_radius + self.driving_distance * radius_hand_scale).max(0.0)
    }
}

/// Radius of the shell a group lives on, never negative
pub fn shell_radius(inner_radius: f32, outer_multiplier: f32, group: ShellGroup) -> f32 {
    let radius = match group {
        ShellGroup::Inner => inner_radius,
        ShellGroup::Outer => inner_radius * outer_multiplier,
    };
    radius.max(0.0)
}

/// Project `position` onto the sphere (`center`, `radius`).
///
/// Returns the projected point and the unit radial direction used. When the
/// position sits on the center, `fallback_direction` is used instead.
pub fn project_onto_shell(
    position: Vec3,
    center: Vec3,
    radius: f32,
    fallback_direction: Vec3,
) -> (Vec3, Vec3) {
    let direction = safe_normalize(position - center, fallback_direction);
    (center + direction * radius, direction)
}

/// Remove the component of `velocity` along the unit `radial` direction
pub fn strip_radial(velocity: Vec3, radial: Vec3) -> Vec3 {
    velocity - radial * velocity.dot(radial)
}

/// Two unit tangents orthogonal to `radial` and to each other.
///
/// Built against world up; a radial direction that is itself near vertical
/// uses world x instead.
pub fn tangent_basis(radial: Vec3) -> (Vec3, Vec3) {
    let reference = if radial.dot(Vec3::Y).abs() > VERTICAL_THRESHOLD {
        Vec3::X
    } else {
        Vec3::Y
    };

    let first = safe_normalize(reference.cross(radial), Vec3::Z);
    let second = safe_normalize(radial.cross(first), Vec3::X);
    (first, second)
}

/// Phase of the travelling wave for particle `index` at `time` seconds
pub fn swim_phase(index: usize, time: f32) -> f32 {
    index as f32 * SWIM_PHASE_STEP + time * SWIM_WAVE_SPEED
}

/// Tangential swimming drive for a particle with radial direction `radial`
pub fn swim_drive(radial: Vec3, phase: f32, strength: f32) -> Vec3 {
    let (first, second) = tangent_basis(radial);
    (first * phase.cos() + second * phase.sin()) * strength
}
