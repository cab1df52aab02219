//! Nearest-center assignment with hysteresis
//!
//! A particle keeps its current center until another one is clearly closer,
//! so two nearly equidistant hands don't make particles flicker between them.

use crate::constants::HYSTERESIS_RATIO;
use glam::Vec3;

/// Index and distance of the center closest to `position`
pub fn nearest_center(position: Vec3, centers: &[Vec3]) -> Option<(usize, f32)> {
    centers
        .iter()
        .enumerate()
        .map(|(i, c)| (i, position.distance(*c)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Stable assignment rule.
///
/// Unassigned particles (or ones whose center disappeared) take the nearest
/// center. Otherwise a switch only happens when the best alternative is
/// closer than `current_distance * ratio`.
pub fn sticky_assign(
    current: Option<usize>,
    position: Vec3,
    centers: &[Vec3],
    ratio: f32,
) -> Option<usize> {
    let (best, best_dist) = nearest_center(position, centers)?;

    match current {
        Some(current) if current < centers.len() => {
            let current_dist = position.distance(centers[current]);
            if best != current && best_dist < current_dist * ratio {
                Some(best)
            } else {
                Some(current)
            }
        }
        _ => Some(best),
    }
}

/// [`sticky_assign`] with the default ratio
pub fn assign_center(current: Option<usize>, position: Vec3, centers: &[Vec3]) -> Option<usize> {
    sticky_assign(current, position, centers, HYSTERESIS_RATIO)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTERS: [Vec3; 2] = [Vec3::new(-5.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0)];

    #[test]
    fn test_unassigned_takes_nearest() {
        assert_eq!(assign_center(None, Vec3::new(3.0, 1.0, 0.0), &CENTERS), Some(1));
        assert_eq!(assign_center(None, Vec3::new(-1.0, 0.0, 0.0), &CENTERS), Some(0));
    }

    #[test]
    fn test_marginally_closer_alternative_does_not_steal() {
        // Distance to center 0 is 10, to center 1 is 9.5 (5% closer)
        let position = Vec3::new(4.5, 0.0, 0.0);
        let centers = [Vec3::new(-5.5, 0.0, 0.0), Vec3::new(14.0, 0.0, 0.0)];
        assert!((position.distance(centers[0]) - 10.0).abs() < 1e-5);
        assert!((position.distance(centers[1]) - 9.5).abs() < 1e-5);

        assert_eq!(sticky_assign(Some(0), position, &centers, 0.8), Some(0));
    }

    #[test]
    fn test_clearly_closer_alternative_steals() {
        // Distance to center 0 is 10, to center 1 is 7.5 (25% closer)
        let position = Vec3::ZERO;
        let centers = [Vec3::new(-10.0, 0.0, 0.0), Vec3::new(7.5, 0.0, 0.0)];
        assert_eq!(sticky_assign(Some(0), position, &centers, 0.8), Some(1));
    }

    #[test]
    fn test_vanished_center_is_reassigned() {
        let centers = [Vec3::new(2.0, 0.0, 0.0)];
        assert_eq!(assign_center(Some(1), Vec3::ZERO, &centers), Some(0));
    }

    #[test]
    fn test_no_centers_means_no_assignment() {
        assert_eq!(assign_center(Some(0), Vec3::ZERO, &[]), None);
    }
}
