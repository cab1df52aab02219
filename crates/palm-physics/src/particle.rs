//! Particle state for the hand-driven field

use glam::Vec3;

/// Which of the two concentric shells a particle lives on in sphere modes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellGroup {
    Inner = 0,
    Outer = 1,
}

impl ShellGroup {
    /// Group for the particle created at `index` (alternating inner/outer)
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            ShellGroup::Inner
        } else {
            ShellGroup::Outer
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}

/// A single particle.
///
/// `group` is fixed at creation. The remaining optional fields are only
/// meaningful for the needle behaviors and stay untouched otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Last known unit radial direction from the active center
    pub direction: Vec3,
    group: ShellGroup,
    /// Sticky center binding (needle swarm)
    pub assigned_center: Option<usize>,
    /// Smoothing anchor on the target shell (needle swarm)
    pub target_position: Option<Vec3>,
}

impl Particle {
    pub fn new(index: usize, position: Vec3, velocity: Vec3, direction: Vec3) -> Self {
        Self {
            position,
            velocity,
            direction,
            group: ShellGroup::for_index(index),
            assigned_center: None,
            target_position: None,
        }
    }

    pub fn group(&self) -> ShellGroup {
        self.group
    }

    /// 0 for the inner shell, 1 for the outer shell
    pub fn group_index(&self) -> u8 {
        self.group.index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_alternates_with_index() {
        for i in 0..8 {
            let p = Particle::new(i, Vec3::ZERO, Vec3::ZERO, Vec3::Y);
            assert_eq!(p.group_index() as usize, i % 2);
        }
    }

    #[test]
    fn test_new_particle_has_no_assignment() {
        let p = Particle::new(3, Vec3::ONE, Vec3::ZERO, Vec3::X);
        assert_eq!(p.group(), ShellGroup::Outer);
        assert!(p.assigned_center.is_none());
        assert!(p.target_position.is_none());
    }
}
