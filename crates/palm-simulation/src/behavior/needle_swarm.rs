use super::TickInput;
use crate::params::SimulationConfig;
use crate::skeleton::SkeletonOverlay;
use crate::store::ParticleStore;
use glam::Vec3;
use palm_physics::{
    assign_center, needle_orientation, project_onto_shell, safe_normalize, shell_radius,
    strip_radial, swim_drive, swim_phase, ParticleTransform, CONVERGENCE_RATE, SNAP_DISTANCE,
};

/// Needles that swarm around each tracked palm.
///
/// Without hands everything gathers on one sphere at the origin. With hands,
/// each palm becomes a center and particles stick to the one they were
/// assigned until another is clearly closer.
#[derive(Debug, Clone)]
pub struct NeedleSwarm {
    radius: f32,
    outer_multiplier: f32,
    swim_strength: f32,
    viscosity: f32,
    size: f32,
    overlay: SkeletonOverlay,
    last_hand_count: Option<usize>,
    // scratch
    centers: Vec<Vec3>,
}

impl NeedleSwarm {
    pub fn new(config: &SimulationConfig) -> Self {
        let t = &config.tunables;
        Self {
            radius: t.swarm_radius(),
            outer_multiplier: t.swarm_outer_multiplier(),
            swim_strength: t.swim_strength(),
            viscosity: config.viscosity,
            size: config.size,
            overlay: SkeletonOverlay::default(),
            last_hand_count: None,
            centers: Vec::with_capacity(palm_physics::MAX_HANDS),
        }
    }

    /// Centers used by the most recent tick
    pub fn centers(&self) -> &[Vec3] {
        &self.centers
    }

    /// Target radius for a particle of `group`
    pub fn shell_radius(&self, group: palm_physics::ShellGroup) -> f32 {
        shell_radius(self.radius, self.outer_multiplier, group)
    }

    pub fn overlay(&self) -> &SkeletonOverlay {
        &self.overlay
    }

    pub(crate) fn update(
        &mut self,
        store: &mut ParticleStore,
        input: &TickInput<'_>,
        transforms: &mut [ParticleTransform],
    ) {
        let idle = input.hands.is_empty();

        if self.last_hand_count != Some(input.hands.len()) {
            log::debug!("needle swarm following {} hand(s)", input.hands.len());
            self.last_hand_count = Some(input.hands.len());
        }

        self.centers.clear();
        if idle {
            self.centers.push(Vec3::ZERO);
        } else {
            self.centers.extend(input.hands.palms());
        }

        for (i, (particle, transform)) in store
            .iter_mut()
            .zip(transforms.iter_mut())
            .enumerate()
        {
            let center_index = if idle {
                particle.assigned_center = None;
                0
            } else {
                let index =
                    assign_center(particle.assigned_center, particle.position, &self.centers)
                        .unwrap_or(0);
                particle.assigned_center = Some(index);
                index
            };
            let center = self.centers[center_index];
            let radius = shell_radius(self.radius, self.outer_multiplier, particle.group());

            // Converge toward the shell: fast lerp when far, exact snap when close
            let direction = safe_normalize(particle.position - center, particle.direction);
            let target = center + direction * radius;
            particle.target_position = Some(target);
            particle.direction = direction;

            if particle.position.distance(target) > SNAP_DISTANCE {
                particle.position = particle.position.lerp(target, CONVERGENCE_RATE);
            } else {
                particle.position = target;
            }

            let drive = swim_drive(direction, swim_phase(i, input.time), self.swim_strength);
            particle.velocity = strip_radial(particle.velocity + drive, direction) * self.viscosity;
            particle.position += particle.velocity;

            // Converged particles stay exactly on the shell
            let (projected, direction) =
                project_onto_shell(particle.position, center, radius, direction);
            if particle.position.distance(projected) <= SNAP_DISTANCE {
                particle.position = projected;
            }
            particle.direction = direction;
            particle.velocity = strip_radial(particle.velocity, direction);

            *transform = ParticleTransform::oriented(
                particle.position,
                needle_orientation(particle.position, center, direction),
                self.size,
            );
        }

        self.overlay.follow(input.hands);
    }
}
