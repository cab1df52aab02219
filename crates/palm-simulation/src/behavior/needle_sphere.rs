use super::TickInput;
use crate::params::SimulationConfig;
use crate::store::ParticleStore;
use glam::Vec3;
use palm_physics::{
    needle_orientation, project_onto_shell, safe_normalize, shell_radius, strip_radial,
    swim_drive, swim_phase, ParticleTransform, ShellFrame,
};

/// Needles locked onto two concentric shells around the hands.
///
/// Every tick each particle is put back on its shell along its stored
/// direction, swims tangentially, then is projected onto the shell again.
/// Velocity never keeps a radial component.
#[derive(Debug, Clone)]
pub struct NeedleSphere {
    base_radius: f32,
    outer_multiplier: f32,
    radius_hand_scale: f32,
    swim_strength: f32,
    viscosity: f32,
    size: f32,
    frame: ShellFrame,
}

impl NeedleSphere {
    pub fn new(config: &SimulationConfig) -> Self {
        let t = &config.tunables;
        Self {
            base_radius: t.base_radius(),
            outer_multiplier: t.outer_radius_multiplier(),
            radius_hand_scale: t.radius_hand_scale(),
            swim_strength: t.swim_strength(),
            viscosity: config.viscosity,
            size: config.size,
            frame: ShellFrame {
                center: Vec3::ZERO,
                driving_distance: palm_physics::IDLE_DRIVING_DISTANCE,
            },
        }
    }

    /// Frame used by the most recent tick
    pub fn frame(&self) -> ShellFrame {
        self.frame
    }

    /// Inner shell radius for the most recent tick
    pub fn inner_radius(&self) -> f32 {
        self.frame.radius(self.base_radius, self.radius_hand_scale)
    }

    pub fn outer_multiplier(&self) -> f32 {
        self.outer_multiplier
    }

    pub(crate) fn update(
        &mut self,
        store: &mut ParticleStore,
        input: &TickInput<'_>,
        transforms: &mut [ParticleTransform],
    ) {
        self.frame = ShellFrame::from_hands(input.hands);
        let center = self.frame.center;
        let inner = self.inner_radius();

        for (i, (particle, transform)) in store
            .iter_mut()
            .zip(transforms.iter_mut())
            .enumerate()
        {
            let radius = shell_radius(inner, self.outer_multiplier, particle.group());

            // Back onto the (possibly moved) shell at the last known direction
            let direction = safe_normalize(particle.direction, Vec3::Y);
            particle.position = center + direction * radius;

            let drive = swim_drive(direction, swim_phase(i, input.time), self.swim_strength);
            particle.velocity = strip_radial(particle.velocity + drive, direction) * self.viscosity;
            particle.position += particle.velocity;

            let (position, direction) =
                project_onto_shell(particle.position, center, radius, direction);
            particle.position = position;
            particle.direction = direction;
            particle.velocity = strip_radial(particle.velocity, direction);

            *transform = ParticleTransform::oriented(
                position,
                needle_orientation(position, center, direction),
                self.size,
            );
        }
    }
}
