//! One simulation bound to one window

use catppuccin::PALETTE;
use palm_physics::{HandSnapshot, ParticleTransform};
use palm_renderer::{
    Camera, CameraBinding, GpuContext, InstancedRenderer, Mesh, RenderError, SurfaceTarget,
    WindowRegistry,
};
use palm_simulation::{
    palette_linear, AnimationLoop, BehaviorKind, GeometryKind, RigPose, Simulation,
    SimulationConfig, SimulationHost, JOINT_COUNT,
};
use std::sync::Arc;
use winit::window::Window;

const JOINT_SCALE: f32 = 0.28;
const BONE_SCALE: f32 = 0.14;
/// Interior points drawn along each bone
const BONE_SAMPLES: usize = 3;

/// Everything that lives on the GPU; gone after dispose
struct GpuResources {
    target: SurfaceTarget,
    camera_binding: CameraBinding,
    particles: InstancedRenderer,
    skeleton: Option<InstancedRenderer>,
}

impl GpuResources {
    fn destroy(mut self) {
        if let Some(skeleton) = &mut self.skeleton {
            skeleton.destroy();
        }
        self.particles.destroy();
        self.camera_binding.destroy();
        self.target.destroy();
    }
}

pub struct SimulationInstance {
    id: String,
    window: Arc<Window>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    simulation: Simulation,
    camera: Camera,
    frame_loop: AnimationLoop,
    skeleton_color: [f32; 3],
    gpu: Option<GpuResources>,
}

/// Transforms for every joint blob and bone sample of `rigs`
fn skeleton_transforms(rigs: &[RigPose]) -> impl Iterator<Item = ParticleTransform> + '_ {
    rigs.iter().flat_map(|rig| {
        let joints = rig
            .joints()
            .map(|joint| ParticleTransform::translate(joint, JOINT_SCALE));
        let bones = rig.bones().flat_map(|(a, b)| {
            (1..=BONE_SAMPLES).map(move |i| {
                let t = i as f32 / (BONE_SAMPLES + 1) as f32;
                ParticleTransform::translate(a.lerp(b, t), BONE_SCALE)
            })
        });
        joints.chain(bones)
    })
}

impl SimulationInstance {
    /// Build the instance on the window registered as `id`.
    ///
    /// Fails when no such window exists or its surface cannot be used.
    pub fn new(
        context: &GpuContext,
        registry: &WindowRegistry,
        id: &str,
        config: SimulationConfig,
    ) -> Result<Self, RenderError> {
        let window = registry.resolve(id)?.clone();
        let target = SurfaceTarget::from_registry(context, registry, id)?;
        let (width, height) = target.size();

        let device = context.device.clone();
        let queue = context.queue.clone();

        let camera = Camera::new(width, height).framing(config.extent());
        let camera_binding = CameraBinding::new(&device);

        let mesh = match config.geometry {
            GeometryKind::Blob => Mesh::blob(),
            GeometryKind::Needle => Mesh::needle(config.tunables.needle_length()),
        };
        let particles = InstancedRenderer::new(
            &device,
            target.format(),
            &camera_binding.layout,
            &mesh,
            config.count,
            "Particle Pipeline",
        );

        let skeleton = (config.behavior == BehaviorKind::NeedleSwarm).then(|| {
            let per_rig = JOINT_COUNT + palm_simulation::BONES.len() * BONE_SAMPLES;
            InstancedRenderer::new(
                &device,
                target.format(),
                &camera_binding.layout,
                &Mesh::blob(),
                per_rig * palm_physics::MAX_HANDS,
                "Skeleton Pipeline",
            )
        });

        let simulation = Simulation::new(config);
        log::info!("✓ '{}' bound to its window ({}x{})", id, width, height);

        Ok(Self {
            id: id.to_string(),
            window,
            device,
            queue,
            simulation,
            camera,
            frame_loop: AnimationLoop::new(),
            skeleton_color: palette_linear(&PALETTE.mocha.colors.lavender),
            gpu: Some(GpuResources {
                target,
                camera_binding,
                particles,
                skeleton,
            }),
        })
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Back to the initial view of the whole simulation
    pub fn reset_camera(&mut self) {
        let size = self.window.inner_size();
        self.camera =
            Camera::new(size.width, size.height).framing(self.simulation.config().extent());
    }
}

impl SimulationHost for SimulationInstance {
    type Error = RenderError;

    fn update(&mut self, delta_time: f32) {
        self.simulation.update(delta_time);

        let Some(gpu) = &mut self.gpu else {
            return;
        };
        gpu.particles
            .batch_mut()
            .write(self.simulation.transforms(), self.simulation.config().color);
        if let Some(skeleton) = &mut gpu.skeleton {
            skeleton
                .batch_mut()
                .write(skeleton_transforms(self.simulation.skeletons()), self.skeleton_color);
        }
    }

    fn render(&mut self) -> Result<(), RenderError> {
        let Some(gpu) = &mut self.gpu else {
            return Ok(());
        };

        gpu.particles.upload(&self.device, &self.queue);
        if let Some(skeleton) = &mut gpu.skeleton {
            skeleton.upload(&self.device, &self.queue);
        }
        gpu.camera_binding.update(&self.queue, &self.camera);

        let mut layers = vec![&gpu.particles];
        layers.extend(gpu.skeleton.as_ref());

        match gpu
            .target
            .render(&self.device, &self.queue, &gpu.camera_binding, &layers)
        {
            Err(e) if e.is_surface_stale() => {
                log::debug!("'{}': {}, reconfiguring", self.id, e);
                gpu.target.reconfigure(&self.device);
                Ok(())
            }
            result => result,
        }
    }

    fn animation(&mut self) -> &mut AnimationLoop {
        &mut self.frame_loop
    }

    fn request_frame(&self) {
        self.window.request_redraw();
    }

    fn set_hand_controls(&mut self, controls: &HandSnapshot) {
        self.simulation.set_hand_controls(controls.clone());
    }

    fn handle_resize(&mut self) {
        let size = self.window.inner_size();
        if let Some(gpu) = &mut self.gpu {
            gpu.target.resize(&self.device, size.width, size.height);
        }
        self.camera.resize(size.width, size.height);
    }

    fn dispose(&mut self) {
        if let Some(gpu) = self.gpu.take() {
            gpu.destroy();
            log::debug!("'{}' released its GPU resources", self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use palm_simulation::BONES;

    #[test]
    fn test_skeleton_instances_per_rig() {
        let rigs = [
            RigPose::at_palm(Vec3::ZERO, 0),
            RigPose::at_palm(Vec3::X * 5.0, 1),
        ];
        let count = skeleton_transforms(&rigs).count();
        assert_eq!(count, 2 * (JOINT_COUNT + BONES.len() * BONE_SAMPLES));
    }

    #[test]
    fn test_bone_samples_lie_between_joints() {
        let rig = RigPose::at_palm(Vec3::new(1.0, 2.0, 3.0), 0);
        let samples: Vec<_> = skeleton_transforms(std::slice::from_ref(&rig))
            .skip(JOINT_COUNT)
            .collect();
        let (a, b) = rig.bones().next().unwrap();
        for sample in &samples[..BONE_SAMPLES] {
            let p = sample.translation;
            assert!((p.distance(a) + p.distance(b) - a.distance(b)).abs() < 1e-4);
        }
    }
}
