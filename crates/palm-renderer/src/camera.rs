//! Orbit camera for one simulation view

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

/// Camera uniform for GPU
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 3],
    pub _padding: f32,
}

/// Camera orbiting a fixed target
#[derive(Debug, Clone)]
pub struct Camera {
    pub distance: f32,
    pub rotation: Quat,
    pub target: Vec3,
    pub aspect: f32,
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        let rotation = Quat::from_rotation_x(-0.3);

        Self {
            distance: 60.0,
            rotation,
            target: Vec3::ZERO,
            aspect: aspect_ratio(width, height),
            fovy: 45.0_f32.to_radians(),
            znear: 0.1,
            zfar: 1000.0,
        }
    }

    /// Back off far enough that a sphere of radius `extent` fits the view
    pub fn framing(mut self, extent: f32) -> Self {
        let half_fov = (self.fovy * 0.5).min(self.fovy * 0.5 * self.aspect.min(1.0));
        self.distance = (extent / half_fov.sin()).clamp(1.0, self.zfar * 0.5);
        self
    }

    pub fn position(&self) -> Vec3 {
        let offset = self.rotation * Vec3::new(0.0, 0.0, self.distance);
        self.target + offset
    }

    pub fn rotate(&mut self, delta_x: f32, delta_y: f32) {
        let up = self.rotation * Vec3::Y;
        let yaw_rotation = Quat::from_axis_angle(up, delta_x);

        let right = self.rotation * Vec3::X;
        let pitch_rotation = Quat::from_axis_angle(right, -delta_y);

        self.rotation = yaw_rotation * pitch_rotation * self.rotation;
        self.rotation = self.rotation.normalize();
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance + delta).clamp(1.0, self.zfar * 0.5);
    }

    pub fn build_view_projection_matrix(&self) -> Mat4 {
        let position = self.position();
        let rotation_matrix = Mat4::from_quat(self.rotation.conjugate());
        let translation_matrix = Mat4::from_translation(-position);
        let view = rotation_matrix * translation_matrix;
        let proj = Mat4::perspective_rh(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }

    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.build_view_projection_matrix().to_cols_array_2d(),
            position: self.position().to_array(),
            _padding: 0.0,
        }
    }

    /// Minimized windows report a zero size; the old aspect is kept then
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = aspect_ratio(width, height);
        }
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}
