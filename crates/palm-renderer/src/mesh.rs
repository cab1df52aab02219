//! Particle meshes: a round blob and a three part needle
//!
//! Both are built on the CPU once per instance. Every mesh is centered on
//! the origin with its long axis along +Y, so the instance rotation alone
//! decides where it points.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::f32::consts::{PI, TAU};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

const BLOB_SEGMENTS: u32 = 12;
const BLOB_RINGS: u32 = 8;
const NEEDLE_SEGMENTS: u32 = 10;

impl Mesh {
    /// Unit UV sphere
    pub fn blob() -> Self {
        Self::uv_sphere(BLOB_SEGMENTS, BLOB_RINGS)
    }

    pub fn uv_sphere(segments: u32, rings: u32) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(2);
        let mut mesh = Mesh::default();

        for ring in 0..=rings {
            let phi = PI * ring as f32 / rings as f32;
            for segment in 0..=segments {
                let theta = TAU * segment as f32 / segments as f32;
                let normal = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
                mesh.vertices.push(Vertex::new(normal, normal));
            }
        }

        let stride = segments + 1;
        for ring in 0..rings {
            for segment in 0..segments {
                let a = ring * stride + segment;
                let b = a + stride;
                mesh.indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
            }
        }

        mesh
    }

    /// Handle, cross guard and blade merged into one mesh of total `length`.
    ///
    /// The blade tip is the +Y end.
    pub fn needle(length: f32) -> Self {
        let length = length.max(f32::EPSILON);
        let half = length * 0.5;
        let handle_top = -half + length * 0.3;
        let guard_top = handle_top + length * 0.05;

        let mut mesh = Mesh::default();
        // handle
        mesh.append(&Self::frustum(-half, handle_top, 0.06, 0.06, NEEDLE_SEGMENTS));
        // guard
        mesh.append(&Self::frustum(handle_top, guard_top, 0.22, 0.22, NEEDLE_SEGMENTS));
        // blade
        mesh.append(&Self::frustum(guard_top, half, 0.1, 0.0, NEEDLE_SEGMENTS));
        mesh
    }

    /// Closed truncated cone along +Y. A zero radius end collapses to a point.
    pub fn frustum(y0: f32, y1: f32, r0: f32, r1: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let mut mesh = Mesh::default();
        let slope = (r0 - r1) / (y1 - y0).max(f32::EPSILON);

        // side
        for segment in 0..=segments {
            let theta = TAU * segment as f32 / segments as f32;
            let (sin, cos) = theta.sin_cos();
            let normal = Vec3::new(cos, slope, sin).normalize();
            mesh.vertices
                .push(Vertex::new(Vec3::new(cos * r0, y0, sin * r0), normal));
            mesh.vertices
                .push(Vertex::new(Vec3::new(cos * r1, y1, sin * r1), normal));
        }
        for segment in 0..segments {
            let a = segment * 2;
            mesh.indices
                .extend_from_slice(&[a, a + 1, a + 2, a + 2, a + 1, a + 3]);
        }

        // caps
        for (y, r, normal) in [(y0, r0, Vec3::NEG_Y), (y1, r1, Vec3::Y)] {
            if r <= 0.0 {
                continue;
            }
            let center = mesh.vertices.len() as u32;
            mesh.vertices.push(Vertex::new(Vec3::new(0.0, y, 0.0), normal));
            for segment in 0..=segments {
                let theta = TAU * segment as f32 / segments as f32;
                let (sin, cos) = theta.sin_cos();
                mesh.vertices
                    .push(Vertex::new(Vec3::new(cos * r, y, sin * r), normal));
            }
            for segment in 0..segments {
                let a = center + 1 + segment;
                mesh.indices.extend_from_slice(&[center, a, a + 1]);
            }
        }

        mesh
    }

    pub fn append(&mut self, other: &Mesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Axis-aligned bounds (min, max)
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.vertices.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(min, max), v| {
                let p = Vec3::from_array(v.position);
                (min.min(p), max.max(p))
            },
        )
    }
}
