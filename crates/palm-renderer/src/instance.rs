//! Per-instance data streamed to the GPU every tick

use bytemuck::{Pod, Zeroable};
use palm_physics::ParticleTransform;
use std::borrow::Borrow;

/// Model matrix and color of one drawn particle
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl InstanceRaw {
    pub fn new(transform: &ParticleTransform, color: [f32; 3]) -> Self {
        Self {
            model: transform.to_matrix().to_cols_array_2d(),
            color: [color[0], color[1], color[2], 1.0],
        }
    }

    /// Locations 2..=6; 0 and 1 belong to the mesh vertex
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: 16,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: 32,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: 48,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: 64,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// CPU side copy of an instance buffer.
///
/// Writes only touch this copy and raise the dirty flag; the renderer uploads
/// the whole batch with one buffer write when it takes the flag.
#[derive(Debug, Clone, Default)]
pub struct InstanceBatch {
    instances: Vec<InstanceRaw>,
    dirty: bool,
}

impl InstanceBatch {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            dirty: false,
        }
    }

    /// Replace the batch contents, one instance per transform
    pub fn write<I>(&mut self, transforms: I, color: [f32; 3])
    where
        I: IntoIterator,
        I::Item: Borrow<ParticleTransform>,
    {
        self.instances.clear();
        self.instances.extend(
            transforms
                .into_iter()
                .map(|t| InstanceRaw::new(t.borrow(), color)),
        );
        self.dirty = true;
    }

    pub fn clear(&mut self) {
        if !self.instances.is_empty() {
            self.instances.clear();
            self.dirty = true;
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Contents to upload, if anything changed since the last call
    pub fn take_dirty(&mut self) -> Option<&[InstanceRaw]> {
        if std::mem::take(&mut self.dirty) {
            Some(self.instances.as_slice())
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn as_slice(&self) -> &[InstanceRaw] {
        &self.instances
    }
}
