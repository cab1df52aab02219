//! Named drawing surfaces and the per-view render target

use crate::context::{GpuContext, RenderError};
use crate::renderer::{CameraBinding, InstancedRenderer, DEPTH_FORMAT};
use catppuccin::PALETTE;
use palm_physics::linear_rgb;
use std::collections::HashMap;
use std::sync::Arc;
use winit::window::Window;

/// Surfaces looked up by identifier when an instance is built.
///
/// Generic so the lookup works without a windowing system.
#[derive(Debug, Clone)]
pub struct SurfaceRegistry<T> {
    surfaces: HashMap<String, T>,
}

pub type WindowRegistry = SurfaceRegistry<Arc<Window>>;

impl<T> Default for SurfaceRegistry<T> {
    fn default() -> Self {
        Self {
            surfaces: HashMap::new(),
        }
    }
}

impl<T> SurfaceRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `surface` under `id`, returning whatever it replaced
    pub fn register(&mut self, id: impl Into<String>, surface: T) -> Option<T> {
        self.surfaces.insert(id.into(), surface)
    }

    pub fn resolve(&self, id: &str) -> Result<&T, RenderError> {
        self.surfaces
            .get(id)
            .ok_or_else(|| RenderError::MissingSurface(id.to_string()))
    }

    pub fn remove(&mut self, id: &str) -> Option<T> {
        self.surfaces.remove(id)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.surfaces.keys().map(String::as_str)
    }
}

/// Catppuccin Mocha base, linear
pub fn clear_color() -> wgpu::Color {
    let base = PALETTE.mocha.colors.base.rgb;
    let [r, g, b] = linear_rgb(base.r, base.g, base.b);
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: 1.0,
    }
}

/// A configured window surface with its depth buffer
pub struct SurfaceTarget {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
}

impl SurfaceTarget {
    pub fn new(
        context: &GpuContext,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let surface_caps = surface.get_capabilities(&context.adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| RenderError::UnsupportedSurface("no texture formats".into()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&context.device, &config);

        let (depth_texture, depth_view) = Self::create_depth_texture(&context.device, &config);

        Ok(Self {
            surface,
            config,
            depth_texture,
            depth_view,
        })
    }

    /// Resolve `id` in `registry` and build a target on that window
    pub fn from_registry(
        context: &GpuContext,
        registry: &WindowRegistry,
        id: &str,
    ) -> Result<Self, RenderError> {
        let window = registry.resolve(id)?;
        let size = window.inner_size();
        let surface = context.create_surface(window.clone())?;
        Self::new(context, surface, size.width, size.height)
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());
        (depth_texture, depth_view)
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Zero sizes (minimized windows) are ignored
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.reconfigure(device);
    }

    pub fn reconfigure(&mut self, device: &wgpu::Device) {
        self.surface.configure(device, &self.config);
        self.depth_texture.destroy();
        let (depth_texture, depth_view) = Self::create_depth_texture(device, &self.config);
        self.depth_texture = depth_texture;
        self.depth_view = depth_view;
    }

    /// Clear and draw every layer into the next swapchain image
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        camera: &CameraBinding,
        layers: &[&InstancedRenderer],
    ) -> Result<(), RenderError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &camera.bind_group, &[]);
            for layer in layers {
                layer.draw(&mut render_pass);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    pub fn destroy(&self) {
        self.depth_texture.destroy();
    }
}
