//! Shared wgpu device setup

use std::sync::Arc;
use thiserror::Error;
use winit::window::Window;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to create surface: {0}")]
    SurfaceCreation(String),
    #[error("No drawing surface registered as '{0}'")]
    MissingSurface(String),
    #[error("Failed to get adapter: {0}")]
    AdapterNotFound(String),
    #[error("Failed to create device: {0}")]
    DeviceCreation(String),
    #[error("Surface is not supported by the adapter: {0}")]
    UnsupportedSurface(String),
    #[error("Surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

impl RenderError {
    /// Errors after which no instance can keep rendering
    pub fn is_fatal(&self) -> bool {
        matches!(self, RenderError::Surface(wgpu::SurfaceError::OutOfMemory))
    }

    /// Surface needs reconfiguring before the next frame
    pub fn is_surface_stale(&self) -> bool {
        matches!(
            self,
            RenderError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)
        )
    }
}

/// One device and queue shared by every simulation view
pub struct GpuContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuContext {
    pub async fn new() -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| RenderError::AdapterNotFound(e.to_string()))?;

        log::info!("✓ Using GPU: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Palm Field Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| RenderError::DeviceCreation(e.to_string()))?;

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
        })
    }

    /// New surface for `window`, checked against the shared adapter
    pub fn create_surface(
        &self,
        window: Arc<Window>,
    ) -> Result<wgpu::Surface<'static>, RenderError> {
        let surface = self
            .instance
            .create_surface(window)
            .map_err(|e| RenderError::SurfaceCreation(e.to_string()))?;

        if !self.adapter.is_surface_supported(&surface) {
            return Err(RenderError::UnsupportedSurface(
                self.adapter.get_info().name,
            ));
        }
        Ok(surface)
    }
}
