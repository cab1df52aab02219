//! # Palm Field Renderer
//!
//! Instanced mesh rendering for the particle views: one wgpu device shared
//! by every window, one surface target and camera per view.

pub mod camera;
pub mod context;
pub mod instance;
pub mod mesh;
pub mod renderer;
pub mod surface;

pub use camera::*;
pub use context::*;
pub use instance::*;
pub use mesh::*;
pub use renderer::*;
pub use surface::*;
