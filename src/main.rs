//! Palm Field
//!
//! Four particle simulations side by side, each in its own window, all
//! steered by the same tracked hands.

mod hands;
mod instance;

use anyhow::Context;
use hands::SyntheticHands;
use instance::SimulationInstance;
use palm_renderer::{GpuContext, WindowRegistry};
use palm_simulation::{
    ControlSlot, ControlSource, Orchestrator, SimulationConfig, DEFAULT_TARGET_FPS,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalPosition, LogicalSize},
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

const WINDOW_SIZE: (u32, u32) = (640, 480);

/// Drag state of the right mouse button in one window
struct Drag {
    window: WindowId,
    last: Option<(f64, f64)>,
}

struct App {
    layout: Vec<(&'static str, SimulationConfig)>,
    windows: HashMap<WindowId, usize>,
    orchestrator: Option<Orchestrator<SimulationInstance>>,
    drag: Option<Drag>,
}

impl App {
    fn new() -> Self {
        let layout = ["responsive", "cohesive", "needle-sphere", "needle-swarm"]
            .into_iter()
            .zip(SimulationConfig::reference_set())
            .collect();

        Self {
            layout,
            windows: HashMap::new(),
            orchestrator: None,
            drag: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let mut registry = WindowRegistry::new();
        for (i, (id, config)) in self.layout.iter().enumerate() {
            let column = (i % 2) as u32;
            let row = (i / 2) as u32;
            let window_attributes = Window::default_attributes()
                .with_title(format!("Palm Field - {} ({} particles)", id, config.count))
                .with_inner_size(LogicalSize::new(WINDOW_SIZE.0, WINDOW_SIZE.1))
                .with_position(LogicalPosition::new(
                    column * (WINDOW_SIZE.0 + 16),
                    row * (WINDOW_SIZE.1 + 48),
                ));

            let window = Arc::new(
                event_loop
                    .create_window(window_attributes)
                    .with_context(|| format!("creating window '{}'", id))?,
            );
            self.windows.insert(window.id(), i);
            registry.register(*id, window);
        }

        let context = pollster::block_on(GpuContext::new()).context("initializing GPU")?;

        let mut instances = Vec::with_capacity(self.layout.len());
        for (id, config) in &self.layout {
            let instance = SimulationInstance::new(&context, &registry, id, config.clone())
                .with_context(|| format!("building simulation '{}'", id))?;
            instances.push(instance);
        }

        let controls = ControlSlot::new();
        let mut orchestrator = Orchestrator::new(instances, controls.clone());
        let subscription = SyntheticHands::new(DEFAULT_TARGET_FPS).subscribe(controls.sink());
        orchestrator.attach_subscription(subscription);
        orchestrator.start();

        self.orchestrator = Some(orchestrator);
        Ok(())
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut orchestrator) = self.orchestrator.take() {
            orchestrator.dispose();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.orchestrator.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            log::error!("Startup failed: {:#}", e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(&index) = self.windows.get(&window_id) else {
            return;
        };
        let Some(orchestrator) = &mut self.orchestrator else {
            return;
        };

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => self.shutdown(event_loop),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::KeyC),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Some(instance) = orchestrator.instance_mut(index) {
                    instance.reset_camera();
                }
            }

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                orchestrator.resize(index);
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Right,
                ..
            } => {
                self.drag = (state == ElementState::Pressed).then_some(Drag {
                    window: window_id,
                    last: None,
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                let Some(drag) = &mut self.drag else {
                    return;
                };
                if drag.window != window_id {
                    return;
                }
                if let Some(last) = drag.last {
                    let delta_x = (position.x - last.0) as f32;
                    let delta_y = (position.y - last.1) as f32;
                    if let Some(instance) = orchestrator.instance_mut(index) {
                        instance.camera_mut().rotate(-delta_x * 0.005, delta_y * 0.005);
                    }
                }
                drag.last = Some((position.x, position.y));
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_x, y) => y * 10.0,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                if let Some(instance) = orchestrator.instance_mut(index) {
                    let camera = instance.camera_mut();
                    camera.zoom(-scroll * camera.distance / 100.0);
                }
            }

            WindowEvent::RedrawRequested => match orchestrator.frame(index, Instant::now()) {
                Ok(_) => {}
                Err(e) if e.is_fatal() => {
                    log::error!("Render error: {}", e);
                    self.shutdown(event_loop);
                }
                Err(e) => log::warn!("Render error, frame skipped: {}", e),
            },

            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting palm field simulations...");

    let event_loop = EventLoop::new().context("creating event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app).context("running event loop")?;

    if let Some(mut orchestrator) = app.orchestrator.take() {
        orchestrator.dispose();
    }
    Ok(())
}
