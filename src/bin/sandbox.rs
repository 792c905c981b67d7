//! Physics Sandbox
//!
//! Free-form rigid-body sandbox: spawn boxes and spheres, drag them with the
//! mouse, select, link and launch them.
//!
//! Run with: `cargo run --bin sandbox -- [--config sandbox.json] [--log-level debug]`
//!
//! Controls:
//! - Left mouse: pick (toggle selection) and drag
//! - Right mouse: toggle selection without dragging
//! - B / S: add box / sphere
//! - C: clear
//! - Space: play / pause
//! - I: impulse (0, 5, 0) on the selection
//! - L: link the two selected bodies with a distance constraint
//! - Delete / Backspace: remove the selection
//! - Up / Down: gravity ±0.5 m/s²
//! - ESC: exit

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use glam::Vec3;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use physics_lab_engine::config::SandboxConfig;
use physics_lab_engine::input::PointerTracker;
use physics_lab_engine::render::{GpuContext, GpuContextConfig, MeshRenderer};
use physics_lab_engine::sandbox::{Sandbox, SpawnOptions};

const IMPULSE: Vec3 = Vec3::new(0.0, 5.0, 0.0);
const GRAVITY_STEP: f32 = 0.5;
const TITLE_INTERVAL: f32 = 0.5;

#[derive(Parser, Debug)]
#[command(name = "sandbox", about = "Interactive rigid-body sandbox")]
struct Args {
    /// JSON file overriding the default sandbox configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter (e.g. `info`, `debug`, `physics_lab_engine=trace`); overrides RUST_LOG
    #[arg(long)]
    log_level: Option<String>,
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

struct SandboxApp {
    sandbox: Sandbox,
    window: Option<Arc<Window>>,
    renderer: Option<MeshRenderer>,
    pointer: PointerTracker,
    title_timer: Instant,
}

impl SandboxApp {
    fn new(config: SandboxConfig) -> Self {
        let mut sandbox = Sandbox::new(config);
        sandbox.on_selection_change(|ids| info!("selection: {:?}", ids));
        Self {
            sandbox,
            window: None,
            renderer: None,
            pointer: PointerTracker::new(),
            title_timer: Instant::now(),
        }
    }

    fn initialize(&mut self, window: Arc<Window>) -> Result<(), physics_lab_engine::RenderError> {
        let render = &self.sandbox.config().render;
        let gpu = GpuContext::new(
            Arc::clone(&window),
            GpuContextConfig {
                vsync: render.vsync,
                ..Default::default()
            },
        )?;
        let size = window.inner_size();
        self.sandbox.resize(size.width, size.height);
        self.renderer = Some(MeshRenderer::new(gpu));
        self.window = Some(window);
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::KeyB => {
                self.sandbox.add_box(None, SpawnOptions::default());
            }
            KeyCode::KeyS => {
                self.sandbox.add_sphere(None, SpawnOptions::default());
            }
            KeyCode::KeyC => self.sandbox.clear(),
            KeyCode::Space => {
                let playing = !self.sandbox.is_playing();
                self.sandbox.set_playing(playing);
                info!("{}", if playing { "playing" } else { "paused" });
            }
            KeyCode::KeyI => {
                let selected = self.sandbox.get_selected();
                self.sandbox.apply_impulse(&selected, IMPULSE);
            }
            KeyCode::KeyL => match self.sandbox.get_selected().as_slice() {
                [a, b] => {
                    self.sandbox.add_distance_constraint(*a, *b, None);
                }
                other => info!("select exactly two bodies to link ({} selected)", other.len()),
            },
            KeyCode::Delete | KeyCode::Backspace => self.sandbox.remove_selected(),
            KeyCode::ArrowUp => {
                let g = self.sandbox.gravity() + GRAVITY_STEP;
                self.sandbox.set_gravity(g);
            }
            KeyCode::ArrowDown => {
                let g = self.sandbox.gravity() - GRAVITY_STEP;
                self.sandbox.set_gravity(g);
            }
            _ => {}
        }
    }

    fn update_title(&mut self) {
        if self.title_timer.elapsed().as_secs_f32() < TITLE_INTERVAL {
            return;
        }
        self.title_timer = Instant::now();
        if let Some(window) = &self.window {
            let stats = self.sandbox.stats();
            window.set_title(&format!(
                "Physics Sandbox | {} bodies  g {:.2}  {}  {:.0} fps",
                self.sandbox.registry().len(),
                self.sandbox.gravity(),
                if self.sandbox.is_playing() { "playing" } else { "paused" },
                stats.fps,
            ));
        }
    }
}

impl ApplicationHandler for SandboxApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let render = &self.sandbox.config().render;
        let attrs = WindowAttributes::default()
            .with_title("Physics Sandbox")
            .with_inner_size(PhysicalSize::new(render.width, render.height));
        let result = event_loop
            .create_window(attrs)
            .map_err(|err| err.to_string())
            .and_then(|window| self.initialize(Arc::new(window)).map_err(|err| err.to_string()));
        if let Err(err) = result {
            error!("failed to start renderer: {}", err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.sandbox.teardown();
                event_loop.exit();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                if let PhysicalKey::Code(key) = event.physical_key {
                    if key == KeyCode::Escape {
                        self.sandbox.teardown();
                        event_loop.exit();
                        return;
                    }
                    self.handle_key(key);
                }
            }

            WindowEvent::MouseInput { button, state, .. } => {
                let pointer_event = match state {
                    ElementState::Pressed => self.pointer.pressed(button.into()),
                    ElementState::Released => self.pointer.released(button.into()),
                };
                self.sandbox.handle(pointer_event);
            }

            WindowEvent::CursorMoved { position, .. } => {
                let pointer_event = self.pointer.moved(position.x as f32, position.y as f32);
                self.sandbox.handle(pointer_event);
            }

            WindowEvent::CursorLeft { .. } => {
                let pointer_event = self.pointer.left();
                self.sandbox.handle(pointer_event);
            }

            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size.width, size.height);
                }
                self.sandbox.resize(size.width, size.height);
            }

            WindowEvent::RedrawRequested => {
                if let Some(renderer) = self.renderer.as_mut() {
                    self.sandbox.frame_at(Instant::now(), renderer);
                }
                self.update_title();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    let config = match &args.config {
        Some(path) => SandboxConfig::load(path)?,
        None => SandboxConfig::default(),
    };
    info!("starting sandbox (gravity {:.2} m/s²)", config.world.gravity);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = SandboxApp::new(config);
    event_loop.run_app(&mut app)?;
    Ok(())
}
