//! Physics Labs
//!
//! Pendulum, inclined plane and projectile demonstrations with keyboard
//! parameter controls. With `--question` the projectile lab runs in quiz
//! mode and grades the landing position.
//!
//! Run with: `cargo run --bin labs -- [--lab projectile] [--question q.json] [--config labs.json]`
//!
//! Controls:
//! - 1 / 2 / 3: pendulum / inclined plane / projectile
//! - Up / Down: first parameter (length, angle, speed)
//! - Left / Right: second parameter (release angle, friction, launch angle)
//! - R: reset
//! - Enter: launch (projectile)
//! - Space: play / pause
//! - ESC: exit

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use physics_lab_engine::config::{LabConfig, load_json};
use physics_lab_engine::labs::{Lab, LabKind, ProjectileLab, SimulationQuestion};
use physics_lab_engine::render::{GpuContext, GpuContextConfig, MeshRenderer};

const TITLE_INTERVAL: f32 = 0.25;
const WINDOW_SIZE: (u32, u32) = (1280, 720);

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LabArg {
    Pendulum,
    Incline,
    Projectile,
}

impl From<LabArg> for LabKind {
    fn from(arg: LabArg) -> Self {
        match arg {
            LabArg::Pendulum => LabKind::Pendulum,
            LabArg::Incline => LabKind::Incline,
            LabArg::Projectile => LabKind::Projectile,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "labs", about = "Pendulum, inclined plane and projectile labs")]
struct Args {
    /// JSON file overriding the default lab parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter (e.g. `info`, `debug`); overrides RUST_LOG
    #[arg(long)]
    log_level: Option<String>,

    /// Lab shown at start-up
    #[arg(long, value_enum, default_value = "pendulum")]
    lab: LabArg,

    /// Simulation question (JSON) for quiz mode in the projectile lab
    #[arg(long)]
    question: Option<PathBuf>,
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

struct LabsApp {
    config: LabConfig,
    question: Option<SimulationQuestion>,
    kind: LabKind,
    lab: Box<dyn Lab>,
    window: Option<Arc<Window>>,
    renderer: Option<MeshRenderer>,
    title_timer: Instant,
}

impl LabsApp {
    fn new(config: LabConfig, question: Option<SimulationQuestion>, kind: LabKind) -> Self {
        let lab = Self::build(&config, question.as_ref(), kind);
        Self {
            config,
            question,
            kind,
            lab,
            window: None,
            renderer: None,
            title_timer: Instant::now(),
        }
    }

    fn build(config: &LabConfig, question: Option<&SimulationQuestion>, kind: LabKind) -> Box<dyn Lab> {
        match (kind, question) {
            (LabKind::Projectile, Some(question)) => {
                info!("quiz mode: {} (target x = {:.2})", question.prompt, question.target_x);
                Box::new(ProjectileLab::for_question(question.clone(), config.max_frame_dt))
            }
            _ => kind.build(config),
        }
    }

    fn switch_to(&mut self, kind: LabKind) {
        if kind == self.kind {
            return;
        }
        self.lab.teardown();
        self.lab = Self::build(&self.config, self.question.as_ref(), kind);
        self.kind = kind;
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.clear_cache();
            let (width, height) = renderer.gpu().dimensions();
            self.lab.resize(width, height);
        }
    }

    fn initialize(&mut self, window: Arc<Window>) -> Result<(), physics_lab_engine::RenderError> {
        let gpu = GpuContext::new(Arc::clone(&window), GpuContextConfig::default())?;
        let size = window.inner_size();
        self.lab.resize(size.width, size.height);
        self.renderer = Some(MeshRenderer::new(gpu));
        self.window = Some(window);
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Digit1 => self.switch_to(LabKind::Pendulum),
            KeyCode::Digit2 => self.switch_to(LabKind::Incline),
            KeyCode::Digit3 => self.switch_to(LabKind::Projectile),
            KeyCode::ArrowUp => self.lab.nudge(1, 0),
            KeyCode::ArrowDown => self.lab.nudge(-1, 0),
            KeyCode::ArrowRight => self.lab.nudge(0, 1),
            KeyCode::ArrowLeft => self.lab.nudge(0, -1),
            KeyCode::KeyR => self.lab.reset(),
            KeyCode::Enter | KeyCode::NumpadEnter if self.kind == LabKind::Projectile => self.lab.reset(),
            KeyCode::Space => {
                let playing = !self.lab.core().frame_loop().is_playing();
                self.lab.set_playing(playing);
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
            window.set_title(&format!("{}  ({:.0} fps)", self.lab.readout(), self.lab.core().stats().fps));
        }
    }
}

impl ApplicationHandler for LabsApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = WindowAttributes::default()
            .with_title(self.lab.name())
            .with_inner_size(PhysicalSize::new(WINDOW_SIZE.0, WINDOW_SIZE.1));
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
                self.lab.teardown();
                event_loop.exit();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                if let PhysicalKey::Code(key) = event.physical_key {
                    if key == KeyCode::Escape {
                        self.lab.teardown();
                        event_loop.exit();
                        return;
                    }
                    self.handle_key(key);
                }
            }

            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size.width, size.height);
                }
                self.lab.resize(size.width, size.height);
            }

            WindowEvent::RedrawRequested => {
                if let Some(renderer) = self.renderer.as_mut() {
                    self.lab.frame_at(Instant::now(), renderer);
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
        Some(path) => LabConfig::load(path)?,
        None => LabConfig::default(),
    };
    let question: Option<SimulationQuestion> = match &args.question {
        Some(path) => Some(load_json(path)?),
        None => None,
    };
    let kind = if question.is_some() {
        LabKind::Projectile
    } else {
        args.lab.into()
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = LabsApp::new(config, question, kind);
    event_loop.run_app(&mut app)?;
    Ok(())
}
