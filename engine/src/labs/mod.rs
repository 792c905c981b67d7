//! Labs Module
//!
//! Fixed-topology demonstrations built on the same loop as the sandbox: one
//! or two bodies, a frame loop, and parameters that trigger a full reset
//! whenever they change.
//!
//! # Submodules
//!
//! - [`pendulum`] - bob on a point constraint under a fixed pivot
//! - [`incline`] - block sliding on a tilted static plane
//! - [`projectile`] - launched sphere with landing detection
//! - [`grading`] - quiz questions and landing grading

pub mod grading;
pub mod incline;
pub mod pendulum;
pub mod projectile;

pub use grading::{DEFAULT_TOLERANCE, SimulationQuestion, SimulationResult, grade_landing};
pub use incline::{InclineLab, InclineParams};
pub use pendulum::{PendulumLab, PendulumParams};
pub use projectile::{LandingDetector, ProjectileLab, ProjectileParams};

use std::time::Instant;

use glam::Vec3;
use tracing::info;

use crate::camera::{Camera, Viewport};
use crate::config::{CameraConfig, LabConfig};
use crate::physics::DynamicsWorld;
use crate::sandbox::{FrameClock, FrameLoop, FrameOutcome, FrameRenderer, FrameStats};
use crate::scene::Scene;

/// Background shared by every lab.
const LAB_BACKGROUND: u32 = 0x0b0b0b;

/// Nominal step used for the first frame's delta.
const NOMINAL_STEP: f32 = 1.0 / 60.0;

/// World, scene, camera and loop state common to every lab.
#[derive(Debug)]
pub struct LabCore {
    pub world: DynamicsWorld,
    pub scene: Scene,
    pub camera: Camera,
    viewport: Viewport,
    clock: FrameClock,
    frame_loop: FrameLoop,
}

impl LabCore {
    pub fn new(gravity: f32, solver_iterations: usize, eye: Vec3, target: Vec3, max_dt: f32) -> Self {
        let viewport = Viewport::default();
        let camera_config = CameraConfig {
            position: eye,
            target,
            ..CameraConfig::default()
        };
        Self {
            world: DynamicsWorld::new(Vec3::new(0.0, -gravity, 0.0), solver_iterations),
            scene: Scene::new(LAB_BACKGROUND),
            camera: Camera::from_config(&camera_config, viewport.aspect()),
            viewport,
            clock: FrameClock::new(max_dt, NOMINAL_STEP),
            frame_loop: FrameLoop::default(),
        }
    }

    pub fn set_gravity(&mut self, gravity: f32) {
        self.world.set_gravity(Vec3::new(0.0, -gravity, 0.0));
    }

    /// Clamp the delta and step if playing. `None` once cancelled.
    pub fn advance(&mut self, raw_dt: f32) -> Option<(f32, bool)> {
        if self.frame_loop.is_cancelled() {
            return None;
        }
        let dt = self.clock.tick(raw_dt);
        let stepped = self.frame_loop.is_playing() && dt > 0.0;
        if stepped {
            self.world.step(dt);
            self.clock.record_step();
        }
        Some((dt, stepped))
    }

    /// Wall-clock delta since the previous frame.
    pub fn elapsed_since_last(&mut self, now: Instant) -> f32 {
        self.clock.elapsed_since_last(now)
    }

    pub fn render(&mut self, renderer: &mut dyn FrameRenderer) {
        let released = self.scene.take_released();
        if !released.is_empty() {
            renderer.release(&released);
        }
        renderer.render(&self.scene, &self.camera);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let viewport = Viewport::new(width as f32, height as f32);
        if viewport.is_empty() {
            return;
        }
        self.viewport = viewport;
        self.camera.set_aspect(viewport.aspect());
    }

    pub fn frame_loop(&self) -> &FrameLoop {
        &self.frame_loop
    }

    pub fn frame_loop_mut(&mut self) -> &mut FrameLoop {
        &mut self.frame_loop
    }

    pub fn stats(&self) -> FrameStats {
        self.clock.stats()
    }

    pub fn teardown(&mut self) {
        if self.frame_loop.is_cancelled() {
            return;
        }
        self.scene.dispose_all();
        self.frame_loop.cancel();
    }
}

/// A parameter-driven demonstration.
pub trait Lab {
    fn name(&self) -> &'static str;

    fn core(&self) -> &LabCore;

    fn core_mut(&mut self) -> &mut LabCore;

    /// Rebuild the initial condition from the current parameters.
    fn reset(&mut self);

    /// Copy simulated state onto the scene after a step.
    fn sync(&mut self);

    /// Nudge the two primary parameters by whole steps and reset.
    fn nudge(&mut self, primary: i32, secondary: i32);

    /// One-line live readout (window title, HUD).
    fn readout(&self) -> String;

    fn frame(&mut self, raw_dt: f32, renderer: &mut dyn FrameRenderer) -> FrameOutcome {
        let Some((dt, stepped)) = self.core_mut().advance(raw_dt) else {
            return FrameOutcome::Cancelled;
        };
        self.sync();
        self.core_mut().render(renderer);
        FrameOutcome::Rendered { dt, stepped }
    }

    fn frame_at(&mut self, now: Instant, renderer: &mut dyn FrameRenderer) -> FrameOutcome {
        let raw_dt = self.core_mut().elapsed_since_last(now);
        self.frame(raw_dt, renderer)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.core_mut().resize(width, height);
    }

    fn set_playing(&mut self, playing: bool) {
        self.core_mut().frame_loop_mut().set_playing(playing);
    }

    fn teardown(&mut self) {
        self.core_mut().teardown();
    }
}

/// Which lab a front-end is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabKind {
    Pendulum,
    Incline,
    Projectile,
}

impl LabKind {
    pub const ALL: [LabKind; 3] = [LabKind::Pendulum, LabKind::Incline, LabKind::Projectile];

    pub fn build(self, config: &LabConfig) -> Box<dyn Lab> {
        info!("starting {:?} lab", self);
        match self {
            LabKind::Pendulum => Box::new(PendulumLab::new(config.pendulum.clone(), config.max_frame_dt)),
            LabKind::Incline => Box::new(InclineLab::new(config.incline.clone(), config.max_frame_dt)),
            LabKind::Projectile => {
                Box::new(ProjectileLab::new(config.projectile.clone(), config.max_frame_dt))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::NullRenderer;

    #[test]
    fn test_every_lab_builds_and_renders() {
        let config = LabConfig::default();
        for kind in LabKind::ALL {
            let mut lab = kind.build(&config);
            let outcome = lab.frame(0.5, &mut NullRenderer);
            assert_eq!(outcome, FrameOutcome::Rendered { dt: 0.033, stepped: true });
            assert!(!lab.readout().is_empty());
            lab.teardown();
            assert_eq!(lab.frame(0.016, &mut NullRenderer), FrameOutcome::Cancelled);
        }
    }

    #[test]
    fn test_paused_lab_still_renders() {
        let mut lab = LabKind::Pendulum.build(&LabConfig::default());
        lab.set_playing(false);
        let outcome = lab.frame(0.016, &mut NullRenderer);
        assert_eq!(outcome, FrameOutcome::Rendered { dt: 0.016, stepped: false });
        assert_eq!(lab.core().world.step_count(), 0);
    }
}
