//! Projectile lab: a sphere launched in the X-Y plane.
//!
//! While the ball is at or above y = 0 its path is recorded; the first frame
//! it is found below, the [`LandingDetector`] fires once with the last valid
//! x. In quiz mode that value is graded against the question's target.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Lab, LabCore, SimulationQuestion, SimulationResult};
use crate::physics::{BodyDesc, BodyHandle, ColliderShape, LaunchParams};
use crate::scene::{Geometry, Material, Mesh, MeshHandle};

const BALL_RADIUS: f32 = 0.2;
const BALL_COLOR: u32 = 0xf0b429;
const GROUND_COLOR: u32 = 0x1b1f24;
const TARGET_COLOR: u32 = 0x22c55e;
/// Quiz target post: 0.2 m tall, centered at y = 0.1.
const TARGET_HEIGHT: f32 = 0.2;
const TARGET_THICKNESS: f32 = 0.04;
const SOLVER_ITERATIONS: usize = 10;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProjectileParams {
    /// Launch speed (m/s)
    pub speed: f32,
    /// Elevation (degrees)
    pub angle_deg: f32,
    /// Gravity magnitude (m/s²)
    pub gravity: f32,
    /// Launch height of the ball center (m)
    pub launch_height: f32,
}

impl Default for ProjectileParams {
    fn default() -> Self {
        Self {
            speed: 20.0,
            angle_deg: 45.0,
            gravity: 9.81,
            launch_height: 0.2,
        }
    }
}

impl ProjectileParams {
    pub fn sanitized(&self) -> Self {
        Self {
            speed: self.speed.max(0.0),
            angle_deg: self.angle_deg.clamp(-90.0, 90.0),
            gravity: self.gravity.max(0.0),
            launch_height: self.launch_height.max(0.0),
        }
    }

    pub fn launch(&self) -> LaunchParams {
        LaunchParams {
            speed: self.speed,
            angle_deg: self.angle_deg,
            gravity: self.gravity,
            height: self.launch_height,
        }
    }
}

/// One-shot "crossed below the ground" edge trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LandingDetector {
    last_valid_x: Option<f32>,
    landed_x: Option<f32>,
}

impl LandingDetector {
    /// Feed the current position. Returns the landing x exactly once per arming.
    pub fn observe(&mut self, position: Vec2) -> Option<f32> {
        if position.y >= 0.0 {
            self.last_valid_x = Some(position.x);
            return None;
        }
        if self.landed_x.is_some() {
            return None;
        }
        let x = self.last_valid_x.unwrap_or(position.x);
        self.landed_x = Some(x);
        Some(x)
    }

    pub fn landed_x(&self) -> Option<f32> {
        self.landed_x
    }

    pub fn rearm(&mut self) {
        *self = Self::default();
    }
}

type LandingCallback = Box<dyn FnMut(f32)>;

pub struct ProjectileLab {
    core: LabCore,
    params: ProjectileParams,
    ball: Option<BodyHandle>,
    ball_mesh: MeshHandle,
    target_marker: Option<MeshHandle>,
    trajectory: Vec<Vec2>,
    detector: LandingDetector,
    question: Option<SimulationQuestion>,
    result: Option<SimulationResult>,
    on_landed: Option<LandingCallback>,
}

impl ProjectileLab {
    pub fn new(params: ProjectileParams, max_dt: f32) -> Self {
        let params = params.sanitized();
        let mut core = LabCore::new(
            params.gravity,
            SOLVER_ITERATIONS,
            Vec3::new(8.0, 5.0, 12.0),
            Vec3::new(0.0, 1.0, 0.0),
            max_dt,
        );
        // Visual only: the ball must be able to cross y = 0.
        core.scene.add(Mesh::new(
            Geometry::Plane { width: 60.0, depth: 60.0 },
            Material::new(GROUND_COLOR),
        ));
        let ball_mesh = core.scene.add(Mesh::new(
            Geometry::Sphere { radius: BALL_RADIUS },
            Material::new(BALL_COLOR),
        ));
        let mut lab = Self {
            core,
            params,
            ball: None,
            ball_mesh,
            target_marker: None,
            trajectory: Vec::new(),
            detector: LandingDetector::default(),
            question: None,
            result: None,
            on_landed: None,
        };
        lab.reset();
        lab
    }

    /// Quiz mode: gravity comes from the question and launch parameters are
    /// clamped to its bounds.
    pub fn for_question(question: SimulationQuestion, max_dt: f32) -> Self {
        let params = ProjectileParams {
            speed: question.initial_velocity(),
            angle_deg: question.clamp_angle(45.0),
            gravity: question.gravity(),
            ..ProjectileParams::default()
        };
        let mut lab = Self::new(params, max_dt);
        let target_x = question.target_x;
        lab.target_marker = Some(lab.core.scene.add(Mesh::new(
            Geometry::Segment {
                from: Vec3::new(target_x, 0.0, 0.0),
                to: Vec3::new(target_x, TARGET_HEIGHT, 0.0),
                thickness: TARGET_THICKNESS,
            },
            Material::new(TARGET_COLOR),
        )));
        lab.question = Some(question);
        lab.reset();
        lab
    }

    /// Called with the landing x exactly once per launch.
    pub fn on_landed(&mut self, callback: impl FnMut(f32) + 'static) {
        self.on_landed = Some(Box::new(callback));
    }

    pub fn params(&self) -> &ProjectileParams {
        &self.params
    }

    /// Replace the launch parameters and relaunch.
    pub fn set_params(&mut self, params: ProjectileParams) {
        self.params = self.constrained(params);
        self.reset();
    }

    /// Full reset plus launch velocity.
    pub fn launch(&mut self) {
        self.reset();
    }

    pub fn question(&self) -> Option<&SimulationQuestion> {
        self.question.as_ref()
    }

    /// Mesh marking the question's target x (quiz mode only).
    pub fn target_marker(&self) -> Option<MeshHandle> {
        self.target_marker
    }

    pub fn trajectory(&self) -> &[Vec2] {
        &self.trajectory
    }

    pub fn landed_x(&self) -> Option<f32> {
        self.detector.landed_x()
    }

    /// Graded outcome of the current launch (quiz mode only).
    pub fn result(&self) -> Option<&SimulationResult> {
        self.result.as_ref()
    }

    /// Analytic landing distance for the current parameters.
    pub fn range(&self) -> f32 {
        self.params.launch().range()
    }

    /// Analytic apex height for the current parameters.
    pub fn max_height(&self) -> f32 {
        self.params.launch().max_height()
    }

    pub fn ball_position(&self) -> Option<Vec3> {
        self.core.world.translation(self.ball?)
    }

    fn constrained(&self, params: ProjectileParams) -> ProjectileParams {
        let mut params = params.sanitized();
        if let Some(question) = &self.question {
            params.speed = question.clamp_velocity(params.speed);
            params.angle_deg = question.clamp_angle(params.angle_deg);
            params.gravity = question.gravity();
        }
        params
    }

    fn landed(&mut self, x: f32) {
        info!("projectile landed at x = {:.3}", x);
        if let Some(question) = &self.question {
            let result = question.grade(x, self.params.speed, self.params.angle_deg);
            info!(
                "question {}: {} (target {:.2} ± {:.2})",
                result.question_id,
                if result.correct { "correct" } else { "incorrect" },
                result.target_x,
                result.tolerance
            );
            self.result = Some(result);
        }
        if let Some(callback) = self.on_landed.as_mut() {
            callback(x);
        }
        // Nothing left to watch; hold the ball where it came down.
        self.core.frame_loop_mut().set_playing(false);
    }
}

impl Lab for ProjectileLab {
    fn name(&self) -> &'static str {
        "Projectile"
    }

    fn core(&self) -> &LabCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut LabCore {
        &mut self.core
    }

    fn reset(&mut self) {
        if let Some(old) = self.ball.take() {
            self.core.world.remove_body(old);
        }
        self.core.set_gravity(self.params.gravity);
        self.trajectory.clear();
        self.detector.rearm();
        self.result = None;

        let start = Vec3::new(0.0, self.params.launch_height, 0.0);
        let ball = self
            .core
            .world
            .add_body(&BodyDesc::dynamic(ColliderShape::Ball { radius: BALL_RADIUS }, start, 1.0));
        self.core.world.set_linvel(ball, self.params.launch().velocity());
        self.ball = Some(ball);
        self.core.frame_loop_mut().set_playing(true);

        debug!(
            "projectile launch: v={:.2} m/s θ={:.1}° expected range {:.2} m",
            self.params.speed,
            self.params.angle_deg,
            self.params.launch().range()
        );
        self.sync();
    }

    fn sync(&mut self) {
        let Some(ball) = self.ball else { return };
        let Some(position) = self.core.world.translation(ball) else {
            return;
        };
        if let Some(mesh) = self.core.scene.get_mut(self.ball_mesh) {
            mesh.set_pose(position, Quat::IDENTITY);
        }
        let planar = Vec2::new(position.x, position.y);
        if planar.y >= 0.0 && self.trajectory.last() != Some(&planar) {
            self.trajectory.push(planar);
        }
        if let Some(x) = self.detector.observe(planar) {
            self.landed(x);
        }
    }

    fn nudge(&mut self, primary: i32, secondary: i32) {
        let mut params = self.params.clone();
        params.speed += primary as f32;
        params.angle_deg += secondary as f32;
        self.set_params(params);
    }

    fn readout(&self) -> String {
        let mut text = format!(
            "Projectile | v {:.1} m/s  θ {:.0}°  g {:.2}  range ≈ {:.2} m",
            self.params.speed,
            self.params.angle_deg,
            self.params.gravity,
            self.params.launch().range(),
        );
        if let Some(x) = self.landed_x() {
            text.push_str(&format!("  landed x = {:.2}", x));
        }
        if let Some(result) = &self.result {
            text.push_str(&format!(
                "  target {:.2}: {}",
                result.target_x,
                if result.correct { "correct" } else { "incorrect" }
            ));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detector_fires_once_with_last_valid_x() {
        let mut detector = LandingDetector::default();
        assert_eq!(detector.observe(Vec2::new(0.0, 0.2)), None);
        assert_eq!(detector.observe(Vec2::new(3.0, 1.0)), None);
        assert_eq!(detector.observe(Vec2::new(6.0, 0.1)), None);
        assert_eq!(detector.observe(Vec2::new(6.5, -0.3)), Some(6.0));
        assert_eq!(detector.observe(Vec2::new(7.0, -1.0)), None);
        assert_eq!(detector.landed_x(), Some(6.0));
    }

    #[test]
    fn test_detector_without_valid_sample_uses_current_x() {
        let mut detector = LandingDetector::default();
        assert_eq!(detector.observe(Vec2::new(1.5, -0.1)), Some(1.5));
    }

    #[test]
    fn test_rearm_allows_next_landing() {
        let mut detector = LandingDetector::default();
        detector.observe(Vec2::new(2.0, -1.0));
        detector.rearm();
        assert_eq!(detector.landed_x(), None);
        assert_eq!(detector.observe(Vec2::new(4.0, -1.0)), Some(4.0));
    }

    #[test]
    fn test_question_clamps_launch() {
        let mut question = SimulationQuestion::new("q", "hit it", 10.0);
        question.max_velocity = Some(12.0);
        question.min_angle_deg = Some(20.0);
        question.gravity = Some(5.0);
        let mut lab = ProjectileLab::for_question(question, 0.033);
        lab.set_params(ProjectileParams { speed: 50.0, angle_deg: 5.0, gravity: 9.81, launch_height: 0.2 });
        assert_eq!(lab.params().speed, 12.0);
        assert_eq!(lab.params().angle_deg, 20.0);
        assert_eq!(lab.params().gravity, 5.0);
    }

    #[test]
    fn test_quiz_mode_marks_the_target() {
        let free = ProjectileLab::new(ProjectileParams::default(), 0.033);
        assert!(free.target_marker().is_none());

        let question = SimulationQuestion::new("q", "hit it", 7.5);
        let lab = ProjectileLab::for_question(question, 0.033);
        let marker = lab.target_marker().unwrap();
        let mesh = lab.core().scene.get(marker).unwrap();
        assert_eq!(mesh.material.color, TARGET_COLOR);
        match mesh.geometry {
            Geometry::Segment { from, to, .. } => {
                let center = (from + to) * 0.5;
                assert!((center - Vec3::new(7.5, 0.1, 0.0)).length() < 1e-6);
                assert!((to.y - from.y - TARGET_HEIGHT).abs() < 1e-6);
            }
            other => panic!("unexpected marker geometry {:?}", other),
        }
        assert_eq!(lab.core().scene.len(), free.core().scene.len() + 1);
    }

    #[test]
    fn test_trajectory_starts_at_launch_point() {
        let lab = ProjectileLab::new(ProjectileParams::default(), 0.033);
        assert_eq!(lab.trajectory(), &[Vec2::new(0.0, 0.2)]);
    }
}
