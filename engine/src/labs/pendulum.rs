//! Pendulum lab: a bob held under a fixed pivot by a point constraint.

use std::f32::consts::TAU;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Lab, LabCore};
use crate::physics::{BodyDesc, BodyHandle, ColliderShape};
use crate::scene::{Geometry, Material, Mesh, MeshHandle};

const BOB_RADIUS: f32 = 0.15;
const BOB_COLOR: u32 = 0xf0b429;
const ROD_COLOR: u32 = 0x6e7fff;
const BEAM_COLOR: u32 = 0x8892a0;
const SOLVER_ITERATIONS: usize = 10;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PendulumParams {
    /// Rod length (m), 0.2..5
    pub length: f32,
    /// Bob mass (kg)
    pub mass: f32,
    /// Gravity magnitude (m/s²)
    pub gravity: f32,
    /// Linear and angular damping, 0..0.99
    pub damping: f32,
    /// Release angle from vertical (degrees), -60..60
    pub angle_deg: f32,
}

impl Default for PendulumParams {
    fn default() -> Self {
        Self {
            length: 2.0,
            mass: 1.0,
            gravity: 9.81,
            damping: 0.01,
            angle_deg: 20.0,
        }
    }
}

impl PendulumParams {
    /// Same parameters with every field forced into its stable range.
    pub fn sanitized(&self) -> Self {
        Self {
            length: self.length.clamp(0.2, 5.0),
            mass: self.mass.max(1e-4),
            gravity: self.gravity.max(0.0),
            damping: self.damping.clamp(0.0, 0.99),
            angle_deg: self.angle_deg.clamp(-60.0, 60.0),
        }
    }

    /// Release position of the bob relative to the pivot at the origin.
    pub fn bob_start(&self) -> Vec3 {
        let theta = self.angle_deg.to_radians();
        Vec3::new(self.length * theta.sin(), -self.length * theta.cos(), 0.0)
    }

    /// Small-angle period 2π√(L/g).
    pub fn period_estimate(&self) -> f32 {
        if self.gravity <= 0.0 {
            return f32::INFINITY;
        }
        TAU * (self.length / self.gravity).sqrt()
    }
}

pub struct PendulumLab {
    core: LabCore,
    params: PendulumParams,
    pivot: BodyHandle,
    bob: Option<BodyHandle>,
    bob_mesh: MeshHandle,
    rod_mesh: MeshHandle,
}

impl PendulumLab {
    pub fn new(params: PendulumParams, max_dt: f32) -> Self {
        let params = params.sanitized();
        let mut core = LabCore::new(
            params.gravity,
            SOLVER_ITERATIONS,
            Vec3::new(0.0, 0.5, 6.0),
            Vec3::new(0.0, -1.0, 0.0),
            max_dt,
        );
        let pivot = core.world.add_body(&BodyDesc::fixed(ColliderShape::None, Vec3::ZERO));
        core.scene.add(Mesh::new(
            Geometry::Box { size: Vec3::new(1.2, 0.05, 0.05) },
            Material::new(BEAM_COLOR),
        ));
        let rod_mesh = core.scene.add(Mesh::new(
            Geometry::Segment { from: Vec3::ZERO, to: params.bob_start(), thickness: 0.02 },
            Material::new(ROD_COLOR),
        ));
        let bob_mesh = core.scene.add(Mesh::new(
            Geometry::Sphere { radius: BOB_RADIUS },
            Material::new(BOB_COLOR),
        ));

        let mut lab = Self {
            core,
            params,
            pivot,
            bob: None,
            bob_mesh,
            rod_mesh,
        };
        lab.reset();
        lab
    }

    pub fn params(&self) -> &PendulumParams {
        &self.params
    }

    /// Replace the parameters (clamped) and reset.
    pub fn set_params(&mut self, params: PendulumParams) {
        self.params = params.sanitized();
        self.reset();
    }

    pub fn period_estimate(&self) -> f32 {
        self.params.period_estimate()
    }

    pub fn bob_position(&self) -> Option<Vec3> {
        self.core.world.translation(self.bob?)
    }

    /// Current angle from vertical in degrees.
    pub fn angle_deg(&self) -> Option<f32> {
        let p = self.bob_position()?;
        Some(p.x.atan2(-p.y).to_degrees())
    }
}

impl Lab for PendulumLab {
    fn name(&self) -> &'static str {
        "Pendulum"
    }

    fn core(&self) -> &LabCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut LabCore {
        &mut self.core
    }

    fn reset(&mut self) {
        if let Some(old) = self.bob.take() {
            // The joint goes with the body.
            self.core.world.remove_body(old);
        }
        self.core.set_gravity(self.params.gravity);

        let start = self.params.bob_start();
        let bob = self.core.world.add_body(
            &BodyDesc::dynamic(ColliderShape::Ball { radius: BOB_RADIUS }, start, self.params.mass)
                .with_damping(self.params.damping, self.params.damping),
        );
        // Pivot origin and bob-local (pivot - bob) coincide: rod length is preserved.
        self.core.world.add_point_joint(self.pivot, bob, Vec3::ZERO, -start);
        self.bob = Some(bob);

        debug!(
            "pendulum reset: L={:.2} m={:.2} θ0={:.1}°",
            self.params.length, self.params.mass, self.params.angle_deg
        );
        self.sync();
    }

    fn sync(&mut self) {
        let Some(bob) = self.bob else { return };
        let (Some(position), Some(rotation)) =
            (self.core.world.translation(bob), self.core.world.rotation(bob))
        else {
            return;
        };
        if let Some(mesh) = self.core.scene.get_mut(self.bob_mesh) {
            mesh.set_pose(position, rotation);
        }
        if let Some(mesh) = self.core.scene.get_mut(self.rod_mesh) {
            mesh.geometry = Geometry::Segment { from: Vec3::ZERO, to: position, thickness: 0.02 };
            mesh.set_pose(Vec3::ZERO, Quat::IDENTITY);
        }
    }

    fn nudge(&mut self, primary: i32, secondary: i32) {
        let mut params = self.params.clone();
        params.length += primary as f32 * 0.1;
        params.angle_deg += secondary as f32 * 5.0;
        self.set_params(params);
    }

    fn readout(&self) -> String {
        format!(
            "Pendulum | L {:.2} m  m {:.2} kg  g {:.2}  T ≈ {:.2} s  θ {:.1}°",
            self.params.length,
            self.params.mass,
            self.params.gravity,
            self.period_estimate(),
            self.angle_deg().unwrap_or(0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::NullRenderer;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_params_are_clamped() {
        let params = PendulumParams {
            length: 10.0,
            mass: 0.0,
            gravity: 9.81,
            damping: 2.0,
            angle_deg: -90.0,
        }
        .sanitized();
        assert_eq!(params.length, 5.0);
        assert_eq!(params.mass, 1e-4);
        assert_eq!(params.damping, 0.99);
        assert_eq!(params.angle_deg, -60.0);
    }

    #[test]
    fn test_period_estimate() {
        let params = PendulumParams { length: 9.81, gravity: 9.81, ..Default::default() };
        assert!((params.period_estimate() - TAU).abs() < 1e-5);
    }

    #[test]
    fn test_reset_places_bob_at_release_angle() {
        let lab = PendulumLab::new(PendulumParams::default(), 0.033);
        let p = lab.bob_position().unwrap();
        assert!((p.length() - 2.0).abs() < 1e-5);
        assert!((lab.angle_deg().unwrap() - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_rod_length_is_kept_while_swinging() {
        let mut lab = PendulumLab::new(PendulumParams::default(), 0.033);
        for _ in 0..120 {
            lab.frame(DT, &mut NullRenderer);
        }
        let p = lab.bob_position().unwrap();
        assert!((p.length() - 2.0).abs() < 0.05, "rod length drifted to {}", p.length());
        // swinging, not stuck at the release angle
        assert!(lab.angle_deg().unwrap() < 20.0);
    }

    #[test]
    fn test_parameter_change_resets_cleanly() {
        let mut lab = PendulumLab::new(PendulumParams::default(), 0.033);
        for _ in 0..30 {
            lab.frame(DT, &mut NullRenderer);
        }
        lab.set_params(PendulumParams { length: 1.0, ..Default::default() });
        let p = lab.bob_position().unwrap();
        assert!((p.length() - 1.0).abs() < 1e-5);
        assert_eq!(lab.core().world.linvel(lab.bob.unwrap()), Some(Vec3::ZERO));
        // pivot + one bob, no stale bodies or joints
        assert_eq!(lab.core().world.body_count(), 2);
        assert_eq!(lab.core().world.joint_count(), 1);
    }
}
