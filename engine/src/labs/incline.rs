//! Inclined plane lab: a block on a static tilted plane with friction μ.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Lab, LabCore};
use crate::physics::{BodyDesc, BodyHandle, ColliderShape};
use crate::scene::{Geometry, Material, Mesh, MeshHandle};

const BLOCK_SIZE: f32 = 0.8;
/// Block center distance from the slope surface at reset.
const BLOCK_LIFT: f32 = 0.6;
const BLOCK_COLOR: u32 = 0xff7f50;
const SLOPE_COLOR: u32 = 0x1f2530;
const SOLVER_ITERATIONS: usize = 12;
const LINEAR_DAMPING: f32 = 0.01;
const ANGULAR_DAMPING: f32 = 0.02;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InclineParams {
    /// Slope angle (degrees), 0..80
    pub angle_deg: f32,
    /// Block mass (kg)
    pub mass: f32,
    /// Kinetic friction coefficient, 0..1
    pub friction: f32,
    /// Gravity magnitude (m/s²)
    pub gravity: f32,
}

impl Default for InclineParams {
    fn default() -> Self {
        Self {
            angle_deg: 25.0,
            mass: 1.0,
            friction: 0.2,
            gravity: 9.81,
        }
    }
}

impl InclineParams {
    pub fn sanitized(&self) -> Self {
        Self {
            angle_deg: self.angle_deg.clamp(0.0, 80.0),
            mass: self.mass.max(1e-4),
            friction: self.friction.clamp(0.0, 1.0),
            gravity: self.gravity.max(0.0),
        }
    }

    /// Orientation of the slope: a rotation of -θ about X.
    pub fn slope_rotation(&self) -> Quat {
        Quat::from_rotation_x(-self.angle_deg.to_radians())
    }

    /// Expected acceleration down the slope, `g(sinθ − μcosθ)`, zero when the block sticks.
    pub fn reference_acceleration(&self) -> f32 {
        let theta = self.angle_deg.to_radians();
        (self.gravity * (theta.sin() - self.friction * theta.cos())).max(0.0)
    }

    /// Unit vector pointing down the slope.
    pub fn downhill(&self) -> Vec3 {
        self.slope_rotation() * Vec3::NEG_Z
    }
}

pub struct InclineLab {
    core: LabCore,
    params: InclineParams,
    slope: Option<BodyHandle>,
    block: Option<BodyHandle>,
    slope_mesh: MeshHandle,
    block_mesh: MeshHandle,
    start: Vec3,
}

impl InclineLab {
    pub fn new(params: InclineParams, max_dt: f32) -> Self {
        let params = params.sanitized();
        let mut core = LabCore::new(
            params.gravity,
            SOLVER_ITERATIONS,
            Vec3::new(6.0, 4.0, 8.0),
            Vec3::ZERO,
            max_dt,
        );
        let slope_mesh = core.scene.add(Mesh::new(
            Geometry::Plane { width: 10.0, depth: 6.0 },
            Material::new(SLOPE_COLOR),
        ));
        let block_mesh = core.scene.add(Mesh::new(
            Geometry::Box { size: Vec3::splat(BLOCK_SIZE) },
            Material::new(BLOCK_COLOR),
        ));
        let mut lab = Self {
            core,
            params,
            slope: None,
            block: None,
            slope_mesh,
            block_mesh,
            start: Vec3::ZERO,
        };
        lab.reset();
        lab
    }

    pub fn params(&self) -> &InclineParams {
        &self.params
    }

    pub fn set_params(&mut self, params: InclineParams) {
        self.params = params.sanitized();
        self.reset();
    }

    pub fn block_position(&self) -> Option<Vec3> {
        self.core.world.translation(self.block?)
    }

    /// Distance travelled down the slope since reset.
    pub fn distance_down_slope(&self) -> f32 {
        self.block_position()
            .map(|p| (p - self.start).dot(self.params.downhill()))
            .unwrap_or(0.0)
    }

    /// Current speed along the slope.
    pub fn speed_down_slope(&self) -> f32 {
        self.block
            .and_then(|b| self.core.world.linvel(b))
            .map(|v| v.dot(self.params.downhill()))
            .unwrap_or(0.0)
    }
}

impl Lab for InclineLab {
    fn name(&self) -> &'static str {
        "Inclined plane"
    }

    fn core(&self) -> &LabCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut LabCore {
        &mut self.core
    }

    fn reset(&mut self) {
        // Friction lives on the colliders, so both bodies are rebuilt.
        for body in [self.slope.take(), self.block.take()].into_iter().flatten() {
            self.core.world.remove_body(body);
        }
        self.core.set_gravity(self.params.gravity);

        let rotation = self.params.slope_rotation();
        let mu = self.params.friction;
        self.slope = Some(self.core.world.add_body(
            &BodyDesc::fixed(ColliderShape::HalfSpace { normal: Vec3::Y }, Vec3::ZERO)
                .with_rotation(rotation)
                .with_material(mu, 0.0),
        ));

        self.start = rotation * Vec3::new(0.0, BLOCK_LIFT, 0.0);
        self.block = Some(self.core.world.add_body(
            &BodyDesc::dynamic(
                ColliderShape::Cuboid { half_extents: Vec3::splat(BLOCK_SIZE * 0.5) },
                self.start,
                self.params.mass,
            )
            .with_rotation(rotation)
            .with_material(mu, 0.0)
            .with_damping(LINEAR_DAMPING, ANGULAR_DAMPING),
        ));

        if let Some(mesh) = self.core.scene.get_mut(self.slope_mesh) {
            mesh.set_pose(Vec3::ZERO, rotation);
        }
        debug!(
            "incline reset: θ={:.1}° μ={:.2} a_ref={:.2}",
            self.params.angle_deg,
            mu,
            self.params.reference_acceleration()
        );
        self.sync();
    }

    fn sync(&mut self) {
        let Some(block) = self.block else { return };
        if let (Some(position), Some(rotation)) =
            (self.core.world.translation(block), self.core.world.rotation(block))
        {
            if let Some(mesh) = self.core.scene.get_mut(self.block_mesh) {
                mesh.set_pose(position, rotation);
            }
        }
    }

    fn nudge(&mut self, primary: i32, secondary: i32) {
        let mut params = self.params.clone();
        params.angle_deg += primary as f32;
        params.friction += secondary as f32 * 0.05;
        self.set_params(params);
    }

    fn readout(&self) -> String {
        format!(
            "Inclined plane | θ {:.0}°  μ {:.2}  g {:.2}  a ≈ {:.2} m/s²  v {:.2} m/s",
            self.params.angle_deg,
            self.params.friction,
            self.params.gravity,
            self.params.reference_acceleration(),
            self.speed_down_slope(),
        )
    }
}
