//! Dynamics World
//!
//! A thin facade over rapier3d: one struct owning every rapier set and
//! pipeline, taking glam in and handing glam out. Bodies and joints are
//! referred to by the opaque [`BodyHandle`] / [`JointHandle`] newtypes so the
//! rest of the crate never names a rapier type.

use std::num::NonZeroUsize;

use glam::{Quat, Vec3};
use rapier3d::prelude::*;

use super::types::{from_point, from_rotation, from_vector, to_isometry, to_point, to_vector};

/// Handle of a rigid body in a [`DynamicsWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(RigidBodyHandle);

/// Handle of a joint (point or distance constraint) in a [`DynamicsWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JointHandle(ImpulseJointHandle);

/// How a body participates in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Integrated under forces, contacts and joints.
    Dynamic,
    /// Never moves (ground, slope, pendulum pivot).
    Fixed,
    /// Moved only by explicit teleports; infinite mass to the solver.
    Kinematic,
}

/// Collision shape attached to a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    Cuboid { half_extents: Vec3 },
    Ball { radius: f32 },
    /// Infinite plane through the body origin with the given local normal.
    HalfSpace { normal: Vec3 },
    /// No collider (drag anchors, pivots).
    None,
}

/// Everything needed to insert a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub motion: Motion,
    pub shape: ColliderShape,
    pub position: Vec3,
    pub rotation: Quat,
    pub mass: f32,
    pub friction: f32,
    pub restitution: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl Default for BodyDesc {
    fn default() -> Self {
        Self {
            motion: Motion::Dynamic,
            shape: ColliderShape::None,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            mass: 1.0,
            friction: 0.5,
            restitution: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
        }
    }
}

impl BodyDesc {
    pub fn dynamic(shape: ColliderShape, position: Vec3, mass: f32) -> Self {
        Self {
            shape,
            position,
            mass,
            ..Default::default()
        }
    }

    pub fn fixed(shape: ColliderShape, position: Vec3) -> Self {
        Self {
            motion: Motion::Fixed,
            shape,
            position,
            mass: 0.0,
            ..Default::default()
        }
    }

    pub fn kinematic(position: Vec3) -> Self {
        Self {
            motion: Motion::Kinematic,
            position,
            mass: 0.0,
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_material(mut self, friction: f32, restitution: f32) -> Self {
        self.friction = friction;
        self.restitution = restitution;
        self
    }

    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }
}

/// The dynamics simulation: bodies, colliders, joints and the integrator.
pub struct DynamicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    step_count: u64,
    last_dt: f32,
}

impl std::fmt::Debug for DynamicsWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicsWorld")
            .field("gravity", &self.gravity())
            .field("bodies", &self.bodies.len())
            .field("joints", &self.impulse_joints.len())
            .field("step_count", &self.step_count)
            .finish()
    }
}

impl Default for DynamicsWorld {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, -9.81, 0.0), 10)
    }
}

impl DynamicsWorld {
    /// Create an empty world with the given gravity vector and solver iteration count.
    pub fn new(gravity: Vec3, solver_iterations: usize) -> Self {
        let mut world = Self {
            gravity: to_vector(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            step_count: 0,
            last_dt: 0.0,
        };
        world.set_solver_iterations(solver_iterations);
        world
    }

    // =========================================================================
    // Global parameters
    // =========================================================================

    pub fn gravity(&self) -> Vec3 {
        from_vector(&self.gravity)
    }

    /// Replace the gravity vector. Takes effect on the next step.
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = to_vector(gravity);
        // Sleeping bodies would otherwise ignore the change.
        for (_, body) in self.bodies.iter_mut() {
            if body.is_dynamic() {
                body.wake_up(true);
            }
        }
    }

    pub fn set_solver_iterations(&mut self, iterations: usize) {
        self.integration_parameters.num_solver_iterations =
            NonZeroUsize::new(iterations).unwrap_or(NonZeroUsize::MIN);
    }

    pub fn solver_iterations(&self) -> usize {
        self.integration_parameters.num_solver_iterations.get()
    }

    // =========================================================================
    // Stepping
    // =========================================================================

    /// Advance the simulation by `dt` seconds. Non-positive or non-finite
    /// deltas are ignored.
    pub fn step(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
        self.step_count += 1;
        self.last_dt = dt;
    }

    /// Number of steps taken since creation.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Delta used by the most recent step (0 before the first).
    pub fn last_dt(&self) -> f32 {
        self.last_dt
    }

    // =========================================================================
    // Bodies
    // =========================================================================

    pub fn add_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        let builder = match desc.motion {
            Motion::Dynamic => RigidBodyBuilder::dynamic(),
            Motion::Fixed => RigidBodyBuilder::fixed(),
            Motion::Kinematic => RigidBodyBuilder::kinematic_position_based(),
        };
        let body = builder
            .position(to_isometry(desc.position, desc.rotation))
            .linear_damping(desc.linear_damping)
            .angular_damping(desc.angular_damping)
            .build();
        let handle = self.bodies.insert(body);

        let collider = match desc.shape {
            ColliderShape::Cuboid { half_extents } => {
                Some(ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z))
            }
            ColliderShape::Ball { radius } => Some(ColliderBuilder::ball(radius)),
            ColliderShape::HalfSpace { normal } => {
                Some(ColliderBuilder::halfspace(UnitVector::new_normalize(to_vector(normal))))
            }
            ColliderShape::None => None,
        };
        if let Some(collider) = collider {
            let mut collider = collider
                .friction(desc.friction)
                .restitution(desc.restitution);
            if desc.motion == Motion::Dynamic {
                collider = collider.mass(desc.mass);
            }
            self.colliders
                .insert_with_parent(collider.build(), handle, &mut self.bodies);
        }

        BodyHandle(handle)
    }

    /// Remove a body together with its colliders and every joint attached to it.
    pub fn remove_body(&mut self, handle: BodyHandle) -> bool {
        self.bodies
            .remove(
                handle.0,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(handle.0)
    }

    /// Total bodies, including fixed and kinematic ones.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn dynamic_body_count(&self) -> usize {
        self.bodies.iter().filter(|(_, body)| body.is_dynamic()).count()
    }

    pub fn translation(&self, handle: BodyHandle) -> Option<Vec3> {
        self.bodies.get(handle.0).map(|b| from_vector(b.translation()))
    }

    pub fn rotation(&self, handle: BodyHandle) -> Option<Quat> {
        self.bodies.get(handle.0).map(|b| from_rotation(b.rotation()))
    }

    pub fn linvel(&self, handle: BodyHandle) -> Option<Vec3> {
        self.bodies.get(handle.0).map(|b| from_vector(b.linvel()))
    }

    pub fn angvel(&self, handle: BodyHandle) -> Option<Vec3> {
        self.bodies.get(handle.0).map(|b| from_vector(b.angvel()))
    }

    pub fn mass(&self, handle: BodyHandle) -> Option<f32> {
        self.bodies.get(handle.0).map(|b| b.mass())
    }

    /// Teleport a body. Returns `false` for unknown handles.
    pub fn set_translation(&mut self, handle: BodyHandle, position: Vec3) -> bool {
        match self.bodies.get_mut(handle.0) {
            Some(body) => {
                body.set_translation(to_vector(position), true);
                true
            }
            None => false,
        }
    }

    pub fn set_rotation(&mut self, handle: BodyHandle, rotation: Quat) -> bool {
        match self.bodies.get_mut(handle.0) {
            Some(body) => {
                body.set_rotation(super::types::to_rotation(rotation), true);
                true
            }
            None => false,
        }
    }

    pub fn set_linvel(&mut self, handle: BodyHandle, velocity: Vec3) -> bool {
        match self.bodies.get_mut(handle.0) {
            Some(body) => {
                body.set_linvel(to_vector(velocity), true);
                true
            }
            None => false,
        }
    }

    /// Zero linear and angular velocity.
    pub fn reset_motion(&mut self, handle: BodyHandle) -> bool {
        match self.bodies.get_mut(handle.0) {
            Some(body) => {
                body.set_linvel(Vector::zeros(), true);
                body.set_angvel(Vector::zeros(), true);
                true
            }
            None => false,
        }
    }

    /// Apply an instantaneous impulse at the center of mass.
    pub fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec3) -> bool {
        match self.bodies.get_mut(handle.0) {
            Some(body) => {
                body.apply_impulse(to_vector(impulse), true);
                true
            }
            None => false,
        }
    }

    /// Express a world-space point in the body's local frame.
    pub fn world_to_local(&self, handle: BodyHandle, point: Vec3) -> Option<Vec3> {
        self.bodies
            .get(handle.0)
            .map(|b| from_point(&b.position().inverse_transform_point(&to_point(point))))
    }

    // =========================================================================
    // Joints
    // =========================================================================

    /// Point constraint: `anchor_a` on `a` and `anchor_b` on `b` (both in
    /// body-local coordinates) are held coincident.
    pub fn add_point_joint(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
        anchor_a: Vec3,
        anchor_b: Vec3,
    ) -> Option<JointHandle> {
        if !self.contains(a) || !self.contains(b) {
            return None;
        }
        let joint = SphericalJointBuilder::new()
            .local_anchor1(to_point(anchor_a))
            .local_anchor2(to_point(anchor_b))
            .build();
        Some(JointHandle(self.impulse_joints.insert(a.0, b.0, joint, true)))
    }

    /// Distance constraint: the body origins of `a` and `b` are kept exactly
    /// `distance` apart. Rotations stay free.
    pub fn add_distance_joint(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
        distance: f32,
    ) -> Option<JointHandle> {
        if !self.contains(a) || !self.contains(b) {
            return None;
        }
        let distance = distance.max(0.0);
        let joint = GenericJointBuilder::new(JointAxesMask::empty())
            .coupled_axes(JointAxesMask::LIN_AXES)
            .limits(JointAxis::LinX, [distance, distance])
            .build();
        Some(JointHandle(self.impulse_joints.insert(a.0, b.0, joint, true)))
    }

    /// Remove a joint. Joints already dropped with one of their bodies report `false`.
    pub fn remove_joint(&mut self, handle: JointHandle) -> bool {
        self.impulse_joints.remove(handle.0, true).is_some()
    }

    pub fn contains_joint(&self, handle: JointHandle) -> bool {
        self.impulse_joints.get(handle.0).is_some()
    }

    pub fn joint_count(&self) -> usize {
        self.impulse_joints.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn ball(world: &mut DynamicsWorld, position: Vec3) -> BodyHandle {
        world.add_body(&BodyDesc::dynamic(ColliderShape::Ball { radius: 0.5 }, position, 1.0))
    }

    #[test]
    fn test_free_fall_matches_gravity() {
        let mut world = DynamicsWorld::new(Vec3::new(0.0, -10.0, 0.0), 10);
        let body = ball(&mut world, Vec3::new(0.0, 10.0, 0.0));
        for _ in 0..60 {
            world.step(DT);
        }
        let vy = world.linvel(body).unwrap().y;
        assert!((vy + 10.0).abs() < 0.05, "vy after 1s = {vy}");
        assert_eq!(world.step_count(), 60);
    }

    #[test]
    fn test_zero_dt_is_ignored() {
        let mut world = DynamicsWorld::default();
        world.step(0.0);
        world.step(f32::NAN);
        assert_eq!(world.step_count(), 0);
    }

    #[test]
    fn test_mass_is_taken_from_desc() {
        let mut world = DynamicsWorld::default();
        let body = world.add_body(&BodyDesc::dynamic(
            ColliderShape::Cuboid { half_extents: Vec3::splat(0.5) },
            Vec3::ZERO,
            3.0,
        ));
        world.step(DT);
        assert!((world.mass(body).unwrap() - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_remove_body_drops_its_joints() {
        let mut world = DynamicsWorld::default();
        let a = ball(&mut world, Vec3::ZERO);
        let b = ball(&mut world, Vec3::X * 2.0);
        let joint = world.add_distance_joint(a, b, 2.0).unwrap();
        assert!(world.remove_body(a));
        assert!(!world.contains_joint(joint));
        assert!(!world.remove_joint(joint));
        assert!(!world.remove_body(a));
    }

    #[test]
    fn test_joint_on_missing_body_is_refused() {
        let mut world = DynamicsWorld::default();
        let a = ball(&mut world, Vec3::ZERO);
        let b = ball(&mut world, Vec3::X);
        world.remove_body(b);
        assert!(world.add_point_joint(a, b, Vec3::ZERO, Vec3::ZERO).is_none());
    }

    #[test]
    fn test_world_to_local_inverts_translation() {
        let mut world = DynamicsWorld::default();
        let body = ball(&mut world, Vec3::new(1.0, 2.0, 3.0));
        let local = world.world_to_local(body, Vec3::new(1.5, 2.0, 3.0)).unwrap();
        assert!((local - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_ball_rests_on_ground() {
        let mut world = DynamicsWorld::new(Vec3::new(0.0, -9.81, 0.0), 10);
        world.add_body(&BodyDesc::fixed(ColliderShape::HalfSpace { normal: Vec3::Y }, Vec3::ZERO));
        let body = ball(&mut world, Vec3::new(0.0, 2.0, 0.0));
        for _ in 0..240 {
            world.step(DT);
        }
        let y = world.translation(body).unwrap().y;
        assert!((y - 0.5).abs() < 0.05, "resting height {y}");
    }

    #[test]
    fn test_distance_joint_holds_separation() {
        let mut world = DynamicsWorld::new(Vec3::new(0.0, -9.81, 0.0), 10);
        let pivot = world.add_body(&BodyDesc::fixed(ColliderShape::None, Vec3::ZERO));
        let bob = ball(&mut world, Vec3::new(2.0, 0.0, 0.0));
        world.add_distance_joint(pivot, bob, 2.0).unwrap();
        for _ in 0..120 {
            world.step(DT);
        }
        let d = world.translation(bob).unwrap().length();
        assert!((d - 2.0).abs() < 0.05, "separation {d}");
    }
}
