//! Sandbox Module
//!
//! The interactive core: a dynamics world and a visual scene kept in
//! lock-step through the [`BodyRegistry`], driven by pointer input and by an
//! imperative command surface.
//!
//! All state lives in one owned [`Sandbox`] value. Pointer handlers, commands
//! and `frame` run to completion on the caller's thread; nothing here blocks
//! or spawns.
//!
//! # Submodules
//!
//! - [`registry`] - id -> (body, mesh) ownership
//! - [`selection`] - ordered selection set
//! - [`drag`] - pointer drag as a temporary joint
//! - [`picking`] - nearest body under a ray
//! - [`clock`] - clamped frame delta, play/pause, statistics

pub mod clock;
pub mod drag;
pub mod picking;
pub mod registry;
pub mod selection;

pub use clock::{FrameClock, FrameLoop, FrameOutcome, FrameRenderer, FrameStats, NullRenderer};
pub use drag::{DragSession, DragState};
pub use picking::{PickHit, pick};
pub use registry::{BodyEntry, BodyId, BodyKind, BodyRegistry, SpawnOptions};
pub use selection::SelectionSet;

use std::time::Instant;

use glam::Vec3;
use tracing::{debug, info, warn};

use crate::camera::{Camera, Viewport};
use crate::config::SandboxConfig;
use crate::error::RegistryError;
use crate::input::{MouseButton, PointerEvent};
use crate::physics::{BodyDesc, BodyHandle, ColliderShape, DynamicsWorld, JointHandle};
use crate::scene::{Geometry, Material, Mesh, MeshHandle, Scene};

/// A user-authored distance constraint between two registered bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceLink {
    pub a: BodyId,
    pub b: BodyId,
    /// Target separation of the two body origins
    pub distance: f32,
    pub joint: JointHandle,
}

type SelectionCallback = Box<dyn FnMut(&[BodyId])>;

/// Owned context for one sandbox canvas.
pub struct Sandbox {
    config: SandboxConfig,
    world: DynamicsWorld,
    scene: Scene,
    registry: BodyRegistry,
    selection: SelectionSet,
    drag: DragState,
    links: Vec<DistanceLink>,
    ground: Option<(BodyHandle, MeshHandle)>,
    camera: Camera,
    viewport: Viewport,
    clock: FrameClock,
    frame_loop: FrameLoop,
    on_selection_change: Option<SelectionCallback>,
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new(SandboxConfig::default())
    }
}

impl Sandbox {
    pub fn new(config: SandboxConfig) -> Self {
        let viewport = Viewport::new(config.render.width as f32, config.render.height as f32);
        let camera = Camera::from_config(&config.camera, viewport.aspect());

        let mut world = DynamicsWorld::new(
            Vec3::new(0.0, -config.world.gravity, 0.0),
            config.world.solver_iterations,
        );
        let mut scene = Scene::new(config.render.background);

        let ground_body = world.add_body(
            &BodyDesc::fixed(ColliderShape::HalfSpace { normal: Vec3::Y }, Vec3::ZERO)
                .with_material(config.world.ground_friction, config.world.ground_restitution),
        );
        let ground_mesh = scene.add(Mesh::new(
            Geometry::Plane {
                width: config.render.ground_size,
                depth: config.render.ground_size,
            },
            Material::new(config.render.ground_color),
        ));

        info!(
            "sandbox ready: gravity {:.2} m/s², {} solver iterations",
            config.world.gravity, config.world.solver_iterations
        );

        Self {
            registry: BodyRegistry::new(config.bodies.clone(), config.world.mass_epsilon),
            clock: FrameClock::new(config.world.max_frame_dt, config.world.nominal_step),
            world,
            scene,
            selection: SelectionSet::new(),
            drag: DragState::Idle,
            links: Vec::new(),
            ground: Some((ground_body, ground_mesh)),
            camera,
            viewport,
            frame_loop: FrameLoop::default(),
            on_selection_change: None,
            config,
        }
    }

    /// Register a callback invoked with the full ordered selection after every change.
    pub fn on_selection_change(&mut self, callback: impl FnMut(&[BodyId]) + 'static) {
        self.on_selection_change = Some(Box::new(callback));
    }

    // =========================================================================
    // World command surface
    // =========================================================================

    /// Add a box; `None` uses the configured default size. Refused after teardown.
    pub fn add_box(&mut self, size: Option<Vec3>, options: SpawnOptions) -> Option<BodyId> {
        if self.refuse_after_teardown("add_box") {
            return None;
        }
        let size = size.unwrap_or(self.config.bodies.box_size);
        Some(self.registry.add_box(&mut self.world, &mut self.scene, size, options))
    }

    /// Add a sphere; `None` uses the configured default radius. Refused after teardown.
    pub fn add_sphere(&mut self, radius: Option<f32>, options: SpawnOptions) -> Option<BodyId> {
        if self.refuse_after_teardown("add_sphere") {
            return None;
        }
        let radius = radius.unwrap_or(self.config.bodies.sphere_radius);
        Some(self.registry.add_sphere(&mut self.world, &mut self.scene, radius, options))
    }

    /// Remove every body and distance link. The ground stays.
    pub fn clear(&mut self) {
        self.drag.end(&mut self.world);
        for link in self.links.drain(..) {
            self.world.remove_joint(link.joint);
        }
        let removed = self.registry.clear(&mut self.world, &mut self.scene);
        debug!("cleared {} bodies", removed.len());
        self.selection.clear();
        self.refresh_selection();
    }

    /// Set the gravity magnitude (pointing down). Applies from the next step.
    /// Negative magnitudes are clamped to zero; non-finite ones are ignored.
    pub fn set_gravity(&mut self, magnitude: f32) {
        if self.refuse_after_teardown("set_gravity") {
            return;
        }
        if !magnitude.is_finite() {
            warn!("ignoring non-finite gravity {}", magnitude);
            return;
        }
        if magnitude < 0.0 {
            warn!("gravity {:.2} clamped to 0", magnitude);
        }
        let magnitude = magnitude.max(0.0);
        self.world.set_gravity(Vec3::new(0.0, -magnitude, 0.0));
        debug!("gravity set to {:.2}", magnitude);
    }

    /// Current gravity magnitude.
    pub fn gravity(&self) -> f32 {
        -self.world.gravity().y
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.frame_loop.set_playing(playing);
    }

    pub fn is_playing(&self) -> bool {
        self.frame_loop.is_playing()
    }

    /// Apply `impulse` at the origin of each listed body. Unknown ids are skipped.
    pub fn apply_impulse(&mut self, ids: &[BodyId], impulse: Vec3) {
        if self.refuse_after_teardown("apply_impulse") {
            return;
        }
        for &id in ids {
            match self.registry.lookup(id) {
                Ok(entry) => {
                    self.world.apply_impulse(entry.body, impulse);
                }
                Err(err) => debug!("apply_impulse: {}", err),
            }
        }
    }

    /// Link two bodies with a distance constraint. Without an explicit
    /// distance the current separation is frozen as the target. Linking a
    /// body to itself is a no-op.
    pub fn add_distance_constraint(
        &mut self,
        a: BodyId,
        b: BodyId,
        distance: Option<f32>,
    ) -> Option<DistanceLink> {
        if self.refuse_after_teardown("add_distance_constraint") {
            return None;
        }
        if a == b {
            debug!("add_distance_constraint: {} linked to itself, ignored", a);
            return None;
        }
        let (entry_a, entry_b) = match (self.registry.lookup(a), self.registry.lookup(b)) {
            (Ok(entry_a), Ok(entry_b)) => (*entry_a, *entry_b),
            (Err(err), _) | (_, Err(err)) => {
                debug!("add_distance_constraint: {}", err);
                return None;
            }
        };
        let distance = match distance {
            Some(d) => d.max(0.0),
            None => {
                let pa = self.world.translation(entry_a.body)?;
                let pb = self.world.translation(entry_b.body)?;
                pa.distance(pb)
            }
        };
        let joint = self.world.add_distance_joint(entry_a.body, entry_b.body, distance)?;
        let link = DistanceLink { a, b, distance, joint };
        self.links.push(link);
        debug!("linked {} and {} at {:.3} m", a, b, distance);
        Some(link)
    }

    /// Remove a single body with its mesh, links and any drag on it.
    pub fn remove(&mut self, id: BodyId) -> Result<(), RegistryError> {
        self.remove_entry(id)?;
        if self.selection.retain_existing(|other| other != id) {
            self.refresh_selection();
        }
        Ok(())
    }

    /// Remove every selected body, then clear the selection.
    pub fn remove_selected(&mut self) {
        for id in self.selection.get().to_vec() {
            if let Err(err) = self.remove_entry(id) {
                debug!("remove_selected: {}", err);
            }
        }
        self.selection.clear();
        self.refresh_selection();
    }

    fn remove_entry(&mut self, id: BodyId) -> Result<(), RegistryError> {
        self.registry.lookup(id)?;
        if self.drag.target() == Some(id) {
            self.drag.end(&mut self.world);
        }
        self.registry.remove(id, &mut self.world, &mut self.scene)?;
        // Joints went with the body.
        self.links.retain(|link| link.a != id && link.b != id);
        Ok(())
    }

    pub fn get_selected(&self) -> Vec<BodyId> {
        self.selection.get().to_vec()
    }

    /// Replace the selection. Ids not in the registry are dropped.
    pub fn set_selected(&mut self, ids: &[BodyId]) {
        if self.refuse_after_teardown("set_selected") {
            return;
        }
        let registry = &self.registry;
        self.selection
            .set(ids.iter().copied().filter(|&id| registry.contains(id)));
        self.refresh_selection();
    }

    // =========================================================================
    // Pointer input
    // =========================================================================

    pub fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, button } => self.pointer_down(position.x, position.y, button),
            PointerEvent::Move { position } => self.pointer_move(position.x, position.y),
            // Secondary buttons never start a drag, so they never end one.
            PointerEvent::Up { button, .. } if button.is_primary() => self.pointer_up(),
            PointerEvent::Up { .. } => {}
            PointerEvent::Leave => self.pointer_leave(),
        }
    }

    /// Pick under the pointer: toggle selection on a hit and, for the primary
    /// button, start dragging. A miss clears the selection.
    pub fn pointer_down(&mut self, x: f32, y: f32, button: MouseButton) {
        if self.frame_loop.is_cancelled() {
            return;
        }
        let ray = self.camera.ray_from_pixel(&self.viewport, x, y);
        let Some(hit) = pick(&ray, &self.registry, &self.scene) else {
            self.selection.clear();
            self.refresh_selection();
            return;
        };

        self.selection.toggle(hit.id);
        self.refresh_selection();

        if !button.is_primary() {
            return;
        }
        if let Some(entry) = self.registry.get(hit.id).copied() {
            self.drag.begin(&mut self.world, &entry, hit.point);
        }
    }

    /// Move the drag anchor to where the pointer ray meets the drag plane.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if !self.drag.is_active() {
            return;
        }
        let ray = self.camera.ray_from_pixel(&self.viewport, x, y);
        if let Some(point) = ray.intersect_horizontal_plane(self.config.world.drag_plane_height) {
            self.drag.retarget(&mut self.world, point);
        }
    }

    pub fn pointer_up(&mut self) {
        self.end_drag();
    }

    pub fn pointer_leave(&mut self) {
        self.end_drag();
    }

    /// End the active drag, if any. Returns whether one was active.
    pub fn end_drag(&mut self) -> bool {
        self.drag.end(&mut self.world)
    }

    // =========================================================================
    // Frame loop
    // =========================================================================

    /// Advance one display frame: clamp `raw_dt`, step dynamics when playing,
    /// copy poses onto meshes, render.
    pub fn frame(&mut self, raw_dt: f32, renderer: &mut dyn FrameRenderer) -> FrameOutcome {
        if self.frame_loop.is_cancelled() {
            return FrameOutcome::Cancelled;
        }
        let dt = self.clock.tick(raw_dt);
        let stepped = self.frame_loop.is_playing() && dt > 0.0;
        if stepped {
            self.world.step(dt);
            self.clock.record_step();
        }
        self.registry.sync_poses(&self.world, &mut self.scene);

        let released = self.scene.take_released();
        if !released.is_empty() {
            renderer.release(&released);
        }
        renderer.render(&self.scene, &self.camera);
        FrameOutcome::Rendered { dt, stepped }
    }

    /// [`frame`](Self::frame) with the delta measured from the wall clock.
    pub fn frame_at(&mut self, now: Instant, renderer: &mut dyn FrameRenderer) -> FrameOutcome {
        let raw_dt = self.clock.elapsed_since_last(now);
        self.frame(raw_dt, renderer)
    }

    /// Resize the viewport and camera aspect. Zero-sized resizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        let viewport = Viewport::new(width as f32, height as f32);
        if viewport.is_empty() {
            return;
        }
        self.viewport = viewport;
        self.camera.set_aspect(viewport.aspect());
    }

    /// Release everything and stop the loop. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.frame_loop.is_cancelled() {
            return;
        }
        self.clear();
        if let Some((body, mesh)) = self.ground.take() {
            self.world.remove_body(body);
            self.scene.remove(mesh);
        }
        self.scene.dispose_all();
        self.frame_loop.cancel();
        info!("sandbox torn down after {} frames", self.clock.stats().frames);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn world(&self) -> &DynamicsWorld {
        &self.world
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    pub fn links(&self) -> &[DistanceLink] {
        &self.links
    }

    pub fn stats(&self) -> FrameStats {
        self.clock.stats()
    }

    pub fn is_torn_down(&self) -> bool {
        self.frame_loop.is_cancelled()
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    pub fn body_position(&self, id: BodyId) -> Option<Vec3> {
        self.world.translation(self.registry.get(id)?.body)
    }

    pub fn body_velocity(&self, id: BodyId) -> Option<Vec3> {
        self.world.linvel(self.registry.get(id)?.body)
    }

    fn refuse_after_teardown(&self, command: &str) -> bool {
        let cancelled = self.frame_loop.is_cancelled();
        if cancelled {
            debug!("{}: sandbox is torn down", command);
        }
        cancelled
    }

    /// Re-tint every mesh from selection membership and notify the listener.
    fn refresh_selection(&mut self) {
        let emissive = self.config.bodies.selection_emissive;
        for entry in self.registry.all() {
            let selected = self.selection.contains(entry.id);
            if let Some(mesh) = self.scene.get_mut(entry.mesh) {
                mesh.material.set_emissive(if selected { emissive } else { 0 });
            }
        }
        if let Some(callback) = self.on_selection_change.as_mut() {
            callback(self.selection.get());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_ground_exists_and_is_not_registered() {
        let sandbox = Sandbox::default();
        assert_eq!(sandbox.registry().len(), 0);
        assert_eq!(sandbox.world().body_count(), 1);
        assert_eq!(sandbox.world().dynamic_body_count(), 0);
        assert_eq!(sandbox.scene().len(), 1);
    }

    #[test]
    fn test_selection_callback_sees_every_change() {
        let mut sandbox = Sandbox::default();
        let seen: Rc<RefCell<Vec<Vec<BodyId>>>> = Rc::default();
        let sink = Rc::clone(&seen);
        sandbox.on_selection_change(move |ids| sink.borrow_mut().push(ids.to_vec()));

        let a = sandbox.add_box(None, SpawnOptions::default()).unwrap();
        let b = sandbox.add_sphere(None, SpawnOptions::at(Vec3::new(3.0, 2.0, 0.0))).unwrap();
        sandbox.set_selected(&[b, a]);
        sandbox.remove_selected();

        let seen = seen.borrow();
        assert_eq!(seen.first(), Some(&vec![b, a]));
        assert_eq!(seen.last(), Some(&Vec::new()));
    }

    #[test]
    fn test_highlight_follows_membership() {
        let mut sandbox = Sandbox::default();
        let a = sandbox.add_box(None, SpawnOptions::default()).unwrap();
        let b = sandbox.add_box(None, SpawnOptions::at(Vec3::new(3.0, 2.0, 0.0))).unwrap();
        sandbox.set_selected(&[a]);
        let emissive = |s: &Sandbox, id| {
            let mesh = s.registry().get(id).unwrap().mesh;
            s.scene().get(mesh).unwrap().material.emissive
        };
        assert_eq!(emissive(&sandbox, a), 0x223366);
        assert_eq!(emissive(&sandbox, b), 0);
        sandbox.set_selected(&[b]);
        assert_eq!(emissive(&sandbox, a), 0);
        assert_eq!(emissive(&sandbox, b), 0x223366);
    }

    #[test]
    fn test_set_selected_drops_unknown_ids() {
        let mut sandbox = Sandbox::default();
        let a = sandbox.add_box(None, SpawnOptions::default()).unwrap();
        sandbox.set_selected(&[BodyId::from_raw(77), a]);
        assert_eq!(sandbox.get_selected(), vec![a]);
    }

    #[test]
    fn test_resize_ignores_zero() {
        let mut sandbox = Sandbox::default();
        sandbox.resize(800, 400);
        assert_eq!(sandbox.camera().aspect, 2.0);
        sandbox.resize(0, 400);
        assert_eq!(sandbox.camera().aspect, 2.0);
        assert_eq!(sandbox.viewport(), Viewport::new(800.0, 400.0));
    }

    #[test]
    fn test_removing_dragged_body_ends_drag() {
        let mut sandbox = Sandbox::default();
        let id = sandbox.add_box(None, SpawnOptions::default()).unwrap();
        let entry = *sandbox.registry().get(id).unwrap();
        sandbox.drag.begin(&mut sandbox.world, &entry, Vec3::new(0.0, 2.5, 0.0));
        sandbox.remove(id).unwrap();
        assert!(!sandbox.drag_state().is_active());
        // only the ground remains
        assert_eq!(sandbox.world().body_count(), 1);
        assert_eq!(sandbox.world().joint_count(), 0);
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let mut sandbox = Sandbox::default();
        sandbox.add_box(None, SpawnOptions::default());
        sandbox.teardown();
        sandbox.teardown();
        assert!(sandbox.is_torn_down());
        assert!(sandbox.scene().is_empty());
        assert_eq!(sandbox.world().body_count(), 0);
        assert_eq!(sandbox.frame(0.016, &mut NullRenderer), FrameOutcome::Cancelled);
    }

    #[test]
    fn test_commands_after_teardown_are_refused() {
        let mut sandbox = Sandbox::default();
        let kept = sandbox.add_box(None, SpawnOptions::default()).unwrap();
        sandbox.teardown();

        assert_eq!(sandbox.add_box(None, SpawnOptions::default()), None);
        assert_eq!(sandbox.add_sphere(None, SpawnOptions::default()), None);
        sandbox.set_selected(&[kept]);
        sandbox.apply_impulse(&[kept], Vec3::Y);
        sandbox.set_gravity(3.0);
        sandbox.pointer_down(400.0, 300.0, MouseButton::Left);

        assert_eq!(sandbox.registry().len(), 0);
        assert_eq!(sandbox.world().body_count(), 0);
        assert!(sandbox.scene().is_empty());
        assert!(sandbox.get_selected().is_empty());
        assert!(!sandbox.drag_state().is_active());
    }

    #[test]
    fn test_self_link_is_ignored() {
        let mut sandbox = Sandbox::default();
        let a = sandbox.add_sphere(None, SpawnOptions::default()).unwrap();
        assert!(sandbox.add_distance_constraint(a, a, None).is_none());
        assert!(sandbox.add_distance_constraint(a, a, Some(1.0)).is_none());
        assert!(sandbox.links().is_empty());
        assert_eq!(sandbox.world().joint_count(), 0);
    }

    #[test]
    fn test_gravity_magnitude_never_goes_negative() {
        let mut sandbox = Sandbox::default();
        sandbox.set_gravity(0.25);
        sandbox.set_gravity(sandbox.gravity() - 0.5);
        assert_eq!(sandbox.gravity(), 0.0);
        assert!(sandbox.world().gravity().y <= 0.0);

        sandbox.set_gravity(f32::NAN);
        assert_eq!(sandbox.gravity(), 0.0);
        sandbox.set_gravity(9.81);
        assert_eq!(sandbox.gravity(), 9.81);
    }
}
