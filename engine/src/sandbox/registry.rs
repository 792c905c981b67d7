//! Body Registry
//!
//! The single source of truth for "what exists". Every logical object is one
//! [`BodyEntry`] holding both of its representations: a dynamics body in the
//! [`DynamicsWorld`] and a mesh in the [`Scene`]. The two are created and
//! destroyed together here and nowhere else.

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec3;
use tracing::{debug, warn};

use crate::config::BodyDefaults;
use crate::error::RegistryError;
use crate::physics::{BodyDesc, BodyHandle, ColliderShape, DynamicsWorld};
use crate::scene::{Geometry, Material, Mesh, MeshHandle, Scene};

/// Smallest accepted box edge / sphere radius.
const MIN_EXTENT: f32 = 1e-3;

/// Stable identifier of a registered body. Monotonic, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(u64);

impl BodyId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shape of a registered body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyKind {
    Box { size: Vec3 },
    Sphere { radius: f32 },
}

impl BodyKind {
    fn collider(&self) -> ColliderShape {
        match *self {
            BodyKind::Box { size } => ColliderShape::Cuboid { half_extents: size * 0.5 },
            BodyKind::Sphere { radius } => ColliderShape::Ball { radius },
        }
    }

    fn geometry(&self) -> Geometry {
        match *self {
            BodyKind::Box { size } => Geometry::Box { size },
            BodyKind::Sphere { radius } => Geometry::Sphere { radius },
        }
    }
}

/// Per-spawn overrides. Unset fields fall back to [`BodyDefaults`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpawnOptions {
    pub mass: Option<f32>,
    pub color: Option<u32>,
    pub position: Option<Vec3>,
}

impl SpawnOptions {
    pub fn at(position: Vec3) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }
}

/// One logical object: a dynamics body and the mesh that draws it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyEntry {
    pub id: BodyId,
    pub kind: BodyKind,
    pub body: BodyHandle,
    pub mesh: MeshHandle,
}

/// Owner of every registered body.
#[derive(Debug, Clone)]
pub struct BodyRegistry {
    entries: BTreeMap<BodyId, BodyEntry>,
    next_id: u64,
    defaults: BodyDefaults,
    mass_epsilon: f32,
}

impl Default for BodyRegistry {
    fn default() -> Self {
        Self::new(BodyDefaults::default(), 1e-4)
    }
}

impl BodyRegistry {
    pub fn new(defaults: BodyDefaults, mass_epsilon: f32) -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: 1,
            defaults,
            mass_epsilon,
        }
    }

    pub fn defaults(&self) -> &BodyDefaults {
        &self.defaults
    }

    /// Register a box of full extents `size`.
    pub fn add_box(
        &mut self,
        world: &mut DynamicsWorld,
        scene: &mut Scene,
        size: Vec3,
        options: SpawnOptions,
    ) -> BodyId {
        let size = size.max(Vec3::splat(MIN_EXTENT));
        let color = options.color.unwrap_or(self.defaults.box_color);
        let restitution = self.defaults.box_restitution;
        self.insert(world, scene, BodyKind::Box { size }, options, color, restitution)
    }

    /// Register a sphere.
    pub fn add_sphere(
        &mut self,
        world: &mut DynamicsWorld,
        scene: &mut Scene,
        radius: f32,
        options: SpawnOptions,
    ) -> BodyId {
        let radius = radius.max(MIN_EXTENT);
        let color = options.color.unwrap_or(self.defaults.sphere_color);
        let restitution = self.defaults.sphere_restitution;
        self.insert(world, scene, BodyKind::Sphere { radius }, options, color, restitution)
    }

    fn insert(
        &mut self,
        world: &mut DynamicsWorld,
        scene: &mut Scene,
        kind: BodyKind,
        options: SpawnOptions,
        color: u32,
        restitution: f32,
    ) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;

        let mass = self.clamp_mass(options.mass.unwrap_or(self.defaults.mass));
        let position = options.position.unwrap_or(self.defaults.spawn_position);

        let desc = BodyDesc::dynamic(kind.collider(), position, mass)
            .with_material(self.defaults.friction, restitution);
        let body = world.add_body(&desc);
        let mesh = scene.add(Mesh::new(kind.geometry(), Material::new(color)).with_position(position));

        self.entries.insert(id, BodyEntry { id, kind, body, mesh });
        debug!("registered body {} ({:?}, mass {:.3}) at {:?}", id, kind, mass, position);
        id
    }

    fn clamp_mass(&self, mass: f32) -> f32 {
        if mass > 0.0 && mass.is_finite() {
            mass
        } else {
            warn!("mass {} is not positive, clamping to {}", mass, self.mass_epsilon);
            self.mass_epsilon
        }
    }

    /// Remove a body from the world, its mesh from the scene, and the entry itself.
    pub fn remove(
        &mut self,
        id: BodyId,
        world: &mut DynamicsWorld,
        scene: &mut Scene,
    ) -> Result<BodyEntry, RegistryError> {
        let entry = self.entries.remove(&id).ok_or(RegistryError::NotFound(id))?;
        world.remove_body(entry.body);
        scene.remove(entry.mesh);
        debug!("removed body {}", id);
        Ok(entry)
    }

    /// Remove every registered body. Returns the removed ids in creation order.
    pub fn clear(&mut self, world: &mut DynamicsWorld, scene: &mut Scene) -> Vec<BodyId> {
        let ids = self.ids();
        for id in &ids {
            if let Some(entry) = self.entries.remove(id) {
                world.remove_body(entry.body);
                scene.remove(entry.mesh);
            }
        }
        ids
    }

    pub fn get(&self, id: BodyId) -> Option<&BodyEntry> {
        self.entries.get(&id)
    }

    /// Like [`get`](Self::get) but reports the missing id.
    pub fn lookup(&self, id: BodyId) -> Result<&BodyEntry, RegistryError> {
        self.entries.get(&id).ok_or(RegistryError::NotFound(id))
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Entries in creation order.
    pub fn all(&self) -> impl Iterator<Item = &BodyEntry> {
        self.entries.values()
    }

    pub fn ids(&self) -> Vec<BodyId> {
        self.entries.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy every body's simulated pose onto its mesh.
    pub fn sync_poses(&self, world: &DynamicsWorld, scene: &mut Scene) {
        for entry in self.entries.values() {
            let (Some(position), Some(rotation)) =
                (world.translation(entry.body), world.rotation(entry.body))
            else {
                continue;
            };
            if let Some(mesh) = scene.get_mut(entry.mesh) {
                mesh.set_pose(position, rotation);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (BodyRegistry, DynamicsWorld, Scene) {
        (BodyRegistry::default(), DynamicsWorld::default(), Scene::default())
    }

    #[test]
    fn test_ids_are_monotonic_and_never_reused() {
        let (mut registry, mut world, mut scene) = setup();
        let a = registry.add_box(&mut world, &mut scene, Vec3::ONE, SpawnOptions::default());
        let b = registry.add_sphere(&mut world, &mut scene, 0.5, SpawnOptions::default());
        registry.remove(b, &mut world, &mut scene).unwrap();
        let c = registry.add_box(&mut world, &mut scene, Vec3::ONE, SpawnOptions::default());
        assert!(a < b && b < c);
    }

    #[test]
    fn test_add_creates_body_and_mesh_together() {
        let (mut registry, mut world, mut scene) = setup();
        let id = registry.add_box(&mut world, &mut scene, Vec3::ONE, SpawnOptions::default());
        let entry = *registry.get(id).unwrap();
        assert!(world.contains(entry.body));
        assert!(scene.contains(entry.mesh));
        assert_eq!(world.translation(entry.body), Some(Vec3::new(0.0, 2.0, 0.0)));
    }

    #[test]
    fn test_remove_unknown_reports_not_found() {
        let (mut registry, mut world, mut scene) = setup();
        let missing = BodyId::from_raw(99);
        assert_eq!(
            registry.remove(missing, &mut world, &mut scene),
            Err(RegistryError::NotFound(missing))
        );
    }

    #[test]
    fn test_remove_disposes_mesh_and_body() {
        let (mut registry, mut world, mut scene) = setup();
        let id = registry.add_sphere(&mut world, &mut scene, 0.5, SpawnOptions::default());
        let entry = registry.remove(id, &mut world, &mut scene).unwrap();
        assert!(!world.contains(entry.body));
        assert!(!scene.contains(entry.mesh));
        assert!(registry.get(id).is_none());
    }

    #[test]
    fn test_options_override_defaults() {
        let (mut registry, mut world, mut scene) = setup();
        let id = registry.add_box(
            &mut world,
            &mut scene,
            Vec3::ONE,
            SpawnOptions::at(Vec3::new(1.0, 5.0, -1.0)).with_color(0x00ff00),
        );
        let entry = registry.get(id).unwrap();
        let mesh = scene.get(entry.mesh).unwrap();
        assert_eq!(mesh.material.color, 0x00ff00);
        assert_eq!(mesh.position, Vec3::new(1.0, 5.0, -1.0));
    }

    #[test]
    fn test_non_positive_mass_is_clamped() {
        let (mut registry, mut world, mut scene) = setup();
        let id = registry.add_box(
            &mut world,
            &mut scene,
            Vec3::ONE,
            SpawnOptions::default().with_mass(-2.0),
        );
        let body = registry.get(id).unwrap().body;
        world.step(1.0 / 60.0);
        let mass = world.mass(body).unwrap();
        assert!(mass > 0.0 && mass < 1e-3, "mass {mass}");
    }

    #[test]
    fn test_clear_returns_ids_in_creation_order() {
        let (mut registry, mut world, mut scene) = setup();
        let a = registry.add_box(&mut world, &mut scene, Vec3::ONE, SpawnOptions::default());
        let b = registry.add_sphere(&mut world, &mut scene, 0.5, SpawnOptions::default());
        assert_eq!(registry.clear(&mut world, &mut scene), vec![a, b]);
        assert!(registry.is_empty());
        assert_eq!(world.body_count(), 0);
        assert!(scene.is_empty());
    }
}
