//! Spatial Picking
//!
//! Nearest registered body under a world-space ray. Hits are tested against
//! the visual geometry at its current pose; the ground is never a candidate
//! because it is not in the registry.

use glam::Vec3;

use super::{BodyId, BodyRegistry};
use crate::camera::Ray;
use crate::physics::{RayHit, ray_obb_intersect, ray_sphere_intersect};
use crate::scene::{Geometry, Scene};

/// Result of a successful pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub id: BodyId,
    /// Exact world-space intersection point
    pub point: Vec3,
    pub distance: f32,
}

/// Cast `ray` against every registered mesh and return the closest hit.
pub fn pick(ray: &Ray, registry: &BodyRegistry, scene: &Scene) -> Option<PickHit> {
    let mut best: Option<PickHit> = None;
    for entry in registry.all() {
        let Some(mesh) = scene.get(entry.mesh) else {
            continue;
        };
        if !mesh.visible {
            continue;
        }
        let hit: Option<RayHit> = match mesh.geometry {
            Geometry::Box { size } => {
                ray_obb_intersect(ray.origin, ray.direction, mesh.position, mesh.rotation, size)
            }
            Geometry::Sphere { radius } => {
                ray_sphere_intersect(ray.origin, ray.direction, mesh.position, radius)
            }
            Geometry::Plane { .. } | Geometry::Segment { .. } => None,
        };
        if let Some(hit) = hit {
            if best.is_none_or(|b| hit.distance < b.distance) {
                best = Some(PickHit {
                    id: entry.id,
                    point: hit.point,
                    distance: hit.distance,
                });
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::DynamicsWorld;
    use crate::sandbox::SpawnOptions;

    #[test]
    fn test_nearest_of_two_along_ray() {
        let mut world = DynamicsWorld::default();
        let mut scene = Scene::default();
        let mut registry = BodyRegistry::default();
        let far = registry.add_box(&mut world, &mut scene, Vec3::ONE, SpawnOptions::at(Vec3::new(0.0, 0.0, -5.0)));
        let near = registry.add_sphere(&mut world, &mut scene, 0.5, SpawnOptions::at(Vec3::new(0.0, 0.0, 5.0)));

        let ray = Ray::new(Vec3::new(0.0, 0.0, 20.0), Vec3::NEG_Z);
        let hit = pick(&ray, &registry, &scene).unwrap();
        assert_eq!(hit.id, near);
        assert!((hit.point - Vec3::new(0.0, 0.0, 5.5)).length() < 1e-4);

        let ray = Ray::new(Vec3::new(0.0, 0.0, -20.0), Vec3::Z);
        assert_eq!(pick(&ray, &registry, &scene).unwrap().id, far);
    }

    #[test]
    fn test_hit_point_is_exact_not_center() {
        let mut world = DynamicsWorld::default();
        let mut scene = Scene::default();
        let mut registry = BodyRegistry::default();
        registry.add_box(&mut world, &mut scene, Vec3::splat(2.0), SpawnOptions::at(Vec3::ZERO));
        let ray = Ray::new(Vec3::new(0.8, 10.0, 0.3), Vec3::NEG_Y);
        let hit = pick(&ray, &registry, &scene).unwrap();
        assert!((hit.point - Vec3::new(0.8, 1.0, 0.3)).length() < 1e-4);
    }

    #[test]
    fn test_empty_space_misses() {
        let mut world = DynamicsWorld::default();
        let mut scene = Scene::default();
        let mut registry = BodyRegistry::default();
        registry.add_box(&mut world, &mut scene, Vec3::ONE, SpawnOptions::at(Vec3::ZERO));
        let ray = Ray::new(Vec3::new(5.0, 5.0, 5.0), Vec3::Y);
        assert!(pick(&ray, &registry, &scene).is_none());
    }
}
