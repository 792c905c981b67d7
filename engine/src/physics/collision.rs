//! Ray intersection tests used for pointer picking.
//!
//! Boxes are tested with the slab method in the box's local frame, spheres
//! analytically. All functions take a normalized ray direction and report the
//! nearest non-negative hit distance.

use glam::{Quat, Vec3};

/// Nearest intersection of a ray with a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
}

/// Ray vs axis-aligned box, slab method.
///
/// Returns the distance to the first intersection at or in front of the
/// origin; a ray starting inside the box reports its exit point.
pub fn ray_aabb_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<f32> {
    // Near-zero components map to huge slopes so that axis never clips.
    let inv = |d: f32| if d.abs() > 1e-10 { 1.0 / d } else { f32::MAX * d.signum() };
    let inv_dir = Vec3::new(inv(ray_dir.x), inv(ray_dir.y), inv(ray_dir.z));

    let t1 = (aabb_min - ray_origin) * inv_dir;
    let t2 = (aabb_max - ray_origin) * inv_dir;
    let t_min = t1.min(t2).max_element();
    let t_max = t1.max(t2).min_element();

    if t_max >= t_min && t_max >= 0.0 {
        Some(if t_min >= 0.0 { t_min } else { t_max })
    } else {
        None
    }
}

/// Ray vs oriented box of full extents `size` centered at `center`.
pub fn ray_obb_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    center: Vec3,
    rotation: Quat,
    size: Vec3,
) -> Option<RayHit> {
    let inverse = rotation.inverse();
    let local_origin = inverse * (ray_origin - center);
    let local_dir = inverse * ray_dir;
    let half = size * 0.5;
    let distance = ray_aabb_intersect(local_origin, local_dir, -half, half)?;
    Some(RayHit {
        distance,
        point: ray_origin + ray_dir * distance,
    })
}

/// Ray vs sphere.
pub fn ray_sphere_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    center: Vec3,
    radius: f32,
) -> Option<RayHit> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt = disc.sqrt();
    let near = -b - sqrt;
    let far = -b + sqrt;
    let distance = if near >= 0.0 {
        near
    } else if far >= 0.0 {
        far
    } else {
        return None;
    };
    Some(RayHit {
        distance,
        point: ray_origin + ray_dir * distance,
    })
}
