//! Raycast Module
//!
//! World-space rays and plane intersection, used for picking and for moving
//! the drag anchor across the horizontal drag plane.

use glam::{Vec2, Vec3};

use super::Camera;

/// A half-line in world space. `direction` is always normalized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray; the direction is normalized (zero stays zero).
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Intersection with the horizontal plane `y = height`.
    pub fn intersect_horizontal_plane(&self, height: f32) -> Option<Vec3> {
        ray_plane_intersect(self, Vec3::Y, height)
    }
}

/// Intersect a ray with the plane `dot(normal, p) = offset`.
///
/// # Returns
/// * `Some(point)` - The intersection in front of the ray origin
/// * `None` - The ray is parallel to the plane or the plane is behind it
pub fn ray_plane_intersect(ray: &Ray, normal: Vec3, offset: f32) -> Option<Vec3> {
    let denom = normal.dot(ray.direction);
    if denom.abs() < 1e-6 {
        // Parallel
        return None;
    }

    let t = (offset - normal.dot(ray.origin)) / denom;
    if t < 0.0 {
        // Behind the camera
        return None;
    }

    Some(ray.at(t))
}

/// Cast a ray from a normalized-device coordinate through `camera` and
/// intersect it with the horizontal plane at `plane_height`.
pub fn raycast_to_plane(camera: &Camera, ndc: Vec2, plane_height: f32) -> Option<Vec3> {
    camera.ray_from_ndc(ndc).intersect_horizontal_plane(plane_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_direction_normalized() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0));
        assert!((ray.direction.length() - 1.0).abs() < 1e-6);
        assert_eq!(ray.at(5.0), Vec3::new(3.0, 4.0, 0.0));
    }

    #[test]
    fn test_downward_ray_hits_ground() {
        let ray = Ray::new(Vec3::new(1.0, 10.0, 2.0), Vec3::NEG_Y);
        let hit = ray.intersect_horizontal_plane(0.0).unwrap();
        assert_eq!(hit, Vec3::new(1.0, 0.0, 2.0));
    }

    #[test]
    fn test_parallel_ray_misses() {
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        assert!(ray.intersect_horizontal_plane(0.0).is_none());
    }

    #[test]
    fn test_plane_behind_origin_misses() {
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        assert!(ray.intersect_horizontal_plane(0.0).is_none());
    }

    #[test]
    fn test_raycast_through_screen_center_lands_on_target() {
        let camera = Camera {
            position: Vec3::new(0.0, 10.0, 10.0),
            target: Vec3::ZERO,
            ..Camera::default()
        };
        let hit = raycast_to_plane(&camera, Vec2::ZERO, 0.0).unwrap();
        assert!(hit.length() < 1e-2, "expected origin, got {hit:?}");
    }
}
