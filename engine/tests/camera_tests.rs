//! Camera Tests - Projection, Unprojection and Raycast
//!
//! Round-trips pixels through the camera the sandbox uses for picking.

use glam::{Vec2, Vec3};
use physics_lab_engine::camera::{Camera, Ray, Viewport, raycast_to_plane};
use physics_lab_engine::config::CameraConfig;

fn sandbox_camera(viewport: &Viewport) -> Camera {
    Camera::from_config(&CameraConfig::default(), viewport.aspect())
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_default_camera_matches_config() {
    let config = CameraConfig::default();
    assert_eq!(config.position, Vec3::new(10.0, 8.0, 14.0));
    assert_eq!(config.target, Vec3::new(0.0, 1.0, 0.0));

    let camera = Camera::from_config(&config, 2.0);
    assert!((camera.fov_y - 60.0_f32.to_radians()).abs() < 1e-6);
    assert_eq!(camera.aspect, 2.0);
}

#[test]
fn test_invalid_aspect_falls_back_to_square() {
    let camera = Camera::from_config(&CameraConfig::default(), f32::NAN);
    assert_eq!(camera.aspect, 1.0);
}

// ============================================================================
// Pixel <-> world
// ============================================================================

#[test]
fn test_pixel_ray_passes_through_projected_point() {
    let viewport = Viewport::new(1280.0, 720.0);
    let camera = sandbox_camera(&viewport);
    let point = Vec3::new(1.5, 0.75, -2.0);

    let ndc = camera.view_proj().project_point3(point);
    let x = (ndc.x + 1.0) * 0.5 * viewport.width;
    let y = (1.0 - ndc.y) * 0.5 * viewport.height;
    let ray = camera.ray_from_pixel(&viewport, x, y);

    let t = (point - ray.origin).dot(ray.direction);
    assert!(t > 0.0);
    assert!(ray.at(t).distance(point) < 1e-3, "missed by {}", ray.at(t).distance(point));
}

#[test]
fn test_viewport_center_is_ndc_origin() {
    let viewport = Viewport::new(800.0, 600.0);
    assert_eq!(viewport.pixel_to_ndc(400.0, 300.0), Vec2::ZERO);
    assert_eq!(viewport.pixel_to_ndc(0.0, 0.0), Vec2::new(-1.0, 1.0));
    assert_eq!(viewport.pixel_to_ndc(800.0, 600.0), Vec2::new(1.0, -1.0));
}

#[test]
fn test_empty_viewport_maps_to_center() {
    let viewport = Viewport::new(0.0, 600.0);
    assert!(viewport.is_empty());
    assert_eq!(viewport.aspect(), 1.0);
    assert_eq!(viewport.pixel_to_ndc(10.0, 10.0), Vec2::ZERO);
}

// ============================================================================
// Plane intersection
// ============================================================================

#[test]
fn test_center_ray_hits_drag_plane_below_target() {
    let viewport = Viewport::default();
    let camera = sandbox_camera(&viewport);
    let hit = raycast_to_plane(&camera, Vec2::ZERO, 0.0).unwrap();
    assert!(hit.y.abs() < 1e-4);
    // the look-at target is above the plane, so the hit lies beyond it
    let eye_to_target = camera.target - camera.position;
    assert!((hit - camera.position).length() > eye_to_target.length());
}

#[test]
fn test_ray_parallel_to_plane_misses() {
    let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
    assert!(ray.intersect_horizontal_plane(0.0).is_none());
}

#[test]
fn test_plane_behind_ray_misses() {
    let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
    assert!(ray.intersect_horizontal_plane(0.0).is_none());
    let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);
    assert_eq!(ray.intersect_horizontal_plane(0.0), Some(Vec3::ZERO));
}
