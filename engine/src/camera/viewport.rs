//! Viewport
//!
//! Pixel-space size of the canvas the sandbox renders into, and the mapping
//! from pointer pixels to normalized device coordinates.

use glam::Vec2;

/// Size of the drawable area in physical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width / height, or 1.0 for an empty viewport.
    pub fn aspect(&self) -> f32 {
        if self.width > 0.0 && self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Whether the viewport has a drawable area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Map a pixel coordinate (origin top-left, y down) to NDC (y up).
    pub fn pixel_to_ndc(&self, x: f32, y: f32) -> Vec2 {
        if self.is_empty() {
            return Vec2::ZERO;
        }
        Vec2::new((x / self.width) * 2.0 - 1.0, -((y / self.height) * 2.0 - 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_to_ndc_corners() {
        let viewport = Viewport::new(800.0, 600.0);
        assert_eq!(viewport.pixel_to_ndc(0.0, 0.0), Vec2::new(-1.0, 1.0));
        assert_eq!(viewport.pixel_to_ndc(800.0, 600.0), Vec2::new(1.0, -1.0));
        assert_eq!(viewport.pixel_to_ndc(400.0, 300.0), Vec2::ZERO);
    }

    #[test]
    fn test_empty_viewport() {
        let viewport = Viewport::new(0.0, 600.0);
        assert!(viewport.is_empty());
        assert_eq!(viewport.aspect(), 1.0);
        assert_eq!(viewport.pixel_to_ndc(10.0, 10.0), Vec2::ZERO);
    }
}
