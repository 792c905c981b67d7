//! Closed-form projectile references
//!
//! Drag-free ballistics in the X-Y plane. The labs use these to sanity-check
//! the simulated flight and to show expected values next to the measured
//! ones; the simulation itself always comes from the dynamics world.

use glam::Vec3;

/// Initial conditions of a launch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchParams {
    /// Launch speed (m/s)
    pub speed: f32,
    /// Elevation above the +X axis (degrees)
    pub angle_deg: f32,
    /// Gravity magnitude (m/s², positive)
    pub gravity: f32,
    /// Height of the launch point above the landing plane (m)
    pub height: f32,
}

impl Default for LaunchParams {
    fn default() -> Self {
        Self {
            speed: 20.0,
            angle_deg: 45.0,
            gravity: 9.81,
            height: 0.0,
        }
    }
}

/// Velocity vector for a launch at `speed` and `angle_deg` in the X-Y plane.
pub fn launch_velocity(speed: f32, angle_deg: f32) -> Vec3 {
    let theta = angle_deg.to_radians();
    Vec3::new(speed * theta.cos(), speed * theta.sin(), 0.0)
}

impl LaunchParams {
    pub fn velocity(&self) -> Vec3 {
        launch_velocity(self.speed, self.angle_deg)
    }

    /// Time until the projectile returns to y = 0. Zero when gravity is not positive.
    pub fn flight_time(&self) -> f32 {
        if self.gravity <= 0.0 {
            return 0.0;
        }
        let vy = self.velocity().y;
        let disc = vy * vy + 2.0 * self.gravity * self.height.max(0.0);
        (vy + disc.sqrt()) / self.gravity
    }

    /// Horizontal distance travelled before reaching y = 0.
    pub fn range(&self) -> f32 {
        self.velocity().x * self.flight_time()
    }

    /// Apex height above the landing plane.
    pub fn max_height(&self) -> f32 {
        if self.gravity <= 0.0 {
            return self.height;
        }
        let vy = self.velocity().y.max(0.0);
        self.height + vy * vy / (2.0 * self.gravity)
    }

    /// Position at time `t` after launch.
    pub fn position_at(&self, t: f32) -> Vec3 {
        let v = self.velocity();
        Vec3::new(
            v.x * t,
            self.height + v.y * t - 0.5 * self.gravity * t * t,
            0.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_at_45_degrees() {
        let launch = LaunchParams::default();
        // v²/g for a ground-level launch
        assert!((launch.range() - 400.0 / 9.81).abs() < 1e-3);
    }

    #[test]
    fn test_max_height_includes_launch_height() {
        let launch = LaunchParams {
            speed: 10.0,
            angle_deg: 90.0,
            gravity: 10.0,
            height: 1.0,
        };
        assert!((launch.max_height() - 6.0).abs() < 1e-4);
    }

    #[test]
    fn test_raised_launch_lands_further() {
        let ground = LaunchParams::default();
        let raised = LaunchParams { height: 5.0, ..ground };
        assert!(raised.range() > ground.range());
        assert!(raised.position_at(raised.flight_time()).y.abs() < 1e-3);
    }

    #[test]
    fn test_no_gravity_has_no_flight() {
        let launch = LaunchParams { gravity: 0.0, ..Default::default() };
        assert_eq!(launch.flight_time(), 0.0);
        assert_eq!(launch.range(), 0.0);
    }
}
