//! Lab Configuration
//!
//! Starting parameters for the fixed-topology lab demonstrations.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::labs::{InclineParams, PendulumParams, ProjectileParams};

/// Starting parameters for every lab, plus the shared frame clamp.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LabConfig {
    /// Largest wall-clock delta a single frame may integrate (seconds).
    pub max_frame_dt: f32,
    pub pendulum: PendulumParams,
    pub incline: InclineParams,
    pub projectile: ProjectileParams,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            max_frame_dt: 0.033,
            pendulum: PendulumParams::default(),
            incline: InclineParams::default(),
            projectile: ProjectileParams::default(),
        }
    }
}

impl LabConfig {
    /// Load from a JSON file; absent fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        super::load_json(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override() {
        let config: LabConfig = serde_json::from_str(r#"{ "pendulum": { "length": 3.5 } }"#).unwrap();
        assert_eq!(config.pendulum.length, 3.5);
        assert_eq!(config.pendulum.gravity, PendulumParams::default().gravity);
        assert_eq!(config.incline, InclineParams::default());
        assert_eq!(config.max_frame_dt, 0.033);
    }
}
