//! Config Module
//!
//! Centralized configuration for the sandbox and the lab demonstrations.
//! Every struct implements `Default` with the values the demonstrations were
//! tuned with; a partial JSON file can override individual fields.

pub mod lab_config;
pub mod sandbox_config;

pub use lab_config::LabConfig;
pub use sandbox_config::{BodyDefaults, CameraConfig, RenderConfig, SandboxConfig, WorldConfig};

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::ConfigError;

/// Read a JSON config file, falling back to `Default` for missing fields.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}
