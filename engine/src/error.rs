//! Error Types
//!
//! Nothing in the interactive core surfaces an error to the end user: stale
//! ids and degenerate parameters degrade to "nothing happens" or "value is
//! clamped". These types exist so that callers can still observe *why* a
//! command did nothing (logging, tests) and so the desktop front-ends can
//! report configuration and GPU start-up failures.

use std::path::PathBuf;

use thiserror::Error;

use crate::sandbox::BodyId;

/// Registry lookups on an identifier that no longer (or never) existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The id was removed, or was never handed out.
    #[error("body {0} not found")]
    NotFound(BodyId),
}

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file was read but is not valid JSON for the expected shape.
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// GPU start-up failures in the desktop front-ends.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The window surface could not be created.
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    /// No adapter is compatible with the surface.
    #[error("no compatible GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    /// The adapter refused to create a device.
    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}
