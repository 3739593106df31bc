//! Error types

use thiserror::Error;

/// Reasons a settings document is rejected
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Document is not valid settings JSON
    #[error("settings JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),

    /// A `min..=max` pair is empty or out of bounds
    #[error("invalid range for {field}: {min}..={max}")]
    InvalidRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    /// Countdown period must be non-zero
    #[error("tick period must be at least 1 ms")]
    InvalidPeriod,

    /// Volume outside 0.0 - 1.0
    #[error("{field} must be within 0.0..=1.0, got {value}")]
    InvalidVolume { field: &'static str, value: f32 },
}

/// Reasons the renderer could not be set up
#[derive(Error, Debug)]
pub enum RenderInitError {
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    /// Surface reports no texture format for this adapter
    #[error("surface offers no texture format")]
    NoSurfaceFormat,

    /// Surface reports no alpha compositing mode for this adapter
    #[error("surface offers no alpha mode")]
    NoAlphaMode,
}
