//! Error types shared across the core.
//!
//! None of these reach the process boundary during normal operation:
//! capture and pipeline failures degrade to the fallback grid, pointer
//! failures are logged. Only [`ConfigError`] is surfaced, at startup.

use thiserror::Error;

/// Invalid pixel data handed to a [`crate::frame::Frame`] constructor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("frame dimensions must be non-zero (got {width}x{height})")]
    EmptyDimensions { width: u32, height: u32 },

    #[error("pixel buffer has {actual} bytes, expected {expected} for {width}x{height}")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Screen capture failed; the detector falls back to the canonical grid.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no screen available to capture")]
    NoScreen,

    #[error("failed to acquire capture resources: {0}")]
    Resource(String),

    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// The vision pipeline could not run on a frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectError {
    #[error("frame too small for analysis ({width}x{height})")]
    FrameTooSmall { width: u32, height: u32 },
}

/// A cursor or scroll request was not delivered.
#[derive(Debug, Error)]
#[error("pointer action failed: {0}")]
pub struct PointerError(pub String);

/// Configuration rejected at load time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field}: minimum {min} exceeds maximum {max}")]
    InvertedBounds {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{field} must be {requirement}")]
    OutOfRange {
        field: &'static str,
        requirement: &'static str,
    },

    #[error("invalid hotkey '{binding}' for {action}")]
    InvalidHotkey {
        action: &'static str,
        binding: String,
    },

    #[error("duplicate hotkey '{binding}'")]
    DuplicateHotkey { binding: String },

    #[error("keyboard layout: {0}")]
    InvalidLayout(String),
}
