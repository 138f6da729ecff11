// SPDX-License-Identifier: MPL-2.0

//! Error types for the capture pipeline

use crate::backends::camera::BackendError;
use crate::config::ImageFormat;
use std::fmt;
use std::path::PathBuf;

/// Result type alias using CaptureError
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Reasons a `capture_and_save` call aborts
///
/// None of these are fatal: the session stays usable and the caller can
/// fix the configuration and try again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// No camera bound to the session
    InvalidCamera,
    /// Output folder is empty or does not exist
    InvalidFolder(String),
    /// Resolved file name is empty or not a plain file name
    InvalidFileName(String),
    /// Requested capture size has a zero dimension
    InvalidResolution { width: u32, height: u32 },
    /// Camera failed to render into the off-screen target
    Render(String),
    /// Write failed (missing directory, permissions, disk full)
    Io(String),
    /// Encoder produced no payload for this format
    UnsupportedFormat(ImageFormat),
    /// Metadata store could not be read or written
    Store(StoreError),
}

/// Metadata persistence errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Reading the store file failed
    Read { path: PathBuf, message: String },
    /// Store file exists but is not valid JSON for the expected layout
    Parse { path: PathBuf, message: String },
    /// Writing the store file failed
    Write { path: PathBuf, message: String },
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::InvalidCamera => write!(f, "Camera is missing"),
            CaptureError::InvalidFolder(path) if path.is_empty() => {
                write!(f, "Save folder is empty")
            }
            CaptureError::InvalidFolder(path) => {
                write!(f, "Save folder '{}' does not exist", path)
            }
            CaptureError::InvalidFileName(name) if name.is_empty() => {
                write!(f, "File name is empty")
            }
            CaptureError::InvalidFileName(name) => write!(f, "Invalid file name '{}'", name),
            CaptureError::InvalidResolution { width, height } => {
                write!(f, "Invalid capture resolution {}x{}", width, height)
            }
            CaptureError::Render(msg) => write!(f, "Render failed: {}", msg),
            CaptureError::Io(msg) => write!(f, "I/O error: {}", msg),
            CaptureError::UnsupportedFormat(format) => {
                write!(f, "Encoding to {} is not supported", format)
            }
            CaptureError::Store(e) => write!(f, "Metadata store error: {}", e),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Read { path, message } => {
                write!(f, "Failed to read '{}': {}", path.display(), message)
            }
            StoreError::Parse { path, message } => {
                write!(f, "Failed to parse '{}': {}", path.display(), message)
            }
            StoreError::Write { path, message } => {
                write!(f, "Failed to write '{}': {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for CaptureError {}
impl std::error::Error for StoreError {}

impl From<StoreError> for CaptureError {
    fn from(err: StoreError) -> Self {
        CaptureError::Store(err)
    }
}

impl From<BackendError> for CaptureError {
    fn from(err: BackendError) -> Self {
        CaptureError::Render(err.to_string())
    }
}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::Io(err.to_string())
    }
}
