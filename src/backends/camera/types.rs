// SPDX-License-Identifier: GPL-3.0-only
// Shared types for camera backend abstraction

//! Shared types for camera backends

use crate::config::Resolution;
use image::RgbaImage;

/// Off-screen RGBA render destination
///
/// Created by the capture engine at the requested size and bound to a
/// camera for the duration of one capture.
#[derive(Debug, Clone)]
pub struct RenderTarget {
    resolution: Resolution,
    depth_bits: u8,
    color: RgbaImage,
}

impl RenderTarget {
    pub fn new(resolution: Resolution, depth_bits: u8) -> Self {
        Self {
            resolution,
            depth_bits,
            color: RgbaImage::new(resolution.width, resolution.height),
        }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn depth_bits(&self) -> u8 {
        self.depth_bits
    }

    /// Color attachment the camera renders into
    pub fn color_mut(&mut self) -> &mut RgbaImage {
        &mut self.color
    }

    /// Take the rendered pixels
    ///
    /// Fails if the renderer replaced the color attachment with one of a
    /// different size.
    pub fn read_pixels(self) -> BackendResult<RgbaImage> {
        let (width, height) = self.color.dimensions();
        if width != self.resolution.width || height != self.resolution.height {
            return Err(BackendError::RenderFailed(format!(
                "target is {}x{}, expected {}",
                width, height, self.resolution
            )));
        }
        Ok(self.color)
    }
}

/// Pixels read back from a camera
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    /// RGBA pixels at exactly the requested resolution
    pub image: RgbaImage,
    /// Name of the camera that rendered the frame
    pub camera: String,
}

impl CapturedFrame {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Backend-specific errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Rendering into the bound target failed
    RenderFailed(String),
    /// Source data could not be loaded
    IoError(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::RenderFailed(msg) => write!(f, "Render failed: {}", msg),
            BackendError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;
