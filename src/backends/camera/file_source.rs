// SPDX-License-Identifier: GPL-3.0-only

//! Image file as a camera
//!
//! Loads a still image once and "renders" it by scaling it to whatever
//! target is bound. Lets the CLI capture without a live renderer.

use super::{BackendError, BackendResult, Camera, RenderTarget};
use crate::config::Resolution;
use image::RgbaImage;
use image::imageops::{self, FilterType};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Supported source image extensions
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tga", "bmp", "webp", "gif"];

/// Check if a file extension is a supported source image format
pub fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}

pub struct ImageFileCamera {
    path: PathBuf,
    source: RgbaImage,
    target: Option<RenderTarget>,
}

impl ImageFileCamera {
    /// Load the source image
    pub fn open(path: &Path) -> BackendResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        if !is_image_extension(&extension) {
            return Err(BackendError::IoError(format!(
                "Unsupported file format: {}",
                extension
            )));
        }

        info!(path = %path.display(), "Loading image file");
        let source = image::open(path)
            .map_err(|e| {
                BackendError::IoError(format!("Failed to load image '{}': {}", path.display(), e))
            })?
            .to_rgba8();
        info!(width = source.width(), height = source.height(), "Image loaded successfully");

        Ok(Self::from_image(path.to_path_buf(), source))
    }

    /// Wrap an already decoded image
    pub fn from_image(path: PathBuf, source: RgbaImage) -> Self {
        Self {
            path,
            source,
            target: None,
        }
    }
}

impl Camera for ImageFileCamera {
    fn name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
    }

    fn viewport(&self) -> Resolution {
        Resolution::new(self.source.width(), self.source.height())
    }

    fn swap_target(&mut self, target: Option<RenderTarget>) -> Option<RenderTarget> {
        std::mem::replace(&mut self.target, target)
    }

    fn render(&mut self) -> BackendResult<()> {
        let viewport = self.viewport();
        let Some(target) = self.target.as_mut() else {
            return Ok(());
        };
        let size = target.resolution();
        if size == viewport {
            target.color_mut().copy_from_slice(self.source.as_raw());
        } else {
            debug!(from = %viewport, to = %size, "Scaling source image");
            *target.color_mut() =
                imageops::resize(&self.source, size.width, size.height, FilterType::Triangle);
        }
        Ok(())
    }
}
