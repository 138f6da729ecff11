// SPDX-License-Identifier: GPL-3.0-only

//! Captured frame encoding
//!
//! This module converts RGBA frames into file payloads:
//! - PNG (lossless, RGBA)
//! - JPEG (lossy, alpha dropped, quality from config)
//! - TGA (uncompressed RGBA)
//!
//! A format without an encoder produces an empty payload instead of an
//! error; callers check [`EncodedImage::is_empty`] before writing.

use crate::config::ImageFormat;
use crate::constants::EncodingQuality;
use image::RgbaImage;
use std::io::Cursor;
use tracing::{debug, error, warn};

/// Encoded image data ready for saving
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl EncodedImage {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Frame encoder
#[derive(Debug, Clone)]
pub struct ImageEncoder {
    format: ImageFormat,
    quality: EncodingQuality,
}

impl ImageEncoder {
    pub fn with_format(format: ImageFormat, quality: EncodingQuality) -> Self {
        Self { format, quality }
    }

    /// Encode `image` in the configured format
    ///
    /// Returns an empty payload when the format is not wired up or the
    /// codec fails; the reason is logged.
    pub fn encode(&self, image: &RgbaImage) -> EncodedImage {
        let result = match self.format {
            ImageFormat::Png => Self::encode_with(image, image::ImageFormat::Png),
            ImageFormat::Jpeg => Self::encode_jpeg(image, self.quality),
            ImageFormat::Tga => Self::encode_with(image, image::ImageFormat::Tga),
            ImageFormat::Exr => {
                warn!(format = %self.format, "No encoder wired for format");
                Ok(Vec::new())
            }
        };

        let data = result.unwrap_or_else(|e| {
            error!(format = %self.format, error = %e, "Encoding failed");
            Vec::new()
        });
        debug!(format = %self.format, size = data.len(), "Encoding complete");

        EncodedImage {
            data,
            format: self.format,
            width: image.width(),
            height: image.height(),
        }
    }

    /// Encode straight RGBA through the `image` crate's writer
    fn encode_with(image: &RgbaImage, format: image::ImageFormat) -> Result<Vec<u8>, String> {
        let mut buffer = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut buffer), format)
            .map_err(|e| format!("{:?} encoding failed: {}", format, e))?;
        Ok(buffer)
    }

    /// Encode image as JPEG
    fn encode_jpeg(image: &RgbaImage, quality: EncodingQuality) -> Result<Vec<u8>, String> {
        // JPEG has no alpha channel
        let rgb = image::DynamicImage::ImageRgba8(image.clone()).to_rgb8();

        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);
        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality.jpeg_quality());
        encoder
            .encode(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| format!("JPEG encoding failed: {}", e))?;

        Ok(buffer)
    }
}
