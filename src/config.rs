// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::{APP_DIR_NAME, DEFAULT_FILE_NAME, DEFAULT_RESOLUTION, EncodingQuality, files};
use crate::errors::StoreError;
use crate::storage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Capture size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both dimensions are non-zero and the RGBA buffer size fits `usize`
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0 && self.rgba_len().is_some()
    }

    /// Byte length of an RGBA8 buffer of this size
    pub fn rgba_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(4)
    }

    /// Parse `WIDTHxHEIGHT`
    pub fn parse(s: &str) -> Result<Self, String> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("Invalid resolution '{}'. Use WIDTHxHEIGHT", s))?;
        let width: u32 = w
            .trim()
            .parse()
            .map_err(|_| format!("Invalid width '{}' in resolution", w))?;
        let height: u32 = h
            .trim()
            .parse()
            .map_err(|_| format!("Invalid height '{}' in resolution", h))?;
        let resolution = Self::new(width, height);
        if width == 0 || height == 0 {
            return Err("Resolution width and height must be greater than 0".to_string());
        }
        if !resolution.is_valid() {
            return Err(format!("Resolution {} is too large", resolution));
        }
        Ok(resolution)
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::new(DEFAULT_RESOLUTION.0, DEFAULT_RESOLUTION.1)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// How the encoded payload reaches the disk
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum WriteMode {
    /// Block the caller until the file is written and synced
    #[default]
    Synchronous,
    /// Hand the write to a background task and return immediately
    NonBlocking,
}

/// Output image format
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Hash, Serialize)]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
    Tga,
    /// Declared but not wired to an encoder
    Exr,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 4] = [
        ImageFormat::Png,
        ImageFormat::Jpeg,
        ImageFormat::Tga,
        ImageFormat::Exr,
    ];

    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Tga => "tga",
            ImageFormat::Exr => "exr",
        }
    }

    /// Look up a format by extension (case-insensitive, `jpeg` accepted)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "tga" => Some(ImageFormat::Tga),
            "exr" => Some(ImageFormat::Exr),
            _ => None,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Settings read by the capture pipeline
///
/// Owned by whatever edits it (CLI flags, a settings file, a UI panel);
/// the pipeline only reads it, except that the session writes the
/// disambiguated name back into `file_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Capture size used when `override_resolution` is set
    pub target_resolution: Resolution,
    /// Use `target_resolution` instead of the camera's viewport size
    pub override_resolution: bool,
    pub write_mode: WriteMode,
    pub image_format: ImageFormat,
    /// Only affects JPEG
    pub jpeg_quality: EncodingQuality,
    /// Append `-<counter>` to every saved file name
    pub serialize_sequence: bool,
    /// Register new names without probing the disk for collisions
    pub overwrite_on_collision: bool,
    pub folder_path: String,
    pub file_name: String,
    /// Log every saved path at info level
    pub log_capture: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            target_resolution: Resolution::default(),
            override_resolution: false,
            write_mode: WriteMode::default(),
            image_format: ImageFormat::Png,
            jpeg_quality: EncodingQuality::default(),
            serialize_sequence: true,
            overwrite_on_collision: false,
            folder_path: storage::default_output_dir().to_string_lossy().into_owned(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            log_capture: false,
        }
    }
}

impl CaptureConfig {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| StoreError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| StoreError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Write configuration as pretty JSON, creating the parent directory
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let write_err = |e: &dyn fmt::Display| StoreError::Write {
            path: path.to_path_buf(),
            message: e.to_string(),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| write_err(&e))?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| write_err(&e))?;
        std::fs::write(path, json).map_err(|e| write_err(&e))
    }

    /// Resolution to capture at, given the camera's own viewport size
    pub fn effective_resolution(&self, viewport: Resolution) -> Resolution {
        if self.override_resolution {
            self.target_resolution
        } else {
            viewport
        }
    }
}

/// Get the default config file path
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join(APP_DIR_NAME)
        .join(files::CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolution() {
        assert_eq!(Resolution::parse("640x480"), Ok(Resolution::new(640, 480)));
        assert!(Resolution::parse("0x480").is_err());
        assert!(Resolution::parse("640").is_err());
        assert!(Resolution::parse("axb").is_err());
    }

    #[test]
    fn test_oversized_resolution_is_invalid() {
        let huge = Resolution::new(u32::MAX, u32::MAX);
        assert_eq!(huge.rgba_len(), None);
        assert!(!huge.is_valid());
        assert!(Resolution::parse("4294967295x4294967295").is_err());
        assert_eq!(Resolution::new(2, 3).rgba_len(), Some(24));
    }

    #[test]
    fn test_effective_resolution() {
        let mut config = CaptureConfig::default();
        let viewport = Resolution::new(800, 600);
        assert_eq!(config.effective_resolution(viewport), viewport);

        config.override_resolution = true;
        config.target_resolution = Resolution::new(64, 32);
        assert_eq!(config.effective_resolution(viewport), Resolution::new(64, 32));
    }

    #[test]
    fn test_format_extensions() {
        assert_eq!(ImageFormat::Png.extension(), "png");
        assert_eq!(ImageFormat::Jpeg.extension(), "jpg");
        assert_eq!(ImageFormat::Tga.extension(), "tga");
        assert_eq!(ImageFormat::from_extension("JPEG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("gif"), None);
        for format in ImageFormat::ALL {
            assert_eq!(ImageFormat::from_extension(format.extension()), Some(format));
        }
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: CaptureConfig =
            serde_json::from_str(r#"{ "file_name": "shot", "image_format": "Tga" }"#).unwrap();
        assert_eq!(config.file_name, "shot");
        assert_eq!(config.image_format, ImageFormat::Tga);
        assert!(config.serialize_sequence);
        assert_eq!(config.write_mode, WriteMode::Synchronous);
    }
}
