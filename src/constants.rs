// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use serde::{Deserialize, Serialize};

/// Directory name used under the platform config and data dirs
pub const APP_DIR_NAME: &str = "camera-capture";

/// Base file name restored by `reset`
pub const DEFAULT_FILE_NAME: &str = "cameraCaptures";

/// Default capture size when the resolution override is enabled
pub const DEFAULT_RESOLUTION: (u32, u32) = (1920, 1080);

/// Depth buffer bits for the off-screen render target
pub const RENDER_TARGET_DEPTH_BITS: u8 = 24;

/// Suffix appended to a base name that collides with an unmanaged file
pub const COLLISION_SUFFIX: &str = "-New";

/// File names of the persisted state
pub mod files {
    /// Full FileRecord mapping, loaded on open and saved on close
    pub const RECORDS_FILE: &str = "capture_records.json";

    /// Prefixed key-value store written on close
    pub const PREFERENCES_FILE: &str = "preferences.json";

    /// User configuration
    pub const CONFIG_FILE: &str = "config.json";
}

/// Key prefixes of the key-value preferences store
pub mod keys {
    /// `<prefix><name>` holds the sequence counter
    pub const FILE_COUNT_PREFIX: &str = "CaptureFileCount";

    /// `<prefix><name>` holds the folder the name was registered in
    pub const FILE_FOLDER_PREFIX: &str = "CaptureFileFolder";

    pub fn file_count(name: &str) -> String {
        format!("{}{}", FILE_COUNT_PREFIX, name)
    }

    pub fn file_folder(name: &str) -> String {
        format!("{}{}", FILE_FOLDER_PREFIX, name)
    }
}

/// JPEG encoding quality presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EncodingQuality {
    /// Low quality (high compression)
    Low,
    /// Medium quality (balanced)
    Medium,
    /// High quality (low compression)
    #[default]
    High,
    /// Maximum quality (minimal compression)
    Maximum,
}

impl EncodingQuality {
    /// Get all preset variants
    pub const ALL: [EncodingQuality; 4] = [
        EncodingQuality::Low,
        EncodingQuality::Medium,
        EncodingQuality::High,
        EncodingQuality::Maximum,
    ];

    /// Get JPEG quality value (0-100)
    pub fn jpeg_quality(&self) -> u8 {
        match self {
            EncodingQuality::Low => 60,
            EncodingQuality::Medium => 80,
            EncodingQuality::High => 92,
            EncodingQuality::Maximum => 98,
        }
    }

    /// Get display name for the preset
    pub fn display_name(&self) -> &'static str {
        match self {
            EncodingQuality::Low => "Low",
            EncodingQuality::Medium => "Medium",
            EncodingQuality::High => "High",
            EncodingQuality::Maximum => "Maximum",
        }
    }
}
