// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use camera_capture::constants::DEFAULT_FILE_NAME;
use camera_capture::{CaptureConfig, ImageFormat, Resolution, WriteMode};

#[test]
fn test_config_default() {
    let config = CaptureConfig::default();

    assert_eq!(config.image_format, ImageFormat::Png);
    assert_eq!(config.write_mode, WriteMode::Synchronous);
    assert_eq!(config.file_name, DEFAULT_FILE_NAME);
    assert!(
        config.serialize_sequence,
        "Sequence numbers should be appended by default"
    );
    assert!(
        !config.overwrite_on_collision,
        "Collision probing should be enabled by default"
    );
    assert!(!config.folder_path.is_empty());
}

#[test]
fn test_config_missing_file_is_default() {
    let dir = tempfile::tempdir().unwrap();
    let config = CaptureConfig::load(&dir.path().join("config.json")).unwrap();
    assert_eq!(config, CaptureConfig::default());
}

#[test]
fn test_config_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let mut config = CaptureConfig::default();
    config.file_name = "shot".to_string();
    config.image_format = ImageFormat::Tga;
    config.target_resolution = Resolution::new(800, 600);
    config.override_resolution = true;
    config.save(&path).unwrap();

    assert_eq!(CaptureConfig::load(&path).unwrap(), config);
}

#[test]
fn test_config_partial_file_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "file_name": "partial", "image_format": "Jpeg" }"#).unwrap();

    let config = CaptureConfig::load(&path).unwrap();
    assert_eq!(config.file_name, "partial");
    assert_eq!(config.image_format, ImageFormat::Jpeg);
    assert!(config.serialize_sequence);
}

#[test]
fn test_config_corrupt_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(CaptureConfig::load(&path).is_err());
}
