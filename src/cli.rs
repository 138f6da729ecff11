// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! This module provides command-line functionality for:
//! - Capturing images from a test pattern or a still image
//! - Listing stored sequence counters
//! - Restoring the default configuration

use camera_capture::backends::camera::{Camera, ImageFileCamera, TestPatternCamera};
use camera_capture::constants::EncodingQuality;
use camera_capture::pipelines::capture::WriteOutcome;
use camera_capture::storage::{self, MetadataStore};
use camera_capture::{
    CaptureConfig, CaptureSession, ImageFormat, LifecyclePolicy, Resolution, StorePaths, WriteMode,
};
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Options of the `capture` command; unset options keep the config value
#[derive(Args, Debug)]
pub struct CaptureArgs {
    /// Base file name
    #[arg(short, long)]
    name: Option<String>,

    /// Output folder (must exist)
    #[arg(short, long)]
    folder: Option<PathBuf>,

    /// Image format: png, jpg, tga or exr
    #[arg(long, value_parser = parse_format)]
    format: Option<ImageFormat>,

    /// Capture size as WIDTHxHEIGHT, overriding the camera viewport
    #[arg(short, long, value_parser = Resolution::parse)]
    resolution: Option<Resolution>,

    /// JPEG quality: low, medium, high, maximum
    #[arg(long, value_parser = parse_quality)]
    quality: Option<EncodingQuality>,

    /// Save to `<name>.<ext>` instead of `<name>-<n>.<ext>`
    #[arg(long)]
    no_serial: bool,

    /// Skip the collision check for new names
    #[arg(long)]
    overwrite: bool,

    /// Write files in the background
    #[arg(long)]
    non_blocking: bool,

    /// Capture this image instead of the test pattern
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Number of captures
    #[arg(short, long, default_value = "1")]
    count: u32,

    /// Delay between captures in milliseconds
    #[arg(long, default_value = "0")]
    interval_ms: u64,
}

impl CaptureArgs {
    fn apply(&self, config: &mut CaptureConfig) {
        if let Some(name) = &self.name {
            config.file_name = name.clone();
        }
        if let Some(folder) = &self.folder {
            config.folder_path = folder.to_string_lossy().into_owned();
        }
        if let Some(format) = self.format {
            config.image_format = format;
        }
        if let Some(resolution) = self.resolution {
            config.target_resolution = resolution;
            config.override_resolution = true;
        }
        if let Some(quality) = self.quality {
            config.jpeg_quality = quality;
        }
        if self.no_serial {
            config.serialize_sequence = false;
        }
        if self.overwrite {
            config.overwrite_on_collision = true;
        }
        if self.non_blocking {
            config.write_mode = WriteMode::NonBlocking;
        }
    }
}

fn parse_format(s: &str) -> Result<ImageFormat, String> {
    ImageFormat::from_extension(s).ok_or_else(|| {
        let available: Vec<&str> = ImageFormat::ALL.iter().map(|f| f.extension()).collect();
        format!(
            "Unknown format '{}'. Available formats: {}",
            s,
            available.join(", ")
        )
    })
}

fn parse_quality(s: &str) -> Result<EncodingQuality, String> {
    EncodingQuality::ALL
        .into_iter()
        .find(|q| q.display_name().eq_ignore_ascii_case(s))
        .ok_or_else(|| format!("Unknown quality '{}'. Use low, medium, high or maximum", s))
}

/// Run one or more captures and flush the counters
pub fn capture(
    config_path: &Path,
    data_dir: &Path,
    args: CaptureArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CaptureConfig::load(config_path)?;
    args.apply(&mut config);

    // Only the default folder is created on demand; a user folder must exist
    let default_dir = storage::default_output_dir();
    if args.folder.is_none() && Path::new(&config.folder_path) == default_dir {
        std::fs::create_dir_all(&default_dir)?;
    }

    let camera: Box<dyn Camera> = match &args.source {
        Some(path) => Box::new(ImageFileCamera::open(path)?),
        None => Box::new(TestPatternCamera::new(config.target_resolution)),
    };
    println!("Using camera: {}", camera.name());

    let mut session = CaptureSession::open(
        config,
        Some(camera),
        &StorePaths::in_dir(data_dir),
        LifecyclePolicy::Standalone,
    )?;

    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_clone = stop_flag.clone();
    ctrlc::set_handler(move || {
        stop_flag_clone.store(true, Ordering::SeqCst);
    })?;

    let mut pending = Vec::new();
    let mut failure = None;
    for index in 0..args.count {
        if stop_flag.load(Ordering::SeqCst) {
            println!("Stopping early...");
            break;
        }

        match session.capture_and_save() {
            Ok(saved) => {
                println!("Saved: {}", saved.path().display());
                if let WriteOutcome::Pending(write) = saved.write {
                    pending.push(write);
                }
            }
            Err(e) => {
                failure = Some(e);
                break;
            }
        }

        if index + 1 < args.count && args.interval_ms > 0 {
            std::thread::sleep(Duration::from_millis(args.interval_ms));
        }
    }

    // The process exits right after, so let background writes land first
    for write in pending {
        if let Err(e) = write.wait() {
            eprintln!("Background write failed: {}", e);
        }
    }

    session.close()?;

    match failure {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

/// Print every stored FileRecord
pub fn list_records(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let store = MetadataStore::open(&StorePaths::in_dir(data_dir), LifecyclePolicy::Standalone);

    if store.records().is_empty() {
        println!("No capture records.");
        return Ok(());
    }

    println!("Capture records:");
    println!();
    for (name, record) in store.records() {
        let last = record
            .last_capture
            .map(|t| {
                t.with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            })
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<24} next #{:<6} last {}  {}",
            name, record.file_count, last, record.folder_path
        );
    }

    Ok(())
}

/// Overwrite the config file with defaults
pub fn reset_config(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = CaptureConfig::default();
    config.save(config_path)?;
    println!("Configuration reset: {}", config_path.display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
