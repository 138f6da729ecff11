// SPDX-License-Identifier: MPL-2.0

//! Capture and persist pipeline
//!
//! ```text
//! folder check → name resolution → off-screen capture → encoding
//!      → counter reserve → write (sync or background)
//! ```
//!
//! Every step before the counter reserve is free of side effects, so an
//! aborted call leaves the store exactly as it found it. Once the counter
//! is reserved the number is consumed, even if the write then fails.

pub mod encoding;
pub mod writer;

pub use encoding::{EncodedImage, ImageEncoder};
pub use writer::{FileWriter, PendingWrite, WriteOutcome};

use crate::backends::camera::{Camera, capture_frame};
use crate::config::{CaptureConfig, ImageFormat, Resolution};
use crate::errors::{CaptureError, CaptureResult};
use crate::naming::{DiskProbe, FileProbe, NameRequest, resolve_name};
use crate::storage::MetadataStore;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What a successful capture produced
#[derive(Debug)]
pub struct SavedCapture {
    /// Logical name the capture was recorded under
    pub name: String,
    /// Counter value used for this capture (pre-increment)
    pub counter: u64,
    pub format: ImageFormat,
    pub resolution: Resolution,
    pub write: WriteOutcome,
}

impl SavedCapture {
    pub fn path(&self) -> &Path {
        self.write.path()
    }
}

/// Orchestrates name resolution, capture, encoding and writing
pub struct CapturePipeline {
    writer: FileWriter,
    probe: Box<dyn FileProbe + Send>,
}

impl CapturePipeline {
    /// Create a pipeline that probes the real filesystem
    pub fn new() -> io::Result<Self> {
        Ok(Self::with_parts(FileWriter::new()?, Box::new(DiskProbe)))
    }

    pub fn with_parts(writer: FileWriter, probe: Box<dyn FileProbe + Send>) -> Self {
        Self { writer, probe }
    }

    /// Capture `camera` and save the image as configured
    ///
    /// The counter is taken from `store` and advanced before the write is
    /// dispatched. The call takes `&mut MetadataStore`, so reserving a
    /// number cannot interleave with another call on the same store.
    pub fn capture_and_save(
        &self,
        config: &CaptureConfig,
        camera: Option<&mut dyn Camera>,
        store: &mut MetadataStore,
    ) -> CaptureResult<SavedCapture> {
        let folder = check_folder(&config.folder_path)?;

        let resolved = resolve_name(
            NameRequest {
                base_name: &config.file_name,
                overwrite: config.overwrite_on_collision,
                folder,
                extension: config.image_format.extension(),
            },
            store.records(),
            store.preferences(),
            self.probe.as_ref(),
        )?;

        let resolution = match camera.as_deref() {
            Some(camera) => config.effective_resolution(camera.viewport()),
            None => config.target_resolution,
        };
        let frame = capture_frame(camera, resolution)?;

        let encoder = ImageEncoder::with_format(config.image_format, config.jpeg_quality);
        let encoded = encoder.encode(&frame.image);
        if encoded.is_empty() {
            return Err(CaptureError::UnsupportedFormat(config.image_format));
        }

        let counter = store.reserve(&resolved.name, &config.folder_path);
        let path = output_path(
            folder,
            &resolved.name,
            counter,
            config.serialize_sequence,
            config.image_format,
        );
        debug!(
            name = %resolved.name,
            counter,
            new_name = resolved.is_new,
            path = %path.display(),
            "Reserved capture path"
        );

        let write = self
            .writer
            .write(&path, encoded.data, config.write_mode)?;

        if config.log_capture {
            info!(path = %path.display(), camera = %frame.camera, "Capture image saved");
        } else {
            debug!(path = %path.display(), camera = %frame.camera, "Capture image saved");
        }

        Ok(SavedCapture {
            name: resolved.name,
            counter,
            format: config.image_format,
            resolution,
            write,
        })
    }
}

/// Output folder must be set and exist
fn check_folder(folder: &str) -> CaptureResult<&Path> {
    if folder.is_empty() {
        return Err(CaptureError::InvalidFolder(String::new()));
    }
    let path = Path::new(folder);
    if !path.is_dir() {
        return Err(CaptureError::InvalidFolder(folder.to_string()));
    }
    Ok(path)
}

/// `<folder>/<name>-<counter>.<ext>` or `<folder>/<name>.<ext>`
pub fn output_path(
    folder: &Path,
    name: &str,
    counter: u64,
    serialize_sequence: bool,
    format: ImageFormat,
) -> PathBuf {
    let file_name = if serialize_sequence {
        format!("{}-{}.{}", name, counter, format.extension())
    } else {
        format!("{}.{}", name, format.extension())
    };
    folder.join(file_name)
}
