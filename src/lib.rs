// SPDX-License-Identifier: MPL-2.0

//! Camera capture - render a camera off-screen and save numbered images
//!
//! Captures land in a folder as `<name>-<n>.<ext>`, where `n` is a
//! per-name counter that survives restarts, so repeated captures never
//! overwrite each other.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`storage`]: Durable per-name counters (metadata store)
//! - [`naming`]: Output name resolution and collision probing
//! - [`backends`]: Camera abstraction and off-screen capture
//! - [`pipelines`]: Encoding, writing and the capture orchestrator
//! - [`session`]: Lifecycle wrapper tying config, camera and store together
//! - [`config`]: Capture configuration
//!
//! # Example
//!
//! ```no_run
//! use camera_capture::backends::camera::TestPatternCamera;
//! use camera_capture::{CaptureConfig, CaptureSession, LifecyclePolicy, Resolution, StorePaths};
//!
//! let camera = TestPatternCamera::new(Resolution::new(640, 480));
//! let mut session = CaptureSession::open(
//!     CaptureConfig::default(),
//!     Some(Box::new(camera)),
//!     &StorePaths::default(),
//!     LifecyclePolicy::Standalone,
//! )?;
//! let saved = session.capture_and_save()?;
//! println!("saved {}", saved.path().display());
//! session.close()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod naming;
pub mod pipelines;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use config::{CaptureConfig, ImageFormat, Resolution, WriteMode};
pub use errors::{CaptureError, CaptureResult, StoreError};
pub use pipelines::capture::{CapturePipeline, SavedCapture};
pub use session::CaptureSession;
pub use storage::{FileRecord, LifecyclePolicy, MetadataStore, StorePaths};
