// SPDX-License-Identifier: GPL-3.0-only

//! Capture session
//!
//! Owns everything a capture needs: the configuration, the camera, the
//! metadata store and the pipeline. `open` loads the store and `close`
//! flushes it, so the session is the unit of counter durability.
//!
//! To capture from several threads, put the session behind a `Mutex`;
//! that also serializes counter reservation per store.

use crate::backends::camera::Camera;
use crate::config::CaptureConfig;
use crate::constants::DEFAULT_FILE_NAME;
use crate::errors::{CaptureResult, StoreError};
use crate::pipelines::capture::{CapturePipeline, SavedCapture};
use crate::storage::{self, LifecyclePolicy, MetadataStore, StorePaths};
use std::io;
use tracing::{info, warn};

pub struct CaptureSession {
    config: CaptureConfig,
    camera: Option<Box<dyn Camera>>,
    store: MetadataStore,
    pipeline: CapturePipeline,
}

impl CaptureSession {
    /// Load persisted counters and start a session
    pub fn open(
        config: CaptureConfig,
        camera: Option<Box<dyn Camera>>,
        paths: &StorePaths,
        policy: LifecyclePolicy,
    ) -> io::Result<Self> {
        Ok(Self::with_pipeline(
            config,
            camera,
            MetadataStore::open(paths, policy),
            CapturePipeline::new()?,
        ))
    }

    /// Assemble a session from prepared parts
    pub fn with_pipeline(
        config: CaptureConfig,
        camera: Option<Box<dyn Camera>>,
        store: MetadataStore,
        pipeline: CapturePipeline,
    ) -> Self {
        Self {
            config,
            camera,
            store,
            pipeline,
        }
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut CaptureConfig {
        &mut self.config
    }

    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    pub fn has_camera(&self) -> bool {
        self.camera.is_some()
    }

    pub fn set_camera(&mut self, camera: Option<Box<dyn Camera>>) {
        self.camera = camera;
    }

    /// Capture the bound camera and save it per the current config
    ///
    /// Failures are logged as warnings and returned; the session stays
    /// usable. On success the config's file name is updated to the name
    /// the capture was actually recorded under.
    pub fn capture_and_save(&mut self) -> CaptureResult<SavedCapture> {
        let camera = self.camera.as_deref_mut().map(|c| c as &mut dyn Camera);
        match self
            .pipeline
            .capture_and_save(&self.config, camera, &mut self.store)
        {
            Ok(saved) => {
                if saved.name != self.config.file_name {
                    self.config.file_name = saved.name.clone();
                }
                Ok(saved)
            }
            Err(e) => {
                warn!(error = %e, "Capture aborted");
                Err(e)
            }
        }
    }

    /// Restore default settings and merge counters from disk
    ///
    /// Resolution, write mode, JPEG quality and capture logging are kept.
    /// Counters are never lowered, so numbers handed out earlier in the
    /// session are not reused.
    pub fn reset(&mut self, main_camera: Option<Box<dyn Camera>>) {
        self.camera = main_camera;
        self.config.folder_path = storage::default_output_dir()
            .to_string_lossy()
            .into_owned();
        self.config.image_format = Default::default();
        self.config.overwrite_on_collision = false;
        self.config.serialize_sequence = true;
        self.config.file_name = DEFAULT_FILE_NAME.to_string();
        self.store.reload();
        info!("Capture settings reset");
    }

    /// Host disabled the capture component
    pub fn suspend(&self) -> Result<(), StoreError> {
        self.store.suspend()
    }

    /// Host re-enabled the capture component
    pub fn resume(&mut self) {
        self.store.resume();
    }

    /// Flush counters and end the session
    ///
    /// Background writes still in flight are not awaited.
    pub fn close(self) -> Result<(), StoreError> {
        self.store.close()
    }
}
