// SPDX-License-Identifier: GPL-3.0-only

//! Payload persistence
//!
//! [`WriteMode::Synchronous`] writes and syncs on the caller's thread.
//! [`WriteMode::NonBlocking`] hands the payload to a blocking task and
//! returns at once. Failures of a non-blocking write are only logged;
//! the caller finds out solely through [`PendingWrite::wait`], if it
//! chooses to wait at all.
//!
//! The writer never creates directories. A missing folder surfaces as an
//! I/O error from the write itself.

use crate::config::WriteMode;
use crate::errors::CaptureResult;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::runtime::{Handle, Runtime};
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Result of handing a payload to the writer
#[derive(Debug)]
pub enum WriteOutcome {
    /// Payload is on disk
    Written(PathBuf),
    /// Payload is being written in the background
    Pending(PendingWrite),
}

impl WriteOutcome {
    pub fn path(&self) -> &Path {
        match self {
            WriteOutcome::Written(path) => path,
            WriteOutcome::Pending(pending) => pending.path(),
        }
    }

    /// Block until the payload is on disk
    pub fn wait(self) -> io::Result<PathBuf> {
        match self {
            WriteOutcome::Written(path) => Ok(path),
            WriteOutcome::Pending(pending) => {
                let path = pending.path.clone();
                pending.wait()?;
                Ok(path)
            }
        }
    }
}

/// In-flight non-blocking write
#[derive(Debug)]
pub struct PendingWrite {
    path: PathBuf,
    handle: JoinHandle<io::Result<()>>,
}

impl PendingWrite {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block the current thread until the write task ends
    ///
    /// Must not be called from inside an async task.
    pub fn wait(self) -> io::Result<()> {
        match pollster::block_on(self.handle) {
            Ok(result) => result,
            Err(e) => Err(io::Error::other(format!("Write task error: {}", e))),
        }
    }
}

/// Writes payloads synchronously or on a tokio blocking thread
#[derive(Debug)]
pub struct FileWriter {
    /// Set when no ambient runtime was available at construction
    owned: Option<Runtime>,
    handle: Handle,
}

impl FileWriter {
    /// Use the current tokio runtime, or start a small private one
    pub fn new() -> io::Result<Self> {
        if let Ok(handle) = Handle::try_current() {
            return Ok(Self::with_handle(handle));
        }

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(4)
            .thread_name("capture-writer")
            .enable_all()
            .build()?;
        let handle = runtime.handle().clone();
        Ok(Self {
            owned: Some(runtime),
            handle,
        })
    }

    /// Schedule background writes on an existing runtime
    pub fn with_handle(handle: Handle) -> Self {
        Self {
            owned: None,
            handle,
        }
    }

    /// Persist `payload` at `path`
    ///
    /// Only synchronous writes can fail here.
    pub fn write(
        &self,
        path: &Path,
        payload: Vec<u8>,
        mode: WriteMode,
    ) -> CaptureResult<WriteOutcome> {
        match mode {
            WriteMode::Synchronous => {
                write_synced(path, &payload).inspect_err(|e| {
                    error!(path = %path.display(), error = %e, "Failed to write capture");
                })?;
                debug!(path = %path.display(), size = payload.len(), "Capture written");
                Ok(WriteOutcome::Written(path.to_path_buf()))
            }
            WriteMode::NonBlocking => {
                let task_path = path.to_path_buf();
                let handle = self.handle.spawn_blocking(move || {
                    let result = write_synced(&task_path, &payload);
                    match &result {
                        Ok(()) => debug!(
                            path = %task_path.display(),
                            size = payload.len(),
                            "Background capture write finished"
                        ),
                        Err(e) => error!(
                            path = %task_path.display(),
                            error = %e,
                            "Background capture write failed"
                        ),
                    }
                    result
                });
                Ok(WriteOutcome::Pending(PendingWrite {
                    path: path.to_path_buf(),
                    handle,
                }))
            }
        }
    }
}

impl Drop for FileWriter {
    fn drop(&mut self) {
        // In-flight writes are not awaited
        if let Some(runtime) = self.owned.take() {
            runtime.shutdown_background();
        }
    }
}

fn write_synced(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}
