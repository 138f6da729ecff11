// SPDX-License-Identifier: GPL-3.0-only

//! Output name resolution
//!
//! Decides which logical name a capture is recorded under. Names already
//! tracked by the store are reused as-is. A new name is checked against
//! leftovers of an earlier, untracked run: if some other counter store
//! knows the name *and* `<name>-0.<ext>` sits in the folder, `-New` is
//! appended until that no longer holds. With overwrite enabled the
//! probe is skipped.
//!
//! Resolution has no side effects. The caller registers the name when
//! the capture actually succeeds.

use crate::constants::COLLISION_SUFFIX;
use crate::errors::{CaptureError, CaptureResult};
use crate::storage::RecordMap;
use std::path::Path;
use tracing::{debug, info};

/// Answers whether a file exists
pub trait FileProbe {
    fn exists(&self, path: &Path) -> bool;
}

/// The real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskProbe;

impl FileProbe for DiskProbe {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// A counter store other than the session's own record map
pub trait CounterRegistry {
    fn has_counter(&self, name: &str) -> bool;
}

/// Inputs of a name resolution
#[derive(Debug, Clone, Copy)]
pub struct NameRequest<'a> {
    pub base_name: &'a str,
    pub overwrite: bool,
    pub folder: &'a Path,
    /// Extension probed for `<name>-0.<ext>`
    pub extension: &'a str,
}

/// Outcome of a name resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub name: String,
    /// Not yet tracked; will be registered with counter 0
    pub is_new: bool,
}

/// Pick the logical name for a capture
pub fn resolve_name(
    request: NameRequest<'_>,
    records: &RecordMap,
    legacy: &dyn CounterRegistry,
    probe: &dyn FileProbe,
) -> CaptureResult<ResolvedName> {
    validate_file_name(request.base_name)?;

    if records.contains_key(request.base_name) {
        return Ok(ResolvedName {
            name: request.base_name.to_string(),
            is_new: false,
        });
    }

    if request.overwrite {
        debug!(name = request.base_name, "Overwrite enabled, skipping collision probe");
        return Ok(ResolvedName {
            name: request.base_name.to_string(),
            is_new: true,
        });
    }

    let mut name = request.base_name.to_string();
    while collides(&name, &request, legacy, probe) {
        name.push_str(COLLISION_SUFFIX);
    }

    if name != request.base_name {
        info!(
            requested = request.base_name,
            resolved = %name,
            "File name collides with an earlier run"
        );
    }

    Ok(ResolvedName { name, is_new: true })
}

fn collides(
    name: &str,
    request: &NameRequest<'_>,
    legacy: &dyn CounterRegistry,
    probe: &dyn FileProbe,
) -> bool {
    legacy.has_counter(name)
        && probe.exists(&request.folder.join(format!("{}-0.{}", name, request.extension)))
}

/// Reject names that are empty or would leave the output folder
pub fn validate_file_name(name: &str) -> CaptureResult<()> {
    let is_plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0']);
    if is_plain {
        Ok(())
    } else {
        Err(CaptureError::InvalidFileName(name.to_string()))
    }
}
