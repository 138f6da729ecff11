// SPDX-License-Identifier: MPL-2.0

//! Durable per-name sequence counters
//!
//! ```text
//! open ──► load records ──► reserve / reserve / ... ──► close ──► save records
//!                                                            └──► mirror to preferences
//! ```
//!
//! Counters live in memory for the whole session. Nothing is flushed
//! incrementally, so a crash loses progress made since the last flush.
//! Under [`LifecyclePolicy::HostManaged`] the host also flushes on
//! `suspend` and reloads on `resume`.

pub mod preferences;
pub mod records;

pub use preferences::{PrefValue, Preferences};
pub use records::LocalRecordFile;

use crate::constants::{APP_DIR_NAME, files, keys};
use crate::errors::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Sequence state for one logical name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Number of saves so far; the next numbered file uses this value
    pub file_count: u64,
    /// Folder the name was first registered in
    pub folder_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_capture: Option<DateTime<Utc>>,
}

impl FileRecord {
    pub fn new(folder_path: impl Into<String>) -> Self {
        Self {
            file_count: 0,
            folder_path: folder_path.into(),
            last_capture: None,
        }
    }
}

/// Logical name to record
pub type RecordMap = BTreeMap<String, FileRecord>;

/// When the store touches the disk besides open and close
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LifecyclePolicy {
    /// Load on open, save on close
    #[default]
    Standalone,
    /// Additionally save on suspend and reload on resume
    HostManaged,
}

/// Locations of the persisted state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub records: PathBuf,
    pub preferences: PathBuf,
}

impl StorePaths {
    /// Both files inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            records: dir.join(files::RECORDS_FILE),
            preferences: dir.join(files::PREFERENCES_FILE),
        }
    }
}

impl Default for StorePaths {
    fn default() -> Self {
        Self::in_dir(&default_data_dir())
    }
}

/// In-memory counters backed by a record file and a preferences mirror
#[derive(Debug)]
pub struct MetadataStore {
    policy: LifecyclePolicy,
    file: LocalRecordFile,
    preferences: Preferences,
    records: RecordMap,
}

impl MetadataStore {
    /// Load persisted state
    ///
    /// Never fails: a missing file is an empty store and an unreadable
    /// one is logged and replaced by an empty store on the next flush.
    pub fn open(paths: &StorePaths, policy: LifecyclePolicy) -> Self {
        let file = LocalRecordFile::new(&paths.records);
        let preferences = Preferences::load(&paths.preferences);
        let records = load_or_empty(&file);
        info!(
            path = %file.path().display(),
            names = records.len(),
            ?policy,
            "Metadata store opened"
        );
        Self {
            policy,
            file,
            preferences,
            records,
        }
    }

    pub fn records(&self) -> &RecordMap {
        &self.records
    }

    pub fn get(&self, name: &str) -> Option<&FileRecord> {
        self.records.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Current counter for `name`, if tracked
    pub fn counter(&self, name: &str) -> Option<u64> {
        self.records.get(name).map(|r| r.file_count)
    }

    /// Legacy counter keys, probed by the name resolver
    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Take the next sequence number for `name`
    ///
    /// Registers the name with counter 0 in `folder` when it is not yet
    /// tracked, then returns the pre-increment counter and advances it.
    /// Taking `&mut self` makes read-and-increment a single step; callers
    /// sharing a store across threads must put it behind a lock.
    pub fn reserve(&mut self, name: &str, folder: &str) -> u64 {
        let record = self.records.entry(name.to_string()).or_insert_with(|| {
            debug!(name, folder, "Registering new file name");
            FileRecord::new(folder)
        });
        let counter = record.file_count;
        record.file_count += 1;
        record.last_capture = Some(Utc::now());
        counter
    }

    /// Merge what is on disk into the in-memory map
    ///
    /// Counters never move backwards: for a name known on both sides the
    /// higher `file_count` wins, so increments not yet flushed survive.
    pub fn reload(&mut self) {
        for (name, disk) in load_or_empty(&self.file) {
            match self.records.get_mut(&name) {
                Some(current) if current.file_count >= disk.file_count => {}
                Some(current) => *current = disk,
                None => {
                    self.records.insert(name, disk);
                }
            }
        }
        self.preferences = Preferences::load(self.preferences.path().to_path_buf());
    }

    /// Write the record file
    pub fn flush(&self) -> Result<(), StoreError> {
        self.file.save(&self.records)
    }

    /// Host is disabling the capture component
    pub fn suspend(&self) -> Result<(), StoreError> {
        match self.policy {
            LifecyclePolicy::HostManaged => self.flush(),
            LifecyclePolicy::Standalone => Ok(()),
        }
    }

    /// Host is re-enabling the capture component
    pub fn resume(&mut self) {
        if self.policy == LifecyclePolicy::HostManaged {
            self.reload();
        }
    }

    /// Flush the record file, then mirror every record into preferences
    ///
    /// The preferences mirror is best-effort: its failure is logged and
    /// does not fail the close.
    pub fn close(mut self) -> Result<(), StoreError> {
        let flushed = self.flush();

        if !self.records.is_empty() {
            for (name, record) in &self.records {
                let count = i64::try_from(record.file_count).unwrap_or(i64::MAX);
                self.preferences.set_int(keys::file_count(name), count);
                self.preferences
                    .set_string(keys::file_folder(name), record.folder_path.clone());
            }
            if let Err(e) = self.preferences.save() {
                warn!(error = %e, "Failed to mirror counters to preferences");
            }
        }

        info!(names = self.records.len(), "Metadata store closed");
        flushed
    }
}

fn load_or_empty(file: &LocalRecordFile) -> RecordMap {
    file.load().unwrap_or_else(|e| {
        warn!(error = %e, "Starting with empty capture records");
        RecordMap::new()
    })
}

/// Per-installation directory for persisted state
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join(APP_DIR_NAME)
}

/// Folder captures go to after a reset
pub fn default_output_dir() -> PathBuf {
    default_data_dir()
}
