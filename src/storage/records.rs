// SPDX-License-Identifier: MPL-2.0

//! Full-mapping record file
//!
//! The whole `name -> FileRecord` map is stored as one JSON object. The
//! layout is unversioned: renaming or retyping a field is a breaking
//! change for every existing installation.

use super::RecordMap;
use crate::errors::StoreError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// JSON file holding every FileRecord
#[derive(Debug, Clone)]
pub struct LocalRecordFile {
    path: PathBuf,
}

impl LocalRecordFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all persisted records
    ///
    /// A missing file is an empty mapping, never an error.
    pub fn load(&self) -> Result<RecordMap, StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No record file yet");
            return Ok(RecordMap::new());
        }

        let bytes = std::fs::read(&self.path).map_err(|e| StoreError::Read {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(RecordMap::new());
        }

        let records: RecordMap =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::Parse {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        debug!(path = %self.path.display(), count = records.len(), "Loaded records");
        Ok(records)
    }

    /// Overwrite the file with `records`
    ///
    /// The parent directory is created if needed. The payload goes to a
    /// sibling temp file first and is renamed over the old one, so an
    /// interrupted save leaves the previous mapping intact.
    pub fn save(&self, records: &RecordMap) -> Result<(), StoreError> {
        let write_err = |message: String| StoreError::Write {
            path: self.path.clone(),
            message,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }

        let json = serde_json::to_vec_pretty(records).map_err(|e| write_err(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| write_err(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| write_err(e.to_string()))?;

        debug!(path = %self.path.display(), count = records.len(), "Saved records");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FileRecord;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = LocalRecordFile::new(dir.path().join("records.json"));
        assert!(file.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_load_save_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let file = LocalRecordFile::new(dir.path().join("nested/records.json"));

        let mut records = RecordMap::new();
        let mut shot = FileRecord::new("/tmp/out");
        shot.file_count = 3;
        records.insert("shot".to_string(), shot);
        records.insert("other".to_string(), FileRecord::new("/tmp/else"));

        file.save(&records).unwrap();
        let first = file.load().unwrap();
        assert_eq!(first, records);

        file.save(&first).unwrap();
        assert_eq!(file.load().unwrap(), first);
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = LocalRecordFile::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }

    #[test]
    fn test_record_without_timestamp_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(
            &path,
            r#"{ "shot": { "file_count": 7, "folder_path": "/data" } }"#,
        )
        .unwrap();
        let records = LocalRecordFile::new(&path).load().unwrap();
        assert_eq!(records["shot"].file_count, 7);
        assert_eq!(records["shot"].last_capture, None);
    }
}
