// SPDX-License-Identifier: MPL-2.0

//! Prefixed key-value store
//!
//! Mirrors every record as two keys (`CaptureFileCount<name>` and
//! `CaptureFileFolder<name>`) when a session closes. It is a redundant
//! layer: nothing reads counters back from it, but the name resolver
//! treats a counter key here as evidence that a name was used before.

use crate::constants::keys;
use crate::errors::StoreError;
use crate::naming::CounterRegistry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Value stored under a preference key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Int(i64),
    Text(String),
}

/// JSON-backed key-value store
#[derive(Debug, Clone, Default)]
pub struct Preferences {
    path: PathBuf,
    values: BTreeMap<String, PrefValue>,
}

impl Preferences {
    /// Load from `path`, starting empty when it is missing or unreadable
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable preferences");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read preferences");
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.values.get(key) {
            Some(PrefValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(PrefValue::Text(v)) => Some(v),
            _ => None,
        }
    }

    pub fn set_int(&mut self, key: impl Into<String>, value: i64) {
        self.values.insert(key.into(), PrefValue::Int(value));
    }

    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), PrefValue::Text(value.into()));
    }

    /// Write every key to disk
    pub fn save(&self) -> Result<(), StoreError> {
        let write_err = |message: String| StoreError::Write {
            path: self.path.clone(),
            message,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }
        let json = serde_json::to_vec_pretty(&self.values).map_err(|e| write_err(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| write_err(e.to_string()))
    }
}

impl CounterRegistry for Preferences {
    fn has_counter(&self, name: &str) -> bool {
        self.has_key(&keys::file_count(name))
    }
}
