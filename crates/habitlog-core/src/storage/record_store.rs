//! File-backed boolean records for the reminder scheduler.
//!
//! Stored as a flat TOML table at `~/.config/habitlog/schedule.toml`:
//!
//! ```toml
//! alarm_scheduled = true
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, SchedulerError};
use crate::reminder::RecordStore;
use tracing::warn;

const RECORD_FILE: &str = "schedule.toml";

/// [`RecordStore`] persisted to a TOML file; survives process restarts.
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    path: PathBuf,
}

impl FileRecordStore {
    /// Store at the default location inside the data directory.
    pub fn open_default() -> Result<Self, ConfigError> {
        Ok(Self::at(data_dir()?.join(RECORD_FILE)))
    }

    /// Store backed by `path`. The file is created on first write.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_raw(&self, key: &str) -> Result<Option<String>, SchedulerError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(record_err(key, e)),
        }
    }

    fn read_all(&self, key: &str) -> Result<BTreeMap<String, bool>, SchedulerError> {
        match self.read_raw(key)? {
            Some(content) => toml::from_str(&content).map_err(|e| record_err(key, e)),
            None => Ok(BTreeMap::new()),
        }
    }
}

fn record_err(key: &str, e: impl std::fmt::Display) -> SchedulerError {
    SchedulerError::Record {
        key: key.to_string(),
        message: e.to_string(),
    }
}

impl RecordStore for FileRecordStore {
    fn get(&self, key: &str) -> Result<Option<bool>, SchedulerError> {
        Ok(self.read_all(key)?.get(key).copied())
    }

    /// Unparseable contents are replaced rather than reported, so a damaged
    /// file is repaired by the next write.
    fn set(&self, key: &str, value: bool) -> Result<(), SchedulerError> {
        let mut records: BTreeMap<String, bool> = match self.read_raw(key)? {
            Some(content) => toml::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %self.path.display(), error = %e, "discarding unreadable schedule records");
                BTreeMap::new()
            }),
            None => BTreeMap::new(),
        };
        records.insert(key.to_string(), value);

        let content = toml::to_string(&records).map_err(|e| record_err(key, e))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| record_err(key, e))?;
        }
        let tmp = self.path.with_extension("toml.tmp");
        std::fs::write(&tmp, content).map_err(|e| record_err(key, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| record_err(key, e))
    }
}
