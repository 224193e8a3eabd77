//! JSON file persistence of the candidate and selection collections

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::itinerary::Itinerary;
use crate::point::Point;

/// Errors that can occur when reading or writing the state file
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access state file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse state file {path}: {source}")]
    JsonError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// On-disk layout of the state file
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    candidates: Vec<Point>,
    #[serde(default)]
    selection: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hidden: Option<Vec<Point>>,
}

/// State file at a fixed path
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted itinerary. A missing file is an empty itinerary.
    pub fn load(&self) -> Result<Itinerary, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no state file, starting empty");
                return Ok(Itinerary::new());
            }
            Err(source) => {
                return Err(StoreError::IoError {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if content.trim().is_empty() {
            return Ok(Itinerary::new());
        }
        let snapshot: Snapshot =
            serde_json::from_str(&content).map_err(|source| StoreError::JsonError {
                path: self.path.clone(),
                source,
            })?;
        let itinerary = Itinerary::from_parts(snapshot.candidates, snapshot.selection);
        Ok(match snapshot.hidden {
            Some(hidden) => itinerary.with_hidden(hidden),
            None => itinerary,
        })
    }

    /// Write the itinerary. Nothing is written while both collections are
    /// empty and no candidates are hidden; returns whether the file was written.
    pub fn save(&self, itinerary: &Itinerary) -> Result<bool, StoreError> {
        if itinerary.is_empty() && !itinerary.is_hidden() {
            debug!("both collections empty, skipping save");
            return Ok(false);
        }
        let snapshot = Snapshot {
            candidates: itinerary.candidates().to_vec(),
            selection: itinerary.selection().to_vec(),
            hidden: itinerary.hidden().map(<[Point]>::to_vec),
        };
        let json =
            serde_json::to_string_pretty(&snapshot).map_err(|source| StoreError::JsonError {
                path: self.path.clone(),
                source,
            })?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::IoError {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, json).map_err(|source| StoreError::IoError {
            path: self.path.clone(),
            source,
        })?;
        debug!(
            path = %self.path.display(),
            candidates = itinerary.candidates().len(),
            selection = itinerary.selection().len(),
            "state saved"
        );
        Ok(true)
    }

    /// Delete the state file. Returns whether a file was removed.
    pub fn remove(&self) -> Result<bool, StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::IoError {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_fields_default() {
        let snapshot: Snapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.candidates.is_empty());
        assert!(snapshot.selection.is_empty());
    }

    #[test]
    fn test_snapshot_reads_points() {
        let json = r#"{
            "selection": [{"id": "a", "name": "Uji Bridge", "position": {"lat": 34.89, "lon": 135.8}}]
        }"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.selection.len(), 1);
        assert_eq!(snapshot.selection[0].name(), "Uji Bridge");
    }
}
