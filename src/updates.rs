//! Update snapshot persistence.
//!
//! A single JSON file holding the last catalog listing seen. Loads are
//! wholesale, saves overwrite the file with the full current listing — no
//! locking, no merging. The first run (no file) records a baseline and
//! downloads nothing; later runs compare against the highest recorded id.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::IssueSummary;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not access update snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("update snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub struct UpdateStore {
    path: PathBuf,
}

impl UpdateStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the previous snapshot; a missing file means "nothing seen yet".
    pub fn load(&self) -> Result<Vec<IssueSummary>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Replace the snapshot with the given listing.
    pub fn save(&self, records: &[IssueSummary]) -> Result<(), StoreError> {
        fs::write(&self.path, serde_json::to_string_pretty(records)?)?;
        Ok(())
    }
}

/// Highest issue id in a snapshot; `None` when empty.
pub fn latest_id(records: &[IssueSummary]) -> Option<u32> {
    records.iter().map(|r| r.id).max()
}

/// Ids in the current listing newer than anything in the snapshot, in
/// listing order. An empty snapshot yields nothing: the first run records
/// a baseline instead of downloading the whole catalog.
pub fn select_new(catalog: &[IssueSummary], known: &[IssueSummary]) -> Vec<u32> {
    let Some(threshold) = latest_id(known) else {
        return Vec::new();
    };
    catalog
        .iter()
        .map(|issue| issue.id)
        .filter(|&id| id > threshold)
        .collect()
}
