//! Persisted weight ID counter.
//!
//! IDs are `w` plus the counter zero-padded to five digits. The counter only
//! moves forward, so an ID freed by a delete is never handed out again.

use serde::{Deserialize, Serialize};
use std::path::Path;

use tracker_core::{StoreError, WeightEntry};

use crate::store::atomic_write;

pub(crate) const SEQUENCE_FILE: &str = "sequence.toml";

/// Largest counter that still fits the five-digit ID format.
pub(crate) const MAX_WEIGHT_COUNTER: u32 = 99_999;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Sequence {
    /// Highest weight counter handed out so far.
    #[serde(default)]
    pub weight: u32,
}

impl Sequence {
    /// Load the counter, seeding it from existing entries when the file is absent.
    pub fn load_or_seed(path: &Path, existing: &[WeightEntry]) -> Result<Self, StoreError> {
        if !path.exists() {
            let seeded = Self {
                weight: seed_from(existing),
            };
            tracing::debug!(seed = seeded.weight, "seeded weight sequence from existing entries");
            return Ok(seeded);
        }

        let content = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut sequence: Self = toml::from_str(&content).map_err(|e| StoreError::Corrupt {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        // A hand-edited data file may hold higher IDs than the counter knows.
        sequence.weight = sequence.weight.max(seed_from(existing));
        Ok(sequence)
    }

    /// Advance the counter and return the new ID.
    ///
    /// Fails once every five-digit ID has been handed out.
    pub fn next_weight_id(&mut self) -> Result<String, StoreError> {
        let next = self
            .weight
            .checked_add(1)
            .filter(|&next| next <= MAX_WEIGHT_COUNTER)
            .ok_or_else(|| StoreError::IdsExhausted {
                last: format_weight_id(self.weight),
            })?;
        self.weight = next;
        Ok(format_weight_id(next))
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let content = toml::to_string(self).map_err(|e| StoreError::Corrupt {
            path: path.to_path_buf(),
            message: format!("failed to encode sequence: {e}"),
        })?;
        atomic_write(path, content.as_bytes())
    }
}

pub(crate) fn format_weight_id(counter: u32) -> String {
    format!("w{counter:05}")
}

fn parse_weight_id(id: &str) -> Option<u32> {
    id.strip_prefix('w')?.parse().ok()
}

fn seed_from(existing: &[WeightEntry]) -> u32 {
    let highest = existing
        .iter()
        .filter_map(|entry| parse_weight_id(&entry.id))
        .max()
        .unwrap_or(0);
    let count = u32::try_from(existing.len()).unwrap_or(u32::MAX);
    highest.max(count)
}
