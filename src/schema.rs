//! Required-Column Schema - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! The classifier was trained on exactly these spectral intensity bins, in
//! exactly this order. Rules (NEVER break these):
//! 1. Add column → increment SCHEMA_VERSION
//! 2. Change order → increment SCHEMA_VERSION
//! 3. Remove column → increment SCHEMA_VERSION

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

/// Current column schema version
/// MUST be incremented when the layout changes
pub const SCHEMA_VERSION: u8 = 1;

/// Required feature columns, in the exact order the classifier consumes them.
/// This is the SINGLE SOURCE OF TRUTH for the input layout.
pub const ALL_COLUMNS: &[&str] = &[
    "spectrum_bin_1",
    "spectrum_bin_2",
    "spectrum_bin_3",
    "spectrum_bin_4",
    "spectrum_bin_5",
    "spectrum_bin_6",
    "spectrum_bin_7",
    "spectrum_bin_8",
    "spectrum_bin_9",
    "spectrum_bin_10",
    "spectrum_bin_11",
    "spectrum_bin_12",
    "spectrum_bin_13",
    "spectrum_bin_14",
    "spectrum_bin_15",
    "spectrum_bin_16",
    "spectrum_bin_17",
    "spectrum_bin_18",
];

/// Total number of required columns
/// IMPORTANT: Must match ALL_COLUMNS.len()!
pub const COLUMN_COUNT: usize = 18;

/// Compute CRC32 hash of the column layout.
/// Used to detect schema mismatches between service and model artifact.
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[SCHEMA_VERSION]);

    for name in ALL_COLUMNS {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Get layout hash (inputs are const, so this is stable per build)
pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

/// Return every required column missing from `columns`, in schema order.
/// An empty result means the record passes schema validation.
pub fn missing_columns<'a, I>(columns: I) -> Vec<&'static str>
where
    I: IntoIterator<Item = &'a str>,
{
    let present: std::collections::HashSet<&str> = columns.into_iter().collect();
    ALL_COLUMNS
        .iter()
        .filter(|name| !present.contains(**name))
        .copied()
        .collect()
}

/// Complete schema information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaInfo {
    pub version: u8,
    pub hash: u32,
    pub column_count: usize,
    pub column_names: Vec<String>,
}

impl SchemaInfo {
    pub fn current() -> Self {
        Self {
            version: SCHEMA_VERSION,
            hash: layout_hash(),
            column_count: COLUMN_COUNT,
            column_names: ALL_COLUMNS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for SchemaInfo {
    fn default() -> Self {
        Self::current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_count_matches_layout() {
        assert_eq!(ALL_COLUMNS.len(), COLUMN_COUNT);
    }

    #[test]
    fn layout_has_no_duplicates() {
        let unique: std::collections::HashSet<_> = ALL_COLUMNS.iter().collect();
        assert_eq!(unique.len(), ALL_COLUMNS.len());
    }

    #[test]
    fn missing_columns_full_set_passes() {
        let missing = missing_columns(ALL_COLUMNS.iter().copied());
        assert!(missing.is_empty());
    }

    #[test]
    fn missing_columns_reports_in_schema_order() {
        let partial: Vec<&str> = ALL_COLUMNS
            .iter()
            .copied()
            .filter(|c| *c != "spectrum_bin_3" && *c != "spectrum_bin_11")
            .collect();

        let missing = missing_columns(partial);
        assert_eq!(missing, vec!["spectrum_bin_3", "spectrum_bin_11"]);
    }

    #[test]
    fn extra_columns_are_tolerated() {
        let mut columns: Vec<&str> = ALL_COLUMNS.to_vec();
        columns.push("isolate.species");
        columns.push("foo");
        assert!(missing_columns(columns).is_empty());
    }

    #[test]
    fn layout_hash_is_stable() {
        assert_eq!(compute_layout_hash(), compute_layout_hash());
    }
}
