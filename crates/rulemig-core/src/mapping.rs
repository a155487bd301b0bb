use std::path::Path;

use crate::error::{MigrateError, Result};

/// One ordered rename: every occurrence of `old` becomes `new`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameEntry {
    pub old: String,
    pub new: String,
}

impl RenameEntry {
    /// Entries with an empty replacement are kept for ordering but never
    /// applied: the old token stays as-is, it is not deleted.
    pub fn is_inert(&self) -> bool {
        self.new.is_empty()
    }
}

/// Ordered rename mapping loaded from a headerless two-column CSV.
///
/// Order is load-bearing: rewriting applies entries as a sequence of
/// substitutions, so an earlier entry's output can be matched again by a
/// later entry. Duplicate `old` tokens are kept, not deduplicated.
#[derive(Debug, Clone, Default)]
pub struct RenameMapping {
    entries: Vec<RenameEntry>,
}

impl RenameMapping {
    /// Load a mapping file, preserving row order. A missing file or a row
    /// without exactly two fields fails with
    /// [`MigrateError::Configuration`].
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|e| {
                MigrateError::Configuration(format!(
                    "cannot open rename mapping {}: {e}",
                    path.display()
                ))
            })?;

        let mut entries = Vec::new();
        for (idx, row) in reader.records().enumerate() {
            let row = row.map_err(|e| {
                MigrateError::Configuration(format!("malformed rename mapping row {}: {e}", idx + 1))
            })?;
            if row.len() != 2 {
                return Err(MigrateError::Configuration(format!(
                    "rename mapping row {} has {} field(s), expected 2",
                    idx + 1,
                    row.len()
                )));
            }
            entries.push(RenameEntry {
                old: row[0].to_string(),
                new: row[1].to_string(),
            });
        }

        Ok(Self { entries })
    }

    pub fn from_entries(entries: Vec<RenameEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[RenameEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
