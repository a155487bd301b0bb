use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::types::RuleRecord;

/// Filesystem sink, partitioned by schema and event.
///
/// Layout: `<root>/<schema>/<event>/<id>.js`. The `.js` extension marks
/// the content type; the file body is the raw rewritten rule text.
///
/// Writes are two-phase. [`stage`](Self::stage) puts the text in a
/// temporary sibling (`<id>.js.tmp`); [`promote`](Self::promote) renames
/// everything into place once the destination transaction has committed.
/// Dropping the partitioner with unpromoted files discards them, so an
/// aborted run leaves no partially migrated rules visible.
pub struct OutputPartitioner {
    root: PathBuf,
    staged: Vec<StagedFile>,
}

struct StagedFile {
    temp: PathBuf,
    target: PathBuf,
}

impl OutputPartitioner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            staged: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Partition directory for a (schema, event) pair.
    pub fn dir_for(&self, schema: &str, event: &str) -> PathBuf {
        self.root.join(schema).join(event)
    }

    /// Write `text` to the record's temporary file, creating the partition
    /// directory if absent (creating an existing directory is a no-op).
    pub fn stage(&mut self, record: &RuleRecord, text: &str) -> Result<()> {
        let dir = self.dir_for(&record.schema, &record.event);
        fs::create_dir_all(&dir)?;

        let target = dir.join(format!("{}.js", record.id));
        let temp = dir.join(format!("{}.js.tmp", record.id));
        fs::write(&temp, text)?;
        debug!(rule_id = record.id, path = %target.display(), "staged rule file");

        self.staged.push(StagedFile { temp, target });
        Ok(())
    }

    /// Rename every staged file into its final location, overwriting files
    /// left by a previous run. Returns the number of promoted files.
    pub fn promote(&mut self) -> Result<usize> {
        let mut promoted = 0;
        while let Some(file) = self.staged.pop() {
            if let Err(e) = fs::rename(&file.temp, &file.target) {
                let _ = fs::remove_file(&file.temp);
                return Err(e.into());
            }
            promoted += 1;
        }
        debug!(files = promoted, "promoted staged rule files");
        Ok(promoted)
    }

    /// Remove staged temporary files without promoting them.
    pub fn discard(&mut self) {
        for file in self.staged.drain(..) {
            let _ = fs::remove_file(&file.temp);
        }
    }
}

impl Drop for OutputPartitioner {
    fn drop(&mut self) {
        self.discard();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, schema: &str, event: &str) -> RuleRecord {
        RuleRecord {
            id,
            rule: String::new(),
            schema: schema.into(),
            event: event.into(),
        }
    }

    #[test]
    fn derives_partition_dir_from_schema_and_event() {
        let p = OutputPartitioner::new("rules");
        // Entity "billing.invoice" with return datatype "JSON" lands here
        // after the extractor has split and lower-cased.
        assert_eq!(p.dir_for("billing", "json"), PathBuf::from("rules/billing/json"));
    }

    #[test]
    fn stage_writes_temp_not_final() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = OutputPartitioner::new(dir.path());
        p.stage(&record(7, "billing", "json"), "rule body").unwrap();

        let partition = dir.path().join("billing/json");
        assert!(partition.join("7.js.tmp").exists());
        assert!(!partition.join("7.js").exists());
    }

    #[test]
    fn promote_moves_files_into_place() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = OutputPartitioner::new(dir.path());
        p.stage(&record(7, "billing", "json"), "rule body").unwrap();
        p.stage(&record(8, "crm", "boolean"), "other body").unwrap();

        assert_eq!(p.promote().unwrap(), 2);
        let seven = dir.path().join("billing/json/7.js");
        assert_eq!(fs::read_to_string(&seven).unwrap(), "rule body");
        assert!(!dir.path().join("billing/json/7.js.tmp").exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("crm/boolean/8.js")).unwrap(),
            "other body"
        );
    }

    #[test]
    fn promote_overwrites_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = OutputPartitioner::new(dir.path());
        p.stage(&record(7, "billing", "json"), "first").unwrap();
        p.promote().unwrap();

        p.stage(&record(7, "billing", "json"), "second").unwrap();
        p.promote().unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("billing/json/7.js")).unwrap(),
            "second"
        );
    }

    #[test]
    fn staging_into_existing_partition_is_a_noop_create() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = OutputPartitioner::new(dir.path());
        p.stage(&record(1, "billing", "json"), "a").unwrap();
        p.stage(&record(2, "billing", "json"), "b").unwrap();
        assert_eq!(p.promote().unwrap(), 2);
    }

    #[test]
    fn discard_removes_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = OutputPartitioner::new(dir.path());
        p.stage(&record(7, "billing", "json"), "rule body").unwrap();
        p.discard();

        let partition = dir.path().join("billing/json");
        assert!(!partition.join("7.js.tmp").exists());
        assert!(!partition.join("7.js").exists());
    }

    #[test]
    fn drop_discards_unpromoted_files() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut p = OutputPartitioner::new(dir.path());
            p.stage(&record(7, "billing", "json"), "rule body").unwrap();
        }
        assert!(!dir.path().join("billing/json/7.js.tmp").exists());
    }
}
