use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::mapping::RenameMapping;
use crate::partition::OutputPartitioner;
use crate::ports::{RuleSink, RuleSource};
use crate::rewrite::rewrite;
use crate::types::RewrittenRule;

/// Summary of a completed migration run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub rules_migrated: usize,
}

/// Run the full migration: fetch every rule, rewrite it, stage it into the
/// file tree and the destination store, commit the store, then promote the
/// staged files into place.
///
/// Strictly sequential; the first failing step aborts the whole batch, so
/// a single bad record stops everything. On abort, staged inserts die with
/// the unreached commit and staged files are discarded by the partitioner,
/// so neither sink exposes a partial run.
pub async fn run(
    source: &dyn RuleSource,
    sink: &mut dyn RuleSink,
    mapping: &RenameMapping,
    partitioner: &mut OutputPartitioner,
) -> Result<MigrationReport> {
    let records = source.fetch().await?;
    info!(
        rules = records.len(),
        renames = mapping.len(),
        "starting rule migration"
    );

    for record in &records {
        let text = rewrite(&record.rule, mapping);
        partitioner.stage(record, &text)?;
        sink.stage(&RewrittenRule { id: record.id, text }).await?;
    }

    sink.commit().await?;
    let promoted = partitioner.promote()?;
    info!(rules = promoted, "migration committed");

    Ok(MigrationReport {
        rules_migrated: promoted,
    })
}
