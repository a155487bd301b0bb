//! Storage port traits for the migration pipeline.
//! Implemented by rulemig-postgres — core logic depends only on these traits.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{RewrittenRule, RuleRecord};

/// Read side of the rule catalog.
#[async_trait]
pub trait RuleSource: Send + Sync {
    /// Fetch every rule row, fully materialized, in a stable order.
    /// Read-only; no side effects on the catalog.
    async fn fetch(&self) -> Result<Vec<RuleRecord>>;
}

/// Destination store for migrated rules.
///
/// Staged inserts become durable only at [`commit`](RuleSink::commit),
/// which is called exactly once, after the final record. An abort before
/// commit drops everything staged.
#[async_trait]
pub trait RuleSink: Send {
    async fn stage(&mut self, rule: &RewrittenRule) -> Result<()>;
    async fn commit(&mut self) -> Result<()>;
}
