use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, info};

use rulemig_core::config::DbConfig;
use rulemig_core::error::{MigrateError, Result};
use rulemig_core::ports::{RuleSink, RuleSource};
use rulemig_core::types::{RewrittenRule, RuleRecord};

/// Open a connection pool for the configured database. Connection-level
/// failures map to [`MigrateError::Connection`] before any query runs.
pub async fn connect(config: &DbConfig) -> Result<PgPool> {
    info!("connecting to {}", config.masked_url());
    PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.url())
        .await
        .map_err(|e| MigrateError::Connection(e.to_string()))
}

/// Classify a sqlx failure: transport and pool problems are `Connection`,
/// anything the server answered is `Query`.
pub(crate) fn db_error(e: sqlx::Error) -> MigrateError {
    match e {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Configuration(_) => MigrateError::Connection(e.to_string()),
        other => MigrateError::Query(other.to_string()),
    }
}

/// Read-only view of the rule catalog.
pub struct PgRuleCatalog {
    pool: PgPool,
}

/// Join of the rule table and the entity catalog. The entity name's first
/// dot-separated segment becomes the partition schema; the return datatype
/// is lower-cased into the event classifier. `ORDER BY` pins a stable
/// processing order across runs.
const FETCH_RULES: &str = r#"
SELECT f.id, f.rule,
       split_part(e.name, '.', 1) AS schema,
       lower(f.return_datatype) AS event
FROM syst.fieldruleglobal f
INNER JOIN syst.entitycatalog e ON f.entitycatalog_id = e.id
ORDER BY f.id
"#;

impl PgRuleCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RuleSource for PgRuleCatalog {
    async fn fetch(&self) -> Result<Vec<RuleRecord>> {
        let rows = sqlx::query_as::<_, (i64, String, String, String)>(FETCH_RULES)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;
        debug!(rows = rows.len(), "fetched rule rows");
        Ok(rows
            .into_iter()
            .map(|(id, rule, schema, event)| RuleRecord {
                id,
                rule,
                schema,
                event,
            })
            .collect())
    }
}

/// How the destination sink treats an id left over from a prior run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertMode {
    /// Plain insert: a duplicate id fails the batch.
    Insert,
    /// Overwrite the previous row for the same id.
    Upsert,
}

impl InsertMode {
    fn sql(self) -> &'static str {
        match self {
            InsertMode::Insert => "INSERT INTO test.new_rules (id, rule) VALUES ($1, $2)",
            InsertMode::Upsert => {
                "INSERT INTO test.new_rules (id, rule) VALUES ($1, $2) \
                 ON CONFLICT (id) DO UPDATE SET rule = EXCLUDED.rule"
            }
        }
    }
}

/// Destination sink for migrated rules.
///
/// One transaction is opened at construction and held for the run; staged
/// inserts only become visible at [`commit`](RuleSink::commit). Dropping
/// the store without committing rolls everything back.
pub struct PgRuleStore {
    tx: Option<Transaction<'static, Postgres>>,
    mode: InsertMode,
}

impl PgRuleStore {
    pub async fn begin(pool: &PgPool, mode: InsertMode) -> Result<Self> {
        let tx = pool.begin().await.map_err(db_error)?;
        Ok(Self { tx: Some(tx), mode })
    }
}

#[async_trait]
impl RuleSink for PgRuleStore {
    async fn stage(&mut self, rule: &RewrittenRule) -> Result<()> {
        let tx = self
            .tx
            .as_mut()
            .ok_or_else(|| MigrateError::Query("rule store already committed".into()))?;
        sqlx::query(self.mode.sql())
            .bind(rule.id)
            .bind(&rule.text)
            .execute(&mut **tx)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| MigrateError::Query("rule store already committed".into()))?;
        tx.commit().await.map_err(db_error)?;
        info!("destination transaction committed");
        Ok(())
    }
}
