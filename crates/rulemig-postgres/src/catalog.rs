//! Catalog passthrough helpers: single parameterized statements with no
//! transformation logic of their own.

use sqlx::PgPool;
use tracing::debug;

use rulemig_core::error::Result;

use crate::store::db_error;

/// List database field names as `schema__table__column`, skipping the
/// public and system schemas. This listing is the feed from which rename
/// mapping files are authored.
pub async fn field_names(pool: &PgPool) -> Result<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>(
        r#"
        SELECT table_schema || '__' || table_name || '__' || column_name
        FROM information_schema.columns
        WHERE table_schema NOT IN ('public', 'pg_catalog', 'information_schema')
        ORDER BY table_schema, table_name, ordinal_position
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(db_error)?;
    debug!(fields = names.len(), "listed catalog field names");
    Ok(names)
}

/// Flip the reviewed flag on one migrated rule, stamping the review time.
/// Returns false when no rule matches the id.
pub async fn set_rule_checked(pool: &PgPool, id: i64, checked: bool) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE test.new_rules SET checked = $2, checked_at = now() WHERE id = $1",
    )
    .bind(id)
    .bind(checked)
    .execute(pool)
    .await
    .map_err(db_error)?;
    Ok(result.rows_affected() > 0)
}
