//! rulemig - migrate catalog rule definitions to the new field-naming
//! convention.
//!
//! Usage:
//!   rulemig migrate [--mapping field_names.csv] [--out-dir rules] [--upsert] [--json]
//!   rulemig fields
//!   rulemig check <rule-id> [--unchecked]
//!
//! Database settings come from DB_USER, DB_HOST, DB_PASSWORD, DB_PORT and
//! DB_NAME (a .env file is honored). Any missing value aborts before a
//! connection is attempted.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use rulemig_core::config::DbConfig;
use rulemig_core::mapping::RenameMapping;
use rulemig_core::orchestrator;
use rulemig_core::partition::OutputPartitioner;
use rulemig_postgres::{catalog, connect, InsertMode, PgRuleCatalog, PgRuleStore};

#[derive(Parser)]
#[command(name = "rulemig")]
#[command(about = "Migrate catalog rule definitions to the new field-naming convention")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rewrite every rule and write it to the partitioned file tree and
    /// the destination table
    Migrate {
        /// Rename mapping CSV, one old_name,new_name per row, no header
        #[arg(long, default_value = "field_names.csv")]
        mapping: PathBuf,

        /// Root directory of the partitioned rule tree
        #[arg(long, default_value = "rules")]
        out_dir: PathBuf,

        /// Overwrite destination rows left by a previous run instead of
        /// failing on duplicate ids
        #[arg(long)]
        upsert: bool,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List database field names as schema__table__column
    Fields,

    /// Mark a migrated rule as reviewed
    Check {
        /// Rule id
        id: i64,

        /// Clear the reviewed flag instead of setting it
        #[arg(long)]
        unchecked: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Migrate {
            mapping,
            out_dir,
            upsert,
            json,
        } => migrate(mapping, out_dir, upsert, json).await,
        Command::Fields => fields().await,
        Command::Check { id, unchecked } => check(id, !unchecked).await,
    }
}

async fn migrate(mapping_path: PathBuf, out_dir: PathBuf, upsert: bool, json: bool) -> Result<()> {
    let config = DbConfig::from_env()?;
    // Mapping problems abort here, before the catalog is touched.
    let mapping = RenameMapping::load(&mapping_path)?;

    let pool = connect(&config).await?;
    let source = PgRuleCatalog::new(pool.clone());
    let mode = if upsert {
        InsertMode::Upsert
    } else {
        InsertMode::Insert
    };
    let mut sink = PgRuleStore::begin(&pool, mode).await?;
    let mut partitioner = OutputPartitioner::new(out_dir);

    let report = orchestrator::run(&source, &mut sink, &mapping, &mut partitioner).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("migrated {} rule(s)", report.rules_migrated);
    }
    Ok(())
}

async fn fields() -> Result<()> {
    let config = DbConfig::from_env()?;
    let pool = connect(&config).await?;
    for name in catalog::field_names(&pool).await? {
        println!("{name}");
    }
    Ok(())
}

async fn check(id: i64, checked: bool) -> Result<()> {
    let config = DbConfig::from_env()?;
    let pool = connect(&config).await?;
    if catalog::set_rule_checked(&pool, id, checked).await? {
        println!(
            "rule {id} marked {}",
            if checked { "checked" } else { "unchecked" }
        );
        Ok(())
    } else {
        anyhow::bail!("no rule with id {id}")
    }
}
