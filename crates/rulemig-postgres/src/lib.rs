//! Postgres implementations of the rulemig-core port traits.
//!
//! Adapters wrap a `PgPool`. All SQL is runtime-checked (`sqlx::query`,
//! not `sqlx::query!`) to avoid a compile-time database requirement.

pub mod catalog;
mod store;

pub use store::{connect, InsertMode, PgRuleCatalog, PgRuleStore};
