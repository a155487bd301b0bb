//! Core domain for the rule migration pipeline.
//!
//! Rewrites catalog rule text to the new field-naming convention and fans
//! the result out to a partitioned file tree and a destination table.
//! Storage lives behind the port traits in [`ports`], implemented by
//! `rulemig-postgres`. Everything here is database-free.

pub mod config;
pub mod error;
pub mod mapping;
pub mod orchestrator;
pub mod partition;
pub mod ports;
pub mod rewrite;
pub mod types;

pub use error::{MigrateError, Result};
