use thiserror::Error;

pub type Result<T> = std::result::Result<T, MigrateError>;

/// Failure taxonomy for a migration run. Every variant is fatal to the
/// batch; there is no per-record retry or partial-success mode.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// Missing/malformed environment configuration or rename mapping.
    /// Raised pre-flight, before any connection attempt.
    #[error("configuration: {0}")]
    Configuration(String),

    /// Catalog or destination store unreachable.
    #[error("connection: {0}")]
    Connection(String),

    /// Malformed SQL, constraint violation, or permission denial.
    #[error("query: {0}")]
    Query(String),

    /// File or directory write failure in the output tree.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
