//! Setup error types.
//!
//! Everything that can go wrong between process start and a live pool is a
//! [`SetupError`]. These are configuration or connectivity defects: the
//! process cannot fix them by retrying, so no variant carries retry
//! semantics. Only the binary's entry point turns one into an exit code.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for setup operations.
pub type Result<T> = std::result::Result<T, SetupError>;

#[derive(Error, Debug)]
pub enum SetupError {
    /// A required connection setting resolved to an empty value.
    #[error("required connection setting {key} is empty")]
    MissingSetting { key: &'static str },

    /// sslmode=verify-full demands a root certificate to verify against.
    #[error("POSTGRES_SSLMODE is verify-full but POSTGRES_CERTIFICATE_PATH is not set")]
    MissingRootCert,

    /// Opening the pool failed (bad descriptor or unreachable server).
    #[error("failed to open connection pool: {0}")]
    PoolOpen(#[source] sqlx::Error),

    /// The liveness probe after pool open failed.
    #[error("database liveness probe failed: {0}")]
    Ping(#[source] sqlx::Error),

    /// Enumerating the current table set failed.
    #[error("failed to enumerate tables: {0}")]
    TableScan(#[source] sqlx::Error),

    /// Dropping a table during the reset failed.
    #[error("failed to drop table {table}: {source}")]
    DropTable { table: String, source: sqlx::Error },

    /// The schema file could not be read.
    #[error("failed to read schema file {path}: {source}")]
    SchemaRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Executing the schema file against the pool failed.
    #[error("failed to apply schema: {0}")]
    SchemaApply(#[source] sqlx::Error),

    /// The reset transaction could not be opened.
    #[error("failed to begin reset transaction: {0}")]
    ResetBegin(#[source] sqlx::Error),

    /// The reset transaction could not be committed.
    #[error("failed to commit reset transaction: {0}")]
    ResetCommit(#[source] sqlx::Error),
}
