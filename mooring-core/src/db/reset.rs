//! Destructive database reset used for test isolation.
//!
//! Drops every table in the public schema and reapplies the schema file.
//! The whole sequence runs in a single transaction: Postgres DDL is
//! transactional, so a failure partway through rolls back and the database
//! is either fully rebuilt or untouched, never something in between.
//!
//! The executor assumes exclusive access to the target database. It must
//! run strictly before serving begins and never alongside another writer.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::db::Db;
use crate::error::SetupError;

/// Where the schema lives relative to the process working directory.
pub const DEFAULT_SCHEMA_PATH: &str = "db/schema.sql";

/// Drop all tables, reapply the schema at `schema_path`, and log the
/// resulting table set.
///
/// Deterministic given a fixed schema file: running it twice leaves an
/// identical table set both times.
pub async fn reset_database(db: &Db, schema_path: &Path) -> Result<(), SetupError> {
    let tables = db.all_table_names().await.map_err(SetupError::TableScan)?;
    info!(?tables, "tables before reset");

    let schema = fs::read_to_string(schema_path).map_err(|source| SetupError::SchemaRead {
        path: schema_path.to_path_buf(),
        source,
    })?;

    let mut tx = db.pool().begin().await.map_err(SetupError::ResetBegin)?;

    for table in &tables {
        let drop_stmt = format!(r#"DROP TABLE IF EXISTS "{table}" CASCADE"#);
        sqlx::raw_sql(&drop_stmt)
            .execute(&mut *tx)
            .await
            .map_err(|source| SetupError::DropTable {
                table: table.clone(),
                source,
            })?;
    }

    // The schema file is executed verbatim; it may contain any number of
    // statements.
    sqlx::raw_sql(&schema)
        .execute(&mut *tx)
        .await
        .map_err(SetupError::SchemaApply)?;

    tx.commit().await.map_err(SetupError::ResetCommit)?;

    // Observational only: confirm what the reset produced.
    let tables = db.all_table_names().await.map_err(SetupError::TableScan)?;
    info!(?tables, "tables after reset");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConnectionConfig, RunMode};

    // Integration tests require the local test database:
    //   cargo test -p mooring-core -- --ignored
    // The schema path is relative to the crate directory here, one level
    // below the workspace root where db/schema.sql lives.
    const SCHEMA: &str = "../db/schema.sql";

    async fn connect_local() -> Db {
        let config = ConnectionConfig::resolve(RunMode::Testing, |_| None);
        config.validate().expect("test config is complete");
        Db::connect(&config).await.expect("pool open failed")
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn reset_rebuilds_schema_tables() {
        let db = connect_local().await;

        reset_database(&db, Path::new(SCHEMA)).await.expect("reset failed");

        let tables = db.all_table_names().await.expect("table scan failed");
        assert_eq!(tables, vec!["users".to_string()]);

        // Fresh database: the primary table starts empty.
        let users = db.list_users().await.expect("list failed");
        assert!(users.is_empty());

        db.close().await;
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn reset_is_idempotent() {
        let db = connect_local().await;

        reset_database(&db, Path::new(SCHEMA)).await.expect("first reset failed");
        let first = db.all_table_names().await.expect("table scan failed");

        reset_database(&db, Path::new(SCHEMA)).await.expect("second reset failed");
        let second = db.all_table_names().await.expect("table scan failed");

        assert_eq!(first, second);

        db.close().await;
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn reset_fails_cleanly_on_missing_schema_file() {
        let db = connect_local().await;

        let missing = tempfile::tempdir().expect("tempdir").path().join("nope.sql");
        let err = reset_database(&db, &missing).await.unwrap_err();
        assert!(matches!(err, SetupError::SchemaRead { .. }));

        db.close().await;
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn failed_schema_apply_rolls_back_entirely() {
        let db = connect_local().await;

        // Establish a known-good state first.
        reset_database(&db, Path::new(SCHEMA)).await.expect("reset failed");
        let before = db.all_table_names().await.expect("table scan failed");

        // A schema that fails after its first statement must leave nothing
        // behind from either statement.
        let dir = tempfile::tempdir().expect("tempdir");
        let broken = dir.path().join("broken.sql");
        fs::write(
            &broken,
            "CREATE TABLE half_done (id BIGINT);\nCREATE TABLE half_done (id BIGINT);",
        )
        .expect("write schema");

        let err = reset_database(&db, &broken).await.unwrap_err();
        assert!(matches!(err, SetupError::SchemaApply(_)));

        let after = db.all_table_names().await.expect("table scan failed");
        assert_eq!(before, after);

        db.close().await;
    }
}
