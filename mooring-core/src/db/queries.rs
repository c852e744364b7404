//! Typed query façade over the shared pool.
//!
//! This is the whole query surface the HTTP layer sees. The reset path
//! additionally reuses [`Db::all_table_names`] for its before/after
//! snapshots.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::Db;

/// User record as stored in the `users` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Db {
    /// All users, oldest first.
    pub async fn list_users(&self) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT id, name, email, created_at FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }

    /// Seed the fixed set of default users. Idempotent: rows that already
    /// exist (by email) are left alone.
    pub async fn create_default_users(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO users (name, email) VALUES
                ('Ada Lovelace', 'ada@example.com'),
                ('Grace Hopper', 'grace@example.com'),
                ('Alan Turing', 'alan@example.com')
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Names of every table in the public schema, ordered by name.
    pub async fn all_table_names(&self) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT tablename FROM pg_catalog.pg_tables WHERE schemaname = 'public' ORDER BY tablename",
        )
        .fetch_all(&self.pool)
        .await
    }
}
