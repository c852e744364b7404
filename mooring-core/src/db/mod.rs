//! Database handle: pooled Postgres connection plus the query façade.
//!
//! [`Db`] is the one owner of the pool. Request handlers borrow it for the
//! duration of a request; the lifecycle layer releases it exactly once at
//! shutdown. Pool shape is fixed at open time and never mutated afterwards,
//! so sharing needs no locking beyond what the pool itself provides.

pub mod queries;
pub mod reset;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::Connection;
use tracing::{debug, info};

use crate::config::ConnectionConfig;
use crate::error::SetupError;

pub use queries::User;

/// Live connection pool and the query façade bound to it.
#[derive(Clone, Debug)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    /// Open a pooled connection described by `config` and verify liveness.
    ///
    /// `config` is expected to have passed [`ConnectionConfig::validate`]
    /// already; this is the first point that touches the network. If the
    /// liveness probe fails the partially-opened pool is closed before the
    /// error is returned, so no handle leaks. There is no retry here; the
    /// caller decides whether a failure is fatal.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, SetupError> {
        let options: PgConnectOptions = config.dsn().parse().map_err(SetupError::PoolOpen)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_open_conns)
            .min_connections(config.max_idle_conns.min(config.max_open_conns))
            .max_lifetime(config.conn_max_lifetime)
            .connect_with(options)
            .await
            .map_err(SetupError::PoolOpen)?;

        if let Err(err) = ping(&pool).await {
            pool.close().await;
            return Err(SetupError::Ping(err));
        }

        info!(
            host = %config.host,
            database = %config.database,
            max_open = config.max_open_conns,
            max_idle = config.max_idle_conns,
            lifetime_secs = config.conn_max_lifetime.as_secs(),
            "database pool ready"
        );

        Ok(Self { pool })
    }

    /// Wrap an existing pool. Intended for tests and embedding.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Raw pool access. Used by the reset path; handlers should go through
    /// the typed queries instead.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Release the pool. Safe to call exactly once at shutdown or test
    /// teardown; closing waits for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
        debug!("database pool closed");
    }
}

/// Liveness probe: check out one connection and ping it.
async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut conn = pool.acquire().await?;
    conn.ping().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunMode;

    // Integration tests require the local test database:
    //   cargo test -p mooring-core -- --ignored

    fn local_test_config() -> ConnectionConfig {
        ConnectionConfig::resolve(RunMode::Testing, |_| None)
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn connect_and_probe() {
        let config = local_test_config();
        config.validate().expect("test config is complete");

        let db = Db::connect(&config).await.expect("pool open failed");
        let names = db.all_table_names().await.expect("table scan failed");
        assert!(names.iter().all(|n| !n.is_empty()));

        db.close().await;
        assert!(db.pool().is_closed());
    }

    #[tokio::test]
    async fn connect_fails_against_unreachable_host() {
        let mut config = local_test_config();
        // Nothing listens here; open or probe must fail, not hang forever.
        config.port = "1".to_string();

        let err = Db::connect(&config).await.unwrap_err();
        assert!(matches!(
            err,
            SetupError::PoolOpen(_) | SetupError::Ping(_)
        ));
    }
}
