use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Upper bound for a single connection attempt, so a readiness probe
/// against an unreachable server returns instead of hanging.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(3);

/// Shared database handle, cheap to clone.
///
/// The backend is picked from the `DATABASE_URL` scheme: `mysql://` (or
/// `mariadb://`) opens a MySQL pool, `sqlite:` opens a SQLite pool. In-memory
/// SQLite keeps a single connection alive for the life of the handle so that
/// `sqlite::memory:` behaves like one database rather than one per connection.
#[derive(Debug, Clone)]
pub enum Database {
    MySql(MySqlPool),
    Sqlite(SqlitePool),
}

/// Runs the same body against whichever pool the handle holds.
macro_rules! with_pool {
    ($db:expr, $pool:ident => $body:expr) => {
        match $db {
            $crate::db::Database::MySql($pool) => $body,
            $crate::db::Database::Sqlite($pool) => $body,
        }
    };
}
pub(crate) use with_pool;

/// DDL for one table, written once per backend.
#[derive(Debug)]
pub struct TableSchema {
    pub name: &'static str,
    pub mysql: &'static [&'static str],
    pub sqlite: &'static [&'static str],
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

impl Database {
    /// Builds the pool without opening a connection. Only a malformed URL
    /// fails here; an unreachable server surfaces on first use.
    pub fn connect_lazy(database_url: &str) -> Result<Self, sqlx::Error> {
        let scheme = database_url.split(':').next().unwrap_or_default();

        let db = match scheme {
            "sqlite" => {
                let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
                let pool_options = if is_in_memory(database_url) {
                    // The database lives only as long as its connection.
                    SqlitePoolOptions::new()
                        .max_connections(1)
                        .idle_timeout(None)
                        .max_lifetime(None)
                } else {
                    SqlitePoolOptions::new().max_connections(5)
                };
                let pool = pool_options
                    .acquire_timeout(ACQUIRE_TIMEOUT)
                    .connect_lazy_with(options);
                Database::Sqlite(pool)
            }
            "mysql" | "mariadb" => {
                let pool = MySqlPoolOptions::new()
                    .max_connections(5)
                    .acquire_timeout(ACQUIRE_TIMEOUT)
                    .connect_lazy(database_url)?;
                Database::MySql(pool)
            }
            other => {
                return Err(sqlx::Error::Configuration(
                    format!("unsupported database scheme `{other}`").into(),
                ));
            }
        };

        info!(backend = db.backend(), "Database handle created");
        Ok(db)
    }

    pub fn backend(&self) -> &'static str {
        match self {
            Database::MySql(_) => "mysql",
            Database::Sqlite(_) => "sqlite",
        }
    }

    /// Trivial round trip used by the readiness check.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        with_pool!(self, pool => {
            sqlx::query("SELECT 1").execute(pool).await?;
        });
        Ok(())
    }

    /// Drops every listed table (reverse order) and commits.
    pub async fn drop_all(&self, tables: &[&TableSchema]) -> Result<(), sqlx::Error> {
        with_pool!(self, pool => {
            let mut tx = pool.begin().await?;
            for table in tables.iter().rev() {
                let sql = format!("DROP TABLE IF EXISTS {}", table.name);
                debug!(sql = %sql, "Dropping table");
                sqlx::query(&sql).execute(&mut *tx).await?;
            }
            tx.commit().await?;
        });
        Ok(())
    }

    /// Creates every listed table with its indexes and commits.
    pub async fn create_all(&self, tables: &[&TableSchema]) -> Result<(), sqlx::Error> {
        let backend = self.backend();
        with_pool!(self, pool => {
            let mut tx = pool.begin().await?;
            for table in tables {
                let statements = match self {
                    Database::MySql(_) => table.mysql,
                    Database::Sqlite(_) => table.sqlite,
                };
                for sql in statements {
                    debug!(table = table.name, backend, sql = %sql, "Creating schema object");
                    sqlx::query(sql).execute(&mut *tx).await?;
                }
            }
            tx.commit().await?;
        });
        Ok(())
    }

    pub async fn close(&self) {
        with_pool!(self, pool => pool.close().await)
    }
}
