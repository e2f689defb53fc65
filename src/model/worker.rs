use crate::db::{Database, TableSchema, with_pool};
use crate::serializer::Serializer;
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

pub const TABLE: &str = "worker";

pub static SCHEMA: TableSchema = TableSchema {
    name: TABLE,
    mysql: &[
        r#"
        CREATE TABLE worker (
            id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
            fullname VARCHAR(128) NOT NULL,
            email VARCHAR(128) NOT NULL,
            active BOOLEAN NOT NULL DEFAULT 1
        )
        "#,
        "CREATE UNIQUE INDEX uq_worker_fullname ON worker (fullname)",
        "CREATE UNIQUE INDEX uq_worker_email ON worker (email)",
    ],
    sqlite: &[
        r#"
        CREATE TABLE worker (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            fullname VARCHAR(128) NOT NULL CHECK (length(fullname) <= 128),
            email VARCHAR(128) NOT NULL CHECK (length(email) <= 128),
            active BOOLEAN NOT NULL DEFAULT 1
        )
        "#,
        "CREATE UNIQUE INDEX uq_worker_fullname ON worker (fullname)",
        "CREATE UNIQUE INDEX uq_worker_email ON worker (email)",
    ],
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "fullname": "User Admin",
        "email": "adminuser@example.com",
        "active": true
    })
)]
pub struct Worker {
    #[schema(example = 1)]
    pub id: i64,

    #[schema(example = "User Admin", max_length = 128)]
    pub fullname: String,

    #[schema(example = "adminuser@example.com", max_length = 128)]
    pub email: String,

    #[schema(example = true)]
    pub active: bool,
}

impl Serializer for Worker {
    const COLUMNS: &'static [&'static str] = &["id", "fullname", "email", "active"];
}

impl Worker {
    /// Every row in storage order.
    pub async fn all(db: &Database) -> Result<Vec<Worker>, sqlx::Error> {
        let workers = with_pool!(db, pool => {
            sqlx::query_as::<_, Worker>("SELECT id, fullname, email, active FROM worker")
                .fetch_all(pool)
                .await?
        });
        debug!(count = workers.len(), "Fetched workers");
        Ok(workers)
    }

    pub async fn count(db: &Database) -> Result<i64, sqlx::Error> {
        let total = with_pool!(db, pool => {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM worker")
                .fetch_one(pool)
                .await?
        });
        Ok(total)
    }
}

/// A worker that has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorker {
    pub fullname: String,
    pub email: String,
    pub active: bool,
}

impl NewWorker {
    pub fn new(fullname: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            fullname: fullname.into(),
            email: email.into(),
            active: true,
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Inserts the row and commits. A duplicate `fullname` or `email` comes
    /// back as the database's unique-violation error.
    pub async fn insert(&self, db: &Database) -> Result<Worker, sqlx::Error> {
        const SQL: &str = "INSERT INTO worker (fullname, email, active) VALUES (?, ?, ?)";

        let id = match db {
            Database::MySql(pool) => {
                let mut tx = pool.begin().await?;
                let result = sqlx::query(SQL)
                    .bind(&self.fullname)
                    .bind(&self.email)
                    .bind(self.active)
                    .execute(&mut *tx)
                    .await?;
                tx.commit().await?;
                // AUTO_INCREMENT ids start at 1 and fit in BIGINT
                result.last_insert_id() as i64
            }
            Database::Sqlite(pool) => {
                let mut tx = pool.begin().await?;
                let result = sqlx::query(SQL)
                    .bind(&self.fullname)
                    .bind(&self.email)
                    .bind(self.active)
                    .execute(&mut *tx)
                    .await?;
                tx.commit().await?;
                result.last_insert_rowid()
            }
        };

        debug!(worker_id = id, "Inserted worker");

        Ok(Worker {
            id,
            fullname: self.fullname.clone(),
            email: self.email.clone(),
            active: self.active,
        })
    }
}
