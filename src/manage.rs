//! Database lifecycle commands: readiness check, schema reset and seed.

use crate::db::Database;
use crate::model::TABLES;
use crate::model::worker::{NewWorker, Worker};
use anyhow::bail;
use std::future::{self, Future};
use std::io::Write;
use std::time::Duration;
use tracing::{info, warn};

pub const CONNECTED_LINE: &str = "----------- Connection successful !";
pub const NOT_CONNECTED_LINE: &str = "----------- Connection not successful !";

pub const SEED_FULLNAME: &str = "User Admin";
pub const SEED_EMAIL: &str = "adminuser@example.com";

/// Anything the readiness loop can poll.
pub trait Probe {
    fn probe(&self) -> impl Future<Output = Result<(), sqlx::Error>>;
}

impl Probe for Database {
    async fn probe(&self) -> Result<(), sqlx::Error> {
        self.ping().await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyOptions {
    /// Pause between two failed attempts.
    pub interval: Duration,
    /// Give up after this long; `None` waits forever.
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyOutcome {
    Connected,
    Cancelled,
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyReport {
    pub outcome: ReadyOutcome,
    pub attempts: u64,
}

impl ReadyReport {
    /// Only a connected report is a success; the CLI exits non-zero otherwise.
    pub fn into_result(self) -> anyhow::Result<()> {
        match self.outcome {
            ReadyOutcome::Connected => Ok(()),
            ReadyOutcome::Cancelled => {
                bail!("readiness check cancelled after {} attempts", self.attempts)
            }
            ReadyOutcome::TimedOut => {
                bail!("database not ready after {} attempts", self.attempts)
            }
        }
    }
}

/// Polls `probe` until it succeeds, writing one status line to `out` per
/// attempt. Stops early only when `cancel` resolves or the timeout elapses.
pub async fn wait_until_ready<P, W, C>(
    probe: &P,
    options: ReadyOptions,
    out: &mut W,
    cancel: C,
) -> std::io::Result<ReadyReport>
where
    P: Probe,
    W: Write,
    C: Future<Output = ()>,
{
    let mut attempts = 0u64;

    let deadline = async {
        match options.timeout {
            Some(timeout) => tokio::time::sleep(timeout).await,
            None => future::pending::<()>().await,
        }
    };

    let outcome = tokio::select! {
        biased;

        result = poll_until_connected(probe, options.interval, out, &mut attempts) => {
            result?;
            ReadyOutcome::Connected
        }
        _ = cancel => ReadyOutcome::Cancelled,
        _ = deadline => ReadyOutcome::TimedOut,
    };

    match outcome {
        ReadyOutcome::Connected => info!(attempts, "Database is ready"),
        ReadyOutcome::Cancelled => warn!(attempts, "Readiness check cancelled"),
        ReadyOutcome::TimedOut => warn!(attempts, "Readiness check timed out"),
    }

    Ok(ReadyReport { outcome, attempts })
}

async fn poll_until_connected<P, W>(
    probe: &P,
    interval: Duration,
    out: &mut W,
    attempts: &mut u64,
) -> std::io::Result<()>
where
    P: Probe,
    W: Write,
{
    loop {
        *attempts += 1;

        match probe.probe().await {
            Ok(()) => {
                writeln!(out, "{CONNECTED_LINE}")?;
                out.flush()?;
                return Ok(());
            }
            Err(e) => {
                writeln!(out, "{NOT_CONNECTED_LINE}")?;
                out.flush()?;
                warn!(attempt = *attempts, error = %e, "Database connection failed");
            }
        }

        tokio::time::sleep(interval).await;
    }
}

/// Drops and recreates every table. Destructive, no confirmation.
pub async fn create_db(db: &Database) -> Result<(), sqlx::Error> {
    db.drop_all(TABLES).await?;
    db.create_all(TABLES).await?;
    info!(tables = TABLES.len(), backend = db.backend(), "Schema recreated");
    Ok(())
}

/// Inserts the fixed admin worker. Fails with a unique violation when the
/// database is already seeded.
pub async fn seed_db(db: &Database) -> Result<Worker, sqlx::Error> {
    let worker = NewWorker::new(SEED_FULLNAME, SEED_EMAIL).insert(db).await?;
    info!(worker_id = worker.id, "Database seeded");
    Ok(worker)
}
