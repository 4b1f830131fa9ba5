//! SQLite-backed, append-only feedback table.
//!
//! Schema:
//! - feedbacks: id (autoincrement), name, email, message, created_at
//!
//! `created_at` is stored as fixed-width RFC 3339 UTC text with microsecond
//! precision, so ordering the column as text is chronological.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{Connection, OpenFlags, Row, params};
use sphinx_common::{FeedbackRecord, NewFeedback, SphinxError};

/// Columns in export/listing order
pub(crate) const SELECT_COLUMNS: &str = "SELECT id, name, email, message, created_at FROM feedbacks";

/// Total order: newest first, ties broken by id
pub(crate) const ORDER_BY: &str = "ORDER BY created_at DESC, id DESC";

/// Durable feedback store
#[derive(Clone)]
pub struct FeedbackStore {
    path: PathBuf,
    /// Write connection; SQLite serializes writers and assigns ids atomically
    conn: Arc<Mutex<Connection>>,
}

impl FeedbackStore {
    /// Open or create the database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SphinxError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                SphinxError::Storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let conn = Connection::open(&path).map_err(storage_error)?;

        // WAL lets export readers run alongside inserts
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(storage_error)?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS feedbacks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT,
                email TEXT,
                message TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_feedbacks_created
                ON feedbacks(created_at DESC, id DESC);
            "#,
        )
        .map_err(storage_error)?;

        tracing::debug!(path = %path.display(), "Feedback store opened");

        Ok(Self {
            path,
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validate and append a submission, stamped with the server clock
    pub async fn insert(&self, feedback: NewFeedback) -> Result<FeedbackRecord, SphinxError> {
        self.insert_at(feedback, Utc::now()).await
    }

    pub(crate) async fn insert_at(
        &self,
        feedback: NewFeedback,
        created_at: DateTime<Utc>,
    ) -> Result<FeedbackRecord, SphinxError> {
        let feedback = feedback.validate()?;
        let created_at = created_at.trunc_subsecs(6);

        let record = self
            .with_conn(move |conn| {
                conn.execute(
                    "INSERT INTO feedbacks (name, email, message, created_at) VALUES (?1, ?2, ?3, ?4)",
                    params![
                        feedback.name,
                        feedback.email,
                        feedback.message,
                        format_timestamp(&created_at)
                    ],
                )?;

                Ok(FeedbackRecord {
                    id: conn.last_insert_rowid(),
                    name: feedback.name,
                    email: feedback.email,
                    message: feedback.message,
                    created_at,
                })
            })
            .await?;

        tracing::info!(id = record.id, "Feedback stored");

        Ok(record)
    }

    /// Cheap liveness query for readiness checks
    pub async fn ping(&self) -> Result<(), SphinxError> {
        self.with_conn(|conn| conn.query_row("SELECT 1", [], |_| Ok(())))
            .await
    }

    /// Run blocking work against the shared connection off the async runtime
    pub(crate) async fn with_conn<F, T>(&self, f: F) -> Result<T, SphinxError>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|e| SphinxError::Storage(format!("mutex poisoned: {e}")))?;
            f(&guard).map_err(storage_error)
        })
        .await
        .map_err(|e| SphinxError::Internal(format!("spawn_blocking failed: {e}")))?
    }

    /// Separate read-only connection for long-running scans
    pub(crate) fn open_reader(&self) -> Result<Connection, SphinxError> {
        Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(storage_error)
    }
}

pub(crate) fn storage_error(e: rusqlite::Error) -> SphinxError {
    SphinxError::Storage(e.to_string())
}

pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Map a row selected with [`SELECT_COLUMNS`]
pub(crate) fn record_from_row(row: &Row<'_>) -> rusqlite::Result<FeedbackRecord> {
    let created_at: String = row.get(4)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?
        .with_timezone(&Utc);

    Ok(FeedbackRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        message: row.get(3)?,
        created_at,
    })
}
