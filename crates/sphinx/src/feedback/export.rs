//! Streaming CSV export.
//!
//! Rows are read one at a time on a blocking thread and pushed through a
//! bounded channel, so memory stays flat regardless of table size and a
//! slow client applies backpressure to the reader.

use std::io;

use rusqlite::{Connection, params};
use sphinx_common::constants::export::{CSV_HEADER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use sphinx_common::{FeedbackRecord, PageRequest};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use super::store::{FeedbackStore, ORDER_BY, SELECT_COLUMNS, format_timestamp, record_from_row};

/// Lines buffered between the reader thread and the HTTP body
const CHANNEL_CAPACITY: usize = 64;

/// Which rows an export covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    /// Every row, unbounded
    All,
    /// One page, same ordering as the listing
    Page(PageRequest),
}

impl ExportScope {
    /// Build from raw query-string values
    pub fn from_params(all: Option<&str>, page: Option<&str>, page_size: Option<&str>) -> Self {
        let all = all
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        if all {
            Self::All
        } else {
            Self::Page(PageRequest::from_params(
                page,
                page_size,
                DEFAULT_PAGE_SIZE,
                MAX_PAGE_SIZE,
            ))
        }
    }
}

/// Wrap a field in quotes, doubling embedded quotes
pub fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// One CSV data line, newline-terminated
pub fn csv_line(record: &FeedbackRecord) -> String {
    let fields = [
        quote_field(&record.id.to_string()),
        quote_field(record.name.as_deref().unwrap_or("")),
        quote_field(record.email.as_deref().unwrap_or("")),
        quote_field(&record.message),
        quote_field(&format_timestamp(&record.created_at)),
    ];
    format!("{}\n", fields.join(","))
}

/// Produces CSV exports of the feedback table
#[derive(Clone)]
pub struct CsvExporter {
    store: FeedbackStore,
}

impl CsvExporter {
    pub fn new(store: FeedbackStore) -> Self {
        Self { store }
    }

    /// Lazily stream the export: header first, then one line per row.
    ///
    /// A storage failure after the header ends the stream with an error.
    /// Rows inserted while an export runs may or may not be included.
    pub fn stream(&self, scope: ExportScope) -> ReceiverStream<Result<String, io::Error>> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let store = self.store.clone();

        tokio::task::spawn_blocking(move || {
            if tx.blocking_send(Ok(format!("{CSV_HEADER}\n"))).is_err() {
                return;
            }

            let result = store
                .open_reader()
                .map_err(|e| io::Error::other(e.to_string()))
                .and_then(|conn| {
                    write_rows(&conn, scope, |line| tx.blocking_send(Ok(line)).is_ok())
                        .map_err(|e| io::Error::other(e.to_string()))
                });

            match result {
                Ok(rows) => tracing::info!(scope = ?scope, rows = rows, "CSV export finished"),
                Err(e) => {
                    tracing::error!(scope = ?scope, error = %e, "CSV export failed");
                    let _ = tx.blocking_send(Err(e));
                }
            }
        });

        ReceiverStream::new(rx)
    }
}

/// Emit each row in listing order until done or `emit` returns false.
///
/// Returns the number of rows emitted.
fn write_rows<F>(conn: &Connection, scope: ExportScope, mut emit: F) -> rusqlite::Result<usize>
where
    F: FnMut(String) -> bool,
{
    // SQLite treats a negative LIMIT as unbounded
    let (limit, offset) = match scope {
        ExportScope::All => (-1, 0),
        ExportScope::Page(request) => (request.page_size as i64, request.offset() as i64),
    };

    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} {ORDER_BY} LIMIT ?1 OFFSET ?2"))?;
    let rows = stmt.query_map(params![limit, offset], record_from_row)?;

    let mut emitted = 0;
    for record in rows {
        if !emit(csv_line(&record?)) {
            tracing::debug!(rows = emitted, "CSV client went away, stopping export");
            break;
        }
        emitted += 1;
    }

    Ok(emitted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};
    use futures::StreamExt;
    use sphinx_common::NewFeedback;

    async fn collect(exporter: &CsvExporter, scope: ExportScope) -> Vec<String> {
        exporter
            .stream(scope)
            .map(|line| line.unwrap())
            .collect()
            .await
    }

    #[test]
    fn test_quote_field() {
        assert_eq!(quote_field(r#"He said "hi""#), r#""He said ""hi""""#);
        assert_eq!(quote_field("a,b"), r#""a,b""#);
        assert_eq!(quote_field("line1\nline2"), "\"line1\nline2\"");
        assert_eq!(quote_field(""), r#""""#);
    }

    #[test]
    fn test_scope_from_params() {
        assert_eq!(ExportScope::from_params(Some("TRUE"), None, None), ExportScope::All);
        assert_eq!(ExportScope::from_params(Some("yes"), Some("3"), None), ExportScope::All);
        assert_eq!(
            ExportScope::from_params(Some("0"), None, None),
            ExportScope::Page(PageRequest { page: 1, page_size: 1000 })
        );
        assert_eq!(
            ExportScope::from_params(None, Some("2"), Some("99999")),
            ExportScope::Page(PageRequest { page: 2, page_size: 5000 })
        );
        assert_eq!(
            ExportScope::from_params(None, Some("x"), Some("y")),
            ExportScope::Page(PageRequest { page: 1, page_size: 1000 })
        );
    }

    #[tokio::test]
    async fn test_empty_table_yields_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = FeedbackStore::open(dir.path().join("feedback.db")).unwrap();
        let exporter = CsvExporter::new(store);

        let lines = collect(&exporter, ExportScope::All).await;
        assert_eq!(lines, vec!["id,name,email,message,created_at\n".to_string()]);
    }

    #[tokio::test]
    async fn test_rows_are_quoted_and_ordered() {
        let dir = tempfile::tempdir().unwrap();
        let store = FeedbackStore::open(dir.path().join("feedback.db")).unwrap();
        let base: DateTime<Utc> = "2026-03-01T12:00:00Z".parse().unwrap();

        store
            .insert_at(NewFeedback::new(Some("Ann"), None, "first"), base)
            .await
            .unwrap();
        store
            .insert_at(
                NewFeedback::new(None, Some("bob@example.com"), "He said \"hi\"\nthen left"),
                base + Duration::seconds(1),
            )
            .await
            .unwrap();

        let exporter = CsvExporter::new(store);
        let lines = collect(&exporter, ExportScope::All).await;

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "\"2\",\"\",\"bob@example.com\",\"He said \"\"hi\"\"\nthen left\",\"2026-03-01T12:00:01.000000Z\"\n"
        );
        assert_eq!(
            lines[2],
            "\"1\",\"Ann\",\"\",\"first\",\"2026-03-01T12:00:00.000000Z\"\n"
        );
    }

    #[tokio::test]
    async fn test_paged_export() {
        let dir = tempfile::tempdir().unwrap();
        let store = FeedbackStore::open(dir.path().join("feedback.db")).unwrap();
        let base: DateTime<Utc> = "2026-03-01T12:00:00Z".parse().unwrap();
        for i in 0..5 {
            store
                .insert_at(
                    NewFeedback::new(None, None, &format!("m{i}")),
                    base + Duration::seconds(i),
                )
                .await
                .unwrap();
        }

        let exporter = CsvExporter::new(store);
        let lines = collect(
            &exporter,
            ExportScope::Page(PageRequest { page: 2, page_size: 2 }),
        )
        .await;

        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("\"m2\""));
        assert!(lines[2].contains("\"m1\""));
    }

    #[test]
    fn test_write_rows_stops_when_receiver_gone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.db");
        let store = FeedbackStore::open(&path).unwrap();
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            for i in 0..10 {
                store
                    .insert(NewFeedback::new(None, None, &format!("m{i}")))
                    .await
                    .unwrap();
            }
        });

        let conn = store.open_reader().unwrap();
        let mut taken = 0;
        let emitted = write_rows(&conn, ExportScope::All, |_| {
            taken += 1;
            taken < 4
        })
        .unwrap();
        assert_eq!(emitted, 3);
    }
}
