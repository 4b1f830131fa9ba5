//! Paginated, reverse-chronological feedback listing.

use rusqlite::params;
use sphinx_common::{FeedbackPage, PageRequest, SphinxError};

use super::store::{FeedbackStore, ORDER_BY, SELECT_COLUMNS, record_from_row};

/// Read side of the feedback table
#[derive(Clone)]
pub struct FeedbackQueryEngine {
    store: FeedbackStore,
}

impl FeedbackQueryEngine {
    pub fn new(store: FeedbackStore) -> Self {
        Self { store }
    }

    /// One page, newest first (ties by id, newest first).
    ///
    /// `total` and the rows come from the same read transaction.
    pub async fn list(&self, request: PageRequest) -> Result<FeedbackPage, SphinxError> {
        let (total, records) = self
            .store
            .with_conn(move |conn| {
                let tx = conn.unchecked_transaction()?;

                let total: i64 = tx.query_row("SELECT COUNT(*) FROM feedbacks", [], |row| row.get(0))?;

                let records = {
                    let mut stmt = tx.prepare(&format!("{SELECT_COLUMNS} {ORDER_BY} LIMIT ?1 OFFSET ?2"))?;
                    let rows = stmt.query_map(
                        params![request.page_size as i64, request.offset() as i64],
                        record_from_row,
                    )?;
                    rows.collect::<rusqlite::Result<Vec<_>>>()?
                };

                tx.commit()?;
                Ok((total, records))
            })
            .await?;

        tracing::debug!(
            page = request.page,
            page_size = request.page_size,
            returned = records.len(),
            total = total,
            "Listed feedback"
        );

        Ok(FeedbackPage {
            total: total.max(0) as u64,
            page: request.page,
            page_size: request.page_size,
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};
    use sphinx_common::NewFeedback;
    use sphinx_common::constants::listing;

    async fn seeded_store(dir: &tempfile::TempDir) -> FeedbackStore {
        let store = FeedbackStore::open(dir.path().join("feedback.db")).unwrap();
        let base: DateTime<Utc> = "2026-03-01T12:00:00Z".parse().unwrap();

        // Three rows share a timestamp to exercise the id tie-break
        let stamps = [0, 5, 5, 5, 2, 9, 1];
        for (i, offset) in stamps.iter().enumerate() {
            store
                .insert_at(
                    NewFeedback::new(None, None, &format!("message {i}")),
                    base + Duration::seconds(*offset),
                )
                .await
                .unwrap();
        }
        store
    }

    fn is_descending(records: &[sphinx_common::FeedbackRecord]) -> bool {
        records
            .windows(2)
            .all(|w| (w[0].created_at, w[0].id) > (w[1].created_at, w[1].id))
    }

    #[tokio::test]
    async fn test_first_page_is_newest() {
        let dir = tempfile::tempdir().unwrap();
        let engine = FeedbackQueryEngine::new(seeded_store(&dir).await);

        let page = engine
            .list(PageRequest::clamped(1, 3, listing::MAX_PAGE_SIZE))
            .await
            .unwrap();

        assert_eq!(page.total, 7);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 3);
        let messages: Vec<_> = page.records.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["message 5", "message 3", "message 2"]);
    }

    #[tokio::test]
    async fn test_pages_concatenate_to_whole_table() {
        let dir = tempfile::tempdir().unwrap();
        let engine = FeedbackQueryEngine::new(seeded_store(&dir).await);

        for page_size in 1..=8 {
            let mut all = Vec::new();
            let mut page = 1;
            loop {
                let result = engine
                    .list(PageRequest::clamped(page, page_size, listing::MAX_PAGE_SIZE))
                    .await
                    .unwrap();
                if result.records.is_empty() {
                    break;
                }
                all.extend(result.records);
                page += 1;
            }

            assert_eq!(all.len(), 7, "page size {page_size}");
            assert!(is_descending(&all), "page size {page_size}");
            let mut ids: Vec<_> = all.iter().map(|r| r.id).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), 7);
        }
    }

    #[tokio::test]
    async fn test_page_past_end_is_empty_with_total() {
        let dir = tempfile::tempdir().unwrap();
        let engine = FeedbackQueryEngine::new(seeded_store(&dir).await);

        let page = engine
            .list(PageRequest::clamped(50, 20, listing::MAX_PAGE_SIZE))
            .await
            .unwrap();
        assert!(page.records.is_empty());
        assert_eq!(page.total, 7);
    }

    #[tokio::test]
    async fn test_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let store = FeedbackStore::open(dir.path().join("feedback.db")).unwrap();
        let engine = FeedbackQueryEngine::new(store);

        let page = engine
            .list(PageRequest::clamped(1, 20, listing::MAX_PAGE_SIZE))
            .await
            .unwrap();
        assert_eq!(page.total, 0);
        assert!(page.records.is_empty());
    }
}
