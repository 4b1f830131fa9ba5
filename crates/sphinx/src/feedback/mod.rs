//! Feedback collection: the append-only store, the paginated listing, and
//! the streaming CSV export.

mod export;
mod query;
mod store;

pub use export::{CsvExporter, ExportScope};
pub use query::FeedbackQueryEngine;
pub use store::FeedbackStore;
