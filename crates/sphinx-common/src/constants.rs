//! Shared constants for Sphinx components.

/// Default HTTP listen address
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

/// Default SQLite database file for feedback
pub const DEFAULT_DATABASE_PATH: &str = "data/feedback.db";

/// Default directory holding the site's HTML pages
pub const DEFAULT_PUBLIC_DIR: &str = "public";

/// Default session cookie name
pub const DEFAULT_COOKIE_NAME: &str = "sphinx_session";

/// Default session token lifetime (1 hour)
pub const DEFAULT_SESSION_MAX_AGE_SECS: u64 = 3600;

/// Feedback listing page-size bounds
pub mod listing {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_PAGE_SIZE: u32 = 20;
    pub const MAX_PAGE_SIZE: u32 = 500;
}

/// CSV export page-size bounds
pub mod export {
    pub const DEFAULT_PAGE_SIZE: u32 = 1000;
    pub const MAX_PAGE_SIZE: u32 = 5000;

    /// Header line, always the first line of every export
    pub const CSV_HEADER: &str = "id,name,email,message,created_at";

    /// Download file name advertised in Content-Disposition
    pub const FILE_NAME: &str = "feedbacks.csv";
}

/// Machine-readable error codes returned in `{ok:false, error}` bodies
pub mod error_codes {
    pub const EMPTY_MESSAGE: &str = "empty-message";
    pub const INVALID_BODY: &str = "invalid-body";
    pub const NO_RIDDLE: &str = "no-riddle";
    pub const DB_ERROR: &str = "db-error";
    pub const DISABLED: &str = "disabled";
    pub const INTERNAL: &str = "internal-error";
}
