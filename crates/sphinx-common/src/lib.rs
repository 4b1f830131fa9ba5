//! # Sphinx Common
//!
//! Shared types, errors, and constants used by the Sphinx site backend.
//!
//! ## Modules
//! - `types` - Core data structures (RiddleEntry, FeedbackRecord, PageRequest, etc.)
//! - `error` - Common error taxonomy with HTTP status mapping
//! - `constants` - Shared defaults and bounds

pub mod constants;
pub mod error;
pub mod types;

pub use error::SphinxError;
pub use types::*;
