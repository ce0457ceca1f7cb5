//! Durable generation history.
//!
//! An append-only record of terminal job outcomes, persisted as a JSON
//! array (most recent first) in a single named store file. The store is
//! opened once at startup and flushed on every append; entries are
//! immutable once written.

pub mod entry;
pub mod store;

pub use entry::{HistoryEntry, RecordedStatus};
pub use store::{HistoryError, HistoryStore};
