//! Day-scoped habit synchronization.
//!
//! Holds the single live `(cursor, state)` view, applies optimistic edits
//! and reconciles them against the remote log store.

pub mod cursor;
pub mod engine;
pub mod types;


pub use cursor::DateCursor;
pub use engine::SyncEngine;
pub use types::{DaySnapshot, SyncState, SyncView};
