//! # habitlog Core Library
//!
//! Business logic for the habitlog client: a day-by-day view of habit
//! values that is edited optimistically and reconciled against a remote log
//! store, plus a once-daily local reminder that keeps itself armed.
//! Presentation (the CLI, or any GUI shell) is a thin layer that calls into
//! this crate and renders what it publishes.
//!
//! ## Architecture
//!
//! - **Sync Engine**: owns the `(cursor, state)` view; every transition is a
//!   whole-value swap, and results for a day no longer viewed are dropped
//! - **Remote**: the [`RemoteLogStore`] trait and its HTTP implementation
//! - **Reminder**: pure next-trigger computation and a scheduler driving a
//!   host timer facility through one persisted flag
//! - **Storage**: TOML configuration and file-backed schedule records
//!
//! ## Key Components
//!
//! - [`SyncEngine`]: optimistic edit / reconcile / reload state machine
//! - [`DateCursor`]: the day being viewed
//! - [`RecurringScheduler`]: self-perpetuating daily wake-up chain
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod habit;
pub mod reminder;
pub mod remote;
pub mod storage;
pub mod sync;

pub use error::{ConfigError, CoreError, RemoteError, SchedulerError, UNKNOWN_ERROR};
pub use events::Event;
pub use habit::{format_day, parse_day, HabitEntry, LogRequest};
pub use reminder::{
    compute_next_trigger, Armed, RecordStore, RecurringScheduler, Reminder, ReminderSink, ScheduleStatus,
    TimerHost, TokioTimerHost, Wakeup,
};
pub use remote::{HttpLogStore, RemoteLogStore};
pub use storage::{Config, FileRecordStore};
pub use sync::engine::SyncTask;
pub use sync::{DateCursor, DaySnapshot, SyncEngine, SyncState, SyncView};
