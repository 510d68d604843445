//! Authoritative habit log store.
//!
//! The sync engine only sees the [`RemoteLogStore`] trait. [`HttpLogStore`]
//! is the production implementation backed by the habit API.

mod http;


pub use http::HttpLogStore;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::RemoteError;
use crate::habit::HabitEntry;

/// Remote source of truth for per-day habit logs.
///
/// Calls are network-backed and may be slow, fail, or complete out of order.
#[async_trait]
pub trait RemoteLogStore: Send + Sync {
    /// Fetch every habit entry for `day`.
    async fn fetch_day(&self, day: NaiveDate) -> Result<Vec<HabitEntry>, RemoteError>;

    /// Append or overwrite one habit's logged value for `day`.
    async fn append_log(&self, habit_id: i64, day: NaiveDate, value: f64) -> Result<(), RemoteError>;
}
