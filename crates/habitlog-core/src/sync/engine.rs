//! Sync engine: optimistic edits reconciled against the remote log store.
//!
//! ## Protocol
//!
//! ```text
//! mutate:  Success(s) -> Success(s') ──write ok──> fetch -> Success(server)
//!                                    └─write err─> Loading -> fetch -> Success | Error
//! load:    * -> Loading -> fetch -> Success | Error
//! ```
//!
//! The synchronous part of every operation (Loading, optimistic snapshot,
//! cursor move) has been published by the time the call returns. The
//! remote part runs on a spawned Tokio task, returned as a [`SyncTask`].
//!
//! Every remote completion carries the day it was issued for and is dropped
//! if the cursor has since moved to another day.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::cursor::DateCursor;
use super::types::{SyncState, SyncView};
use crate::remote::RemoteLogStore;

/// Handle to the asynchronous half of an engine operation.
///
/// Dropping it lets the work finish in the background.
#[derive(Debug)]
pub struct SyncTask {
    handle: Option<JoinHandle<()>>,
}

impl SyncTask {
    fn spawn<F>(fut: F) -> Self
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        Self {
            handle: Some(tokio::spawn(fut)),
        }
    }

    fn noop() -> Self {
        Self { handle: None }
    }

    /// True when the operation had nothing to do remotely.
    pub fn is_noop(&self) -> bool {
        self.handle.is_none()
    }

    /// Wait for the remote half to finish.
    pub async fn wait(self) {
        if let Some(handle) = self.handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "sync task did not complete");
            }
        }
    }
}

/// Owns the live `(cursor, state)` view for one habit list.
///
/// Must be driven from within a Tokio runtime.
pub struct SyncEngine<S> {
    store: Arc<S>,
    view: Arc<watch::Sender<SyncView>>,
}

impl<S> Clone for SyncEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            view: Arc::clone(&self.view),
        }
    }
}

impl<S: RemoteLogStore + 'static> SyncEngine<S> {
    /// Engine on today's local date, in `Loading` until the first load.
    pub fn new(store: S) -> Self {
        Self::with_cursor(store, DateCursor::today())
    }

    pub fn with_cursor(store: S, cursor: DateCursor) -> Self {
        let (tx, _rx) = watch::channel(SyncView::loading(cursor));
        Self {
            store: Arc::new(store),
            view: Arc::new(tx),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn view(&self) -> SyncView {
        self.view.borrow().clone()
    }

    pub fn state(&self) -> SyncState {
        self.view.borrow().state.clone()
    }

    pub fn cursor(&self) -> DateCursor {
        self.view.borrow().cursor
    }

    /// Stream of view changes for rendering.
    pub fn subscribe(&self) -> watch::Receiver<SyncView> {
        self.view.subscribe()
    }

    // ── Loading & navigation ─────────────────────────────────────────

    /// Point the cursor at `day`, go to `Loading` and fetch the day.
    ///
    /// This is the only path that can publish `SyncState::Error`.
    pub fn load_for_day(&self, day: NaiveDate) -> SyncTask {
        self.view
            .send_modify(|v| *v = SyncView::loading(v.cursor.at(day)));
        debug!(%day, "loading day");

        let store = Arc::clone(&self.store);
        let view = Arc::clone(&self.view);
        SyncTask::spawn(async move {
            fetch_and_publish(store.as_ref(), &view, day).await;
        })
    }

    /// Load the cursor day again (user retry after an error).
    pub fn reload(&self) -> SyncTask {
        self.load_for_day(self.cursor().day())
    }

    /// Move the cursor by `delta_days` and load the new day.
    pub fn navigate(&self, delta_days: i64) -> SyncTask {
        self.load_for_day(self.cursor().shift(delta_days).day())
    }

    pub fn previous_day(&self) -> SyncTask {
        self.navigate(-1)
    }

    pub fn next_day(&self) -> SyncTask {
        self.navigate(1)
    }

    pub fn return_to_today(&self) -> SyncTask {
        self.load_for_day(self.cursor().return_to_today().day())
    }

    // ── Edits ────────────────────────────────────────────────────────

    /// Optimistically set `habit_id` to `new_value`, then write it and
    /// reconcile with the server.
    ///
    /// No-op unless the state is `Success` and contains the habit.
    pub fn mutate(&self, habit_id: i64, new_value: f64) -> SyncTask {
        let mut issued_for = None;
        self.view.send_if_modified(|v| {
            let Some(next) = v
                .state
                .snapshot()
                .and_then(|s| s.with_value(habit_id, new_value))
            else {
                return false;
            };
            issued_for = Some(v.cursor.day());
            *v = SyncView {
                cursor: v.cursor,
                state: SyncState::Success(next),
            };
            true
        });

        let Some(day) = issued_for else {
            debug!(habit_id, "nothing to edit, ignoring mutation");
            return SyncTask::noop();
        };
        debug!(%day, habit_id, new_value, "applied optimistic edit");

        let store = Arc::clone(&self.store);
        let view = Arc::clone(&self.view);
        SyncTask::spawn(async move {
            let store = store.as_ref();
            match store.append_log(habit_id, day, new_value).await {
                Ok(()) => match store.fetch_day(day).await {
                    Ok(habits) => {
                        publish(&view, day, SyncState::Success(habits.into()));
                        return;
                    }
                    Err(e) => warn!(%day, error = %e, "reconcile fetch failed"),
                },
                Err(e) => warn!(%day, habit_id, error = %e, "write failed"),
            }

            // Drop the guess and re-derive everything from the server.
            if restart_load(&view, day) {
                fetch_and_publish(store, &view, day).await;
            }
        })
    }

    /// Add exactly 1 to the habit's value (absent counts as 0).
    pub fn increment(&self, habit_id: i64) -> SyncTask {
        self.adjust(habit_id, 1.0)
    }

    /// Subtract exactly 1 from the habit's value (absent counts as 0).
    pub fn decrement(&self, habit_id: i64) -> SyncTask {
        self.adjust(habit_id, -1.0)
    }

    /// Write `value` verbatim.
    pub fn set_value(&self, habit_id: i64, value: f64) -> SyncTask {
        self.mutate(habit_id, value)
    }

    fn adjust(&self, habit_id: i64, delta: f64) -> SyncTask {
        let current = {
            let view = self.view.borrow();
            view.state
                .snapshot()
                .and_then(|s| s.find(habit_id))
                .map(|h| h.value_or_zero())
        };
        match current {
            Some(value) => self.mutate(habit_id, value + delta),
            None => SyncTask::noop(),
        }
    }
}

/// Fetch `day` and publish the outcome if the cursor is still on it.
async fn fetch_and_publish<S: RemoteLogStore + ?Sized>(
    store: &S,
    view: &watch::Sender<SyncView>,
    day: NaiveDate,
) {
    let next = match store.fetch_day(day).await {
        Ok(habits) => SyncState::Success(habits.into()),
        Err(e) => {
            warn!(%day, error = %e, "load failed");
            SyncState::Error(e.display_message().to_string())
        }
    };
    publish(view, day, next);
}

/// Replace the state if the cursor is still on `day`. Returns whether it did.
fn publish(view: &watch::Sender<SyncView>, day: NaiveDate, state: SyncState) -> bool {
    let published = view.send_if_modified(|v| {
        if v.cursor.day() != day {
            return false;
        }
        *v = SyncView {
            cursor: v.cursor,
            state,
        };
        true
    });
    if !published {
        debug!(%day, "discarding result for a day no longer viewed");
    }
    published
}

/// Go back to `Loading` for `day` if it is still the cursor day.
fn restart_load(view: &watch::Sender<SyncView>, day: NaiveDate) -> bool {
    publish(view, day, SyncState::Loading)
}
