//! In-process timer host built on Tokio tasks.
//!
//! Each identity owns at most one sleeping task. Registering again aborts the
//! previous task first, so only the latest trigger can fire. Firings are
//! delivered as [`Wakeup`]s on a channel; the owner feeds them back into
//! [`RecurringScheduler::on_fire`](super::RecurringScheduler::on_fire).
//!
//! Registrations live only as long as the process, which makes a process
//! start equivalent to a host restart.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Local};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::TimerHost;
use crate::error::SchedulerError;

/// A registered wake-up that reached its instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wakeup {
    pub identity: String,
    pub scheduled_for: DateTime<Local>,
    pub precise: bool,
}

/// [`TimerHost`] backed by `tokio::time::sleep`.
pub struct TokioTimerHost {
    tasks: Mutex<HashMap<String, JoinHandle<()>>>,
    wakeups: mpsc::UnboundedSender<Wakeup>,
    precise_authorized: bool,
}

impl TokioTimerHost {
    /// New host plus the receiving end for its wake-ups.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Wakeup>) {
        Self::with_precision(true)
    }

    /// Host that only grants best-effort timing when `precise_authorized`
    /// is false.
    pub fn with_precision(precise_authorized: bool) -> (Self, mpsc::UnboundedReceiver<Wakeup>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let host = Self {
            tasks: Mutex::new(HashMap::new()),
            wakeups: tx,
            precise_authorized,
        };
        (host, rx)
    }

    /// Whether a wake-up is still waiting to fire under `identity`.
    pub fn is_pending(&self, identity: &str) -> bool {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(identity)
            .is_some_and(|task| !task.is_finished())
    }
}

impl TimerHost for TokioTimerHost {
    fn register_once(&self, identity: &str, when: DateTime<Local>, precise: bool) -> Result<(), SchedulerError> {
        let handle = Handle::try_current().map_err(|e| SchedulerError::RegistrationRejected {
            identity: identity.to_string(),
            message: e.to_string(),
        })?;

        // Past instants fire immediately.
        let delay = (when - Local::now()).to_std().unwrap_or_default();
        let wakeup = Wakeup {
            identity: identity.to_string(),
            scheduled_for: when,
            precise,
        };
        let tx = self.wakeups.clone();
        let task = handle.spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means nobody is listening any more.
            let _ = tx.send(wakeup);
        });

        let previous = self
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(identity.to_string(), task);
        if let Some(previous) = previous {
            previous.abort();
            debug!(identity, "replaced earlier wake-up");
        }
        debug!(identity, %when, precise, ?delay, "registered wake-up");
        Ok(())
    }

    fn cancel(&self, identity: &str) -> Result<(), SchedulerError> {
        let removed = self
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(identity);
        if let Some(task) = removed {
            task.abort();
            debug!(identity, "cancelled wake-up");
        }
        Ok(())
    }

    fn is_precise_scheduling_authorized(&self) -> bool {
        self.precise_authorized
    }
}

impl Drop for TokioTimerHost {
    fn drop(&mut self) {
        let tasks = self.tasks.get_mut().unwrap_or_else(PoisonError::into_inner);
        for (_, task) in tasks.drain() {
            task.abort();
        }
    }
}
