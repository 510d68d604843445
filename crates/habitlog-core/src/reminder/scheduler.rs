//! Recurring daily scheduler.
//!
//! ## Entry points
//!
//! ```text
//! app start     -> arm_if_not_already -> (record false) arm_daily + record = true
//! trigger fires -> on_fire            -> show reminder, arm_daily
//! host restart  -> on_host_restart    -> arm_daily (record ignored)
//! ```
//!
//! There is no thread or clock of its own between registrations; the host
//! timer wakes it up and each firing plans exactly its own successor.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::notice::Reminder;
use super::trigger::compute_next_trigger;
use super::{RecordStore, ReminderSink, TimerHost};
use crate::error::SchedulerError;
use crate::events::Event;

/// Identity of the daily wake-up registration.
pub const DAILY_REMINDER_IDENTITY: &str = "habitlog.daily_reminder";

/// Record key for "the chain has been armed at least once".
pub const KEY_SCHEDULED: &str = "alarm_scheduled";

/// Record key for "whoever holds the chain should let it lapse".
pub const KEY_STOPPED: &str = "alarm_stopped";

/// Result of a successful registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Armed {
    pub trigger_at: DateTime<Local>,
    /// `false` when the host only granted best-effort timing.
    pub precise: bool,
}

impl Armed {
    pub fn to_event(&self) -> Event {
        Event::ReminderArmed {
            trigger_at: self.trigger_at.with_timezone(&Utc),
            precise: self.precise,
            at: Utc::now(),
        }
    }
}

/// Snapshot of the scheduler's durable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleStatus {
    /// Persisted record; `None` when never written.
    pub armed_once: Option<bool>,
    /// Where the next trigger would be placed from now.
    pub next_trigger_at: DateTime<Local>,
    /// Whether a stop marker or a cleared record is in place.
    pub stopped: bool,
}

/// Keeps one daily wake-up armed through a host timer facility.
pub struct RecurringScheduler<H, R> {
    host: H,
    records: R,
    identity: String,
}

impl<H: TimerHost, R: RecordStore> RecurringScheduler<H, R> {
    pub fn new(host: H, records: R) -> Self {
        Self::with_identity(host, records, DAILY_REMINDER_IDENTITY)
    }

    pub fn with_identity(host: H, records: R, identity: impl Into<String>) -> Self {
        Self {
            host,
            records,
            identity: identity.into(),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn records(&self) -> &R {
        &self.records
    }

    /// Register the next 11:00 wake-up, replacing any earlier one.
    ///
    /// Uses precise timing when the host allows it and falls back to
    /// best-effort timing when it does not or rejects the precise request.
    pub fn arm_daily(&self) -> Result<Armed, SchedulerError> {
        self.arm_daily_at(Local::now())
    }

    pub fn arm_daily_at(&self, now: DateTime<Local>) -> Result<Armed, SchedulerError> {
        let trigger_at = compute_next_trigger(&now);

        if self.host.is_precise_scheduling_authorized() {
            match self.host.register_once(&self.identity, trigger_at, true) {
                Ok(()) => {
                    info!(identity = %self.identity, %trigger_at, "armed precise reminder");
                    return Ok(Armed {
                        trigger_at,
                        precise: true,
                    });
                }
                Err(e) => warn!(error = %e, "precise registration rejected, using best effort"),
            }
        }

        self.host.register_once(&self.identity, trigger_at, false)?;
        info!(identity = %self.identity, %trigger_at, "armed best-effort reminder");
        Ok(Armed {
            trigger_at,
            precise: false,
        })
    }

    /// Arm the chain on first run only; later calls are no-ops.
    ///
    /// Returns `Ok(None)` when the record says it was armed before. The
    /// record is only written after a successful registration.
    pub fn arm_if_not_already(&self) -> Result<Option<Armed>, SchedulerError> {
        self.arm_if_not_already_at(Local::now())
    }

    pub fn arm_if_not_already_at(&self, now: DateTime<Local>) -> Result<Option<Armed>, SchedulerError> {
        match self.records.get(KEY_SCHEDULED) {
            Ok(Some(true)) => {
                debug!("reminder already armed once, skipping");
                return Ok(None);
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "could not read schedule record, arming anyway"),
        }

        let armed = self.arm_daily_at(now)?;
        if let Err(e) = self.records.set(KEY_SCHEDULED, true) {
            warn!(error = %e, "could not persist schedule record");
        }
        Ok(Some(armed))
    }

    /// Unregister the pending wake-up. The persisted record is left as is,
    /// so a later [`arm_if_not_already`](Self::arm_if_not_already) will still
    /// skip; use [`disable`](Self::disable) to also clear it.
    pub fn cancel_daily(&self) -> Result<(), SchedulerError> {
        self.host.cancel(&self.identity)?;
        info!(identity = %self.identity, "cancelled reminder");
        Ok(())
    }

    /// Cancel here and leave a stop marker for any other process holding
    /// the chain; it sees the marker through [`is_stopped`](Self::is_stopped)
    /// before its next firing.
    pub fn stop(&self) -> Result<(), SchedulerError> {
        self.cancel_daily()?;
        self.records.set(KEY_STOPPED, true)
    }

    /// Clear the stop marker so the chain may run again.
    pub fn resume(&self) -> Result<(), SchedulerError> {
        self.records.set(KEY_STOPPED, false)
    }

    /// True after [`stop`](Self::stop) or [`disable`](Self::disable) until
    /// the chain is resumed or re-armed. Unreadable records count as running.
    pub fn is_stopped(&self) -> bool {
        let flag = |key: &str| match self.records.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "could not read schedule record, assuming running");
                None
            }
        };
        flag(KEY_STOPPED) == Some(true) || flag(KEY_SCHEDULED) == Some(false)
    }

    /// Unregister the wake-up and clear the record so the next
    /// [`arm_if_not_already`](Self::arm_if_not_already) arms again.
    pub fn disable(&self) -> Result<Event, SchedulerError> {
        self.cancel_daily()?;
        self.records.set(KEY_SCHEDULED, false)?;
        Ok(Event::ReminderCancelled {
            record_cleared: true,
            at: Utc::now(),
        })
    }

    /// Fire handler: surface the reminder, then register tomorrow's trigger.
    ///
    /// Re-arming always runs; a failure is logged and reported as a
    /// missing `next_trigger_at` since nothing else would restart the chain.
    pub fn on_fire(&self, sink: &dyn ReminderSink) -> Event {
        self.on_fire_at(Local::now(), sink)
    }

    pub fn on_fire_at(&self, now: DateTime<Local>, sink: &dyn ReminderSink) -> Event {
        let reminder = Reminder::daily();
        sink.show_reminder(&reminder);

        let next_trigger_at = match self.arm_daily_at(now) {
            Ok(armed) => Some(armed.trigger_at.with_timezone(&Utc)),
            Err(e) => {
                warn!(error = %e, "failed to re-arm daily reminder; chain is broken");
                None
            }
        };

        Event::ReminderFired {
            reminder,
            next_trigger_at,
            at: now.with_timezone(&Utc),
        }
    }

    /// Host restart: pending registrations are gone but the record is not,
    /// so arm unconditionally.
    pub fn on_host_restart(&self) -> Result<Armed, SchedulerError> {
        self.on_host_restart_at(Local::now())
    }

    pub fn on_host_restart_at(&self, now: DateTime<Local>) -> Result<Armed, SchedulerError> {
        debug!("host restarted, re-arming reminder");
        self.arm_daily_at(now)
    }

    pub fn status(&self) -> Result<ScheduleStatus, SchedulerError> {
        self.status_at(Local::now())
    }

    pub fn status_at(&self, now: DateTime<Local>) -> Result<ScheduleStatus, SchedulerError> {
        Ok(ScheduleStatus {
            armed_once: self.records.get(KEY_SCHEDULED)?,
            next_trigger_at: compute_next_trigger(&now),
            stopped: self.is_stopped(),
        })
    }
}
