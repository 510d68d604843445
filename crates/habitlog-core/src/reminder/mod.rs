//! Daily habit reminder.
//!
//! A self-perpetuating chain of one-shot wake-ups: every firing surfaces the
//! reminder and registers its own successor for the next 11:00. The only
//! durable state is one persisted "armed at least once" flag.
//!
//! The host's timer facility and record store sit behind [`TimerHost`] and
//! [`RecordStore`]; presentation receives reminders through [`ReminderSink`].

pub mod notice;
pub mod scheduler;
pub mod tokio_host;
pub mod trigger;


pub use notice::Reminder;
pub use scheduler::{Armed, RecurringScheduler, ScheduleStatus, DAILY_REMINDER_IDENTITY, KEY_SCHEDULED, KEY_STOPPED};
pub use tokio_host::{TokioTimerHost, Wakeup};
pub use trigger::{compute_next_trigger, next_trigger_at, reminder_time, REMINDER_HOUR};

use chrono::{DateTime, Local};

use crate::error::SchedulerError;

/// Host facility for one-shot wake-ups.
pub trait TimerHost: Send + Sync {
    /// Register a wake-up at `when` under `identity`, replacing any earlier
    /// registration with the same identity.
    fn register_once(&self, identity: &str, when: DateTime<Local>, precise: bool) -> Result<(), SchedulerError>;

    /// Drop the registration under `identity`, if any.
    fn cancel(&self, identity: &str) -> Result<(), SchedulerError>;

    /// Whether exact-time registrations are currently allowed.
    fn is_precise_scheduling_authorized(&self) -> bool;
}

/// Durable boolean records that survive process restarts.
pub trait RecordStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<bool>, SchedulerError>;

    fn set(&self, key: &str, value: bool) -> Result<(), SchedulerError>;
}

/// Presentation hook that puts the reminder in front of the user.
pub trait ReminderSink {
    fn show_reminder(&self, reminder: &Reminder);
}

impl<T: TimerHost + ?Sized> TimerHost for std::sync::Arc<T> {
    fn register_once(&self, identity: &str, when: DateTime<Local>, precise: bool) -> Result<(), SchedulerError> {
        (**self).register_once(identity, when, precise)
    }

    fn cancel(&self, identity: &str) -> Result<(), SchedulerError> {
        (**self).cancel(identity)
    }

    fn is_precise_scheduling_authorized(&self) -> bool {
        (**self).is_precise_scheduling_authorized()
    }
}

impl<T: RecordStore + ?Sized> RecordStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<bool>, SchedulerError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: bool) -> Result<(), SchedulerError> {
        (**self).set(key, value)
    }
}
