use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reminder::Reminder;

/// Reminder lifecycle events handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A one-shot wake-up was registered.
    ReminderArmed {
        trigger_at: DateTime<Utc>,
        precise: bool,
        at: DateTime<Utc>,
    },
    /// The daily trigger fired and the reminder was surfaced.
    ReminderFired {
        reminder: Reminder,
        /// Successor wake-up, `None` if re-arming failed.
        next_trigger_at: Option<DateTime<Utc>>,
        at: DateTime<Utc>,
    },
    /// The pending wake-up was unregistered.
    ReminderCancelled {
        /// Whether the "armed once" record was cleared as well.
        record_cleared: bool,
        at: DateTime<Utc>,
    },
}
