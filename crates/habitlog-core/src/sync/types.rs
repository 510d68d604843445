//! State published by the sync engine.

use serde::{Deserialize, Serialize};

use super::cursor::DateCursor;
use crate::habit::HabitEntry;

/// Ordered habit entries for the cursor day.
///
/// Replaced wholesale; edits go through [`DaySnapshot::with_value`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DaySnapshot {
    habits: Vec<HabitEntry>,
}

impl DaySnapshot {
    pub fn new(habits: Vec<HabitEntry>) -> Self {
        Self { habits }
    }

    pub fn habits(&self) -> &[HabitEntry] {
        &self.habits
    }

    pub fn find(&self, habit_id: i64) -> Option<&HabitEntry> {
        self.habits.iter().find(|h| h.id == habit_id)
    }

    /// New snapshot with `habit_id`'s value replaced, or `None` if the habit
    /// is not in this snapshot.
    pub fn with_value(&self, habit_id: i64, value: f64) -> Option<Self> {
        self.find(habit_id)?;
        let habits = self
            .habits
            .iter()
            .map(|h| {
                if h.id == habit_id {
                    h.with_value(value)
                } else {
                    h.clone()
                }
            })
            .collect();
        Some(Self { habits })
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }
}

impl From<Vec<HabitEntry>> for DaySnapshot {
    fn from(habits: Vec<HabitEntry>) -> Self {
        Self::new(habits)
    }
}

/// What the presentation layer renders. Exactly one variant is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "lowercase")]
pub enum SyncState {
    Loading,
    Success(DaySnapshot),
    Error(String),
}

impl SyncState {
    pub fn snapshot(&self) -> Option<&DaySnapshot> {
        match self {
            SyncState::Success(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SyncState::Loading)
    }
}

/// The cursor and the state belonging to it, swapped as one value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncView {
    pub cursor: DateCursor,
    pub state: SyncState,
}

impl SyncView {
    pub fn loading(cursor: DateCursor) -> Self {
        Self {
            cursor,
            state: SyncState::Loading,
        }
    }
}
