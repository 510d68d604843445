//! The day currently being viewed.

use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Calendar day under view plus the "today" captured when the cursor was
/// created.
///
/// `today` is never re-evaluated, so `is_today()` stays consistent for a
/// whole session even across midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateCursor {
    day: NaiveDate,
    today: NaiveDate,
}

impl DateCursor {
    /// Cursor on `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self { day: today, today }
    }

    /// Cursor on the local calendar's current day.
    pub fn today() -> Self {
        Self::new(Local::now().date_naive())
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn today_reference(&self) -> NaiveDate {
        self.today
    }

    pub fn is_today(&self) -> bool {
        self.day == self.today
    }

    /// Cursor moved by `delta_days`. Out of calendar range leaves it as is.
    pub fn shift(self, delta_days: i64) -> Self {
        let days = Days::new(delta_days.unsigned_abs());
        let moved = if delta_days >= 0 {
            self.day.checked_add_days(days)
        } else {
            self.day.checked_sub_days(days)
        };
        match moved {
            Some(day) => Self { day, ..self },
            None => self,
        }
    }

    /// Cursor on `day`, same today reference.
    pub fn at(self, day: NaiveDate) -> Self {
        Self { day, ..self }
    }

    pub fn previous(self) -> Self {
        self.shift(-1)
    }

    pub fn next(self) -> Self {
        self.shift(1)
    }

    pub fn return_to_today(self) -> Self {
        Self::new(self.today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn starts_on_today() {
        let cursor = DateCursor::new(d(2026, 10, 19));
        assert_eq!(cursor.day(), d(2026, 10, 19));
        assert!(cursor.is_today());
    }

    #[test]
    fn previous_and_next_move_one_day() {
        let cursor = DateCursor::new(d(2026, 3, 1));
        assert_eq!(cursor.previous().day(), d(2026, 2, 28));
        assert_eq!(cursor.next().day(), d(2026, 3, 2));
        assert!(!cursor.previous().is_today());
        assert!(!cursor.next().is_today());
    }

    #[test]
    fn shift_crosses_year_boundary() {
        let cursor = DateCursor::new(d(2026, 12, 31));
        assert_eq!(cursor.shift(1).day(), d(2027, 1, 1));
        assert_eq!(cursor.shift(-365).day(), d(2025, 12, 31));
    }

    #[test]
    fn return_to_today_resets_flag() {
        let cursor = DateCursor::new(d(2026, 10, 19)).next().next();
        assert!(!cursor.is_today());

        let back = cursor.return_to_today();
        assert!(back.is_today());
        assert_eq!(back.day(), d(2026, 10, 19));
    }

    #[test]
    fn navigating_back_onto_today_is_today() {
        let cursor = DateCursor::new(d(2026, 10, 19)).previous().next();
        assert!(cursor.is_today());
    }

    #[test]
    fn at_keeps_today_reference() {
        let today = d(2026, 10, 19);
        let cursor = DateCursor::new(today).at(d(2026, 1, 1));
        assert_eq!(cursor.today_reference(), today);
        assert!(!cursor.is_today());
        assert!(cursor.at(today).is_today());
    }

    #[test]
    fn shift_out_of_range_is_ignored() {
        let cursor = DateCursor::new(NaiveDate::MAX);
        assert_eq!(cursor.next().day(), NaiveDate::MAX);
        assert_eq!(cursor.shift(i64::MIN).day(), NaiveDate::MAX);
    }
}
