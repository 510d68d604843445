//! Next daily trigger instant.

use chrono::{DateTime, Days, Duration, LocalResult, NaiveDateTime, NaiveTime, TimeZone};

/// Local wall-clock hour of the daily reminder.
pub const REMINDER_HOUR: u32 = 11;

/// 11:00:00.000.
pub fn reminder_time() -> NaiveTime {
    NaiveTime::from_hms_opt(REMINDER_HOUR, 0, 0).unwrap_or_default()
}

/// Next 11:00:00.000 in `now`'s time zone.
///
/// Today's 11:00 if it is strictly after `now`, otherwise tomorrow's; an
/// exact tie rolls forward.
pub fn compute_next_trigger<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    next_trigger_at(now, reminder_time())
}

/// Next occurrence of wall-clock `time` strictly after `now`.
///
/// "Tomorrow" is the next calendar day at the same wall-clock time, not
/// `+24h`, so the result stays on `time` across DST shifts.
pub fn next_trigger_at<Tz: TimeZone>(now: &DateTime<Tz>, time: NaiveTime) -> DateTime<Tz> {
    let tz = now.timezone();
    let today = now.date_naive();

    let candidate = resolve_local(&tz, today.and_time(time));
    if candidate > *now {
        return candidate;
    }

    let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
    resolve_local(&tz, tomorrow.and_time(time))
}

/// Map a local wall-clock time to an instant.
///
/// Ambiguous times (clocks going back) take the earlier instant; times in a
/// gap (clocks going forward) take the first valid minute after the gap.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => (1..=24 * 60)
            .filter_map(|m| naive.checked_add_signed(Duration::minutes(m)))
            .find_map(|shifted| tz.from_local_datetime(&shifted).earliest())
            .unwrap_or_else(|| tz.from_utc_datetime(&naive)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate, Offset, Timelike, Utc};
    use proptest::prelude::*;

    /// Zone with a single offset change at a UTC instant.
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct ShiftZone {
        before: FixedOffset,
        after: FixedOffset,
        switch_utc: NaiveDateTime,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct ShiftOffset {
        zone: ShiftZone,
        fixed: FixedOffset,
    }

    impl Offset for ShiftOffset {
        fn fix(&self) -> FixedOffset {
            self.fixed
        }
    }

    impl ShiftZone {
        fn offset(&self, fixed: FixedOffset) -> ShiftOffset {
            ShiftOffset { zone: *self, fixed }
        }

        fn as_utc(local: &NaiveDateTime, fixed: FixedOffset) -> NaiveDateTime {
            *local - Duration::seconds(i64::from(fixed.local_minus_utc()))
        }
    }

    impl TimeZone for ShiftZone {
        type Offset = ShiftOffset;

        fn from_offset(offset: &ShiftOffset) -> Self {
            offset.zone
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<ShiftOffset> {
            self.offset_from_local_datetime(&local.and_time(NaiveTime::MIN))
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<ShiftOffset> {
            let early = (Self::as_utc(local, self.before) < self.switch_utc).then_some(self.before);
            let late = (Self::as_utc(local, self.after) >= self.switch_utc).then_some(self.after);
            match (early, late) {
                (Some(a), Some(b)) => LocalResult::Ambiguous(self.offset(a), self.offset(b)),
                (Some(o), None) | (None, Some(o)) => LocalResult::Single(self.offset(o)),
                (None, None) => LocalResult::None,
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> ShiftOffset {
            self.offset_from_utc_datetime(&utc.and_time(NaiveTime::MIN))
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> ShiftOffset {
            if *utc < self.switch_utc {
                self.offset(self.before)
            } else {
                self.offset(self.after)
            }
        }
    }

    fn utc(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 29)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn hours(h: i32) -> FixedOffset {
        FixedOffset::east_opt(h * 3600).unwrap()
    }

    fn at(tz: &FixedOffset, d: (i32, u32, u32), h: u32, m: u32, s: u32, ms: u32) -> DateTime<FixedOffset> {
        let naive = NaiveDate::from_ymd_opt(d.0, d.1, d.2)
            .unwrap()
            .and_hms_milli_opt(h, m, s, ms)
            .unwrap();
        tz.from_local_datetime(&naive).unwrap()
    }

    fn cest() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    #[test]
    fn just_before_eleven_is_today() {
        let tz = cest();
        let now = at(&tz, (2026, 10, 19), 10, 59, 59, 999);
        assert_eq!(compute_next_trigger(&now), at(&tz, (2026, 10, 19), 11, 0, 0, 0));
    }

    #[test]
    fn exactly_eleven_rolls_to_tomorrow() {
        let tz = cest();
        let now = at(&tz, (2026, 10, 19), 11, 0, 0, 0);
        assert_eq!(compute_next_trigger(&now), at(&tz, (2026, 10, 20), 11, 0, 0, 0));
    }

    #[test]
    fn just_after_eleven_is_tomorrow() {
        let tz = cest();
        let now = at(&tz, (2026, 10, 19), 11, 0, 0, 1);
        assert_eq!(compute_next_trigger(&now), at(&tz, (2026, 10, 20), 11, 0, 0, 0));
    }

    #[test]
    fn midnight_is_same_day() {
        let tz = cest();
        let now = at(&tz, (2026, 12, 31), 0, 0, 0, 0);
        assert_eq!(compute_next_trigger(&now), at(&tz, (2026, 12, 31), 11, 0, 0, 0));
    }

    #[test]
    fn late_evening_crosses_month_and_year() {
        let tz = cest();
        let now = at(&tz, (2026, 12, 31), 23, 59, 0, 0);
        assert_eq!(compute_next_trigger(&now), at(&tz, (2027, 1, 1), 11, 0, 0, 0));
    }

    #[test]
    fn uses_the_zone_of_now() {
        // 10:30 UTC is 12:30 at +02:00, so the +02:00 trigger is tomorrow.
        let utc_now = Utc.with_ymd_and_hms(2026, 10, 19, 10, 30, 0).unwrap();
        let local_now = utc_now.with_timezone(&cest());

        assert_eq!(compute_next_trigger(&utc_now).date_naive(), utc_now.date_naive());
        assert_eq!(
            compute_next_trigger(&local_now).date_naive(),
            NaiveDate::from_ymd_opt(2026, 10, 20).unwrap()
        );
    }

    #[test]
    fn eleven_inside_a_gap_moves_to_the_end_of_the_gap() {
        // Clocks jump from 10:30 (+01:00) to 11:30 (+02:00).
        let zone = ShiftZone {
            before: hours(1),
            after: hours(2),
            switch_utc: utc(9, 30),
        };
        let now = zone.from_utc_datetime(&utc(7, 0));

        let next = compute_next_trigger(&now);

        assert_eq!(next.naive_utc(), utc(9, 30));
        assert_eq!(next.naive_local(), utc(11, 30));
    }

    #[test]
    fn repeated_eleven_takes_the_earlier_instant() {
        // Clocks fall back from 11:30 (+02:00) to 10:30 (+01:00).
        let zone = ShiftZone {
            before: hours(2),
            after: hours(1),
            switch_utc: utc(9, 30),
        };
        let now = zone.from_utc_datetime(&utc(7, 0));

        let next = compute_next_trigger(&now);

        assert_eq!(next.naive_utc(), utc(9, 0));
        assert_eq!(next.hour(), 11);
    }

    proptest! {
        #[test]
        fn always_strictly_after_now_and_on_eleven(
            secs in 0i64..4_102_444_800,
            millis in 0u32..1000,
            offset_min in -12 * 60i32..=14 * 60,
        ) {
            let tz = FixedOffset::east_opt(offset_min * 60).unwrap();
            let now = tz.timestamp_opt(secs, millis * 1_000_000).unwrap();

            let next = compute_next_trigger(&now);

            prop_assert!(next > now);
            prop_assert!(next - now <= Duration::days(1));
            prop_assert_eq!(next.hour(), 11);
            prop_assert_eq!(next.minute(), 0);
            prop_assert_eq!(next.second(), 0);
            prop_assert_eq!(next.nanosecond(), 0);
        }
    }
}
