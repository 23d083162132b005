use std::iter;

use chrono::{
    DateTime, Datelike, FixedOffset, Months, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeDelta, Timelike, Utc,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MAX_OFFSET_MINUTES: i16 = 24 * 60 - 1;

/// Calendar unit a time tick is aligned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeGranularity {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

/// One row of the calendar interval table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarInterval {
    pub granularity: TimeGranularity,
    pub steps: &'static [u32],
}

/// Candidate time intervals ordered from finest to coarsest.
pub static CALENDAR_INTERVALS: [CalendarInterval; 8] = [
    CalendarInterval {
        granularity: TimeGranularity::Millisecond,
        steps: &[1, 2, 5, 10, 20, 50, 100, 200, 500],
    },
    CalendarInterval {
        granularity: TimeGranularity::Second,
        steps: &[1, 5, 15, 30],
    },
    CalendarInterval {
        granularity: TimeGranularity::Minute,
        steps: &[1, 5, 15, 30],
    },
    CalendarInterval {
        granularity: TimeGranularity::Hour,
        steps: &[1, 3, 6, 12],
    },
    CalendarInterval {
        granularity: TimeGranularity::Day,
        steps: &[1, 2],
    },
    CalendarInterval {
        granularity: TimeGranularity::Week,
        steps: &[1],
    },
    CalendarInterval {
        granularity: TimeGranularity::Month,
        steps: &[1, 3, 6],
    },
    CalendarInterval {
        granularity: TimeGranularity::Year,
        steps: &[1, 2, 5, 10, 20, 50, 100, 200, 500, 1000],
    },
];

impl TimeGranularity {
    /// Width of one unit in milliseconds for the fixed-width units.
    #[must_use]
    pub fn fixed_millis(self) -> Option<i64> {
        match self {
            Self::Millisecond => Some(1),
            Self::Second => Some(MS_PER_SECOND),
            Self::Minute => Some(MS_PER_MINUTE),
            Self::Hour => Some(MS_PER_HOUR),
            Self::Day | Self::Week | Self::Month | Self::Year => None,
        }
    }

    /// Truncates `t` to the start of the unit containing it.
    ///
    /// Weeks start on Sunday.
    #[must_use]
    pub fn floor(self, t: NaiveDateTime) -> NaiveDateTime {
        let date = t.date();
        match self {
            Self::Millisecond => {
                let nanos = t.nanosecond() / 1_000_000 * 1_000_000;
                t.with_nanosecond(nanos).unwrap_or(t)
            }
            Self::Second => t.with_nanosecond(0).unwrap_or(t),
            Self::Minute => {
                midnight(date) + TimeDelta::minutes(i64::from(t.hour() * 60 + t.minute()))
            }
            Self::Hour => midnight(date) + TimeDelta::hours(i64::from(t.hour())),
            Self::Day => midnight(date),
            Self::Week => {
                let back = i64::from(date.weekday().num_days_from_sunday());
                midnight(date) - TimeDelta::days(back)
            }
            Self::Month => date.with_day(1).map_or(t, midnight),
            Self::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).map_or(t, midnight),
        }
    }

    /// Moves `t` by `n` whole units. `None` when chrono's range is exceeded.
    #[must_use]
    pub fn offset(self, t: NaiveDateTime, n: i64) -> Option<NaiveDateTime> {
        match self {
            Self::Millisecond | Self::Second | Self::Minute | Self::Hour => {
                let unit = self.fixed_millis()?;
                t.checked_add_signed(TimeDelta::try_milliseconds(n.checked_mul(unit)?)?)
            }
            Self::Day => t.checked_add_signed(TimeDelta::try_days(n)?),
            Self::Week => t.checked_add_signed(TimeDelta::try_weeks(n)?),
            Self::Month => add_months(t, n),
            Self::Year => add_months(t, n.checked_mul(12)?),
        }
    }

    /// Coarsest unit whose boundary `t` sits on.
    #[must_use]
    pub fn of_instant(t: NaiveDateTime) -> Self {
        if t.nanosecond() != 0 {
            Self::Millisecond
        } else if t.second() != 0 {
            Self::Second
        } else if t.minute() != 0 {
            Self::Minute
        } else if t.hour() != 0 {
            Self::Hour
        } else if t.day() != 1 {
            if t.weekday().num_days_from_sunday() == 0 {
                Self::Week
            } else {
                Self::Day
            }
        } else if t.month() != 1 {
            Self::Month
        } else {
            Self::Year
        }
    }
}

/// A concrete interval: `step` units of `granularity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalendarStep {
    pub granularity: TimeGranularity,
    pub step: u32,
}

impl CalendarStep {
    #[must_use]
    pub const fn new(granularity: TimeGranularity, step: u32) -> Self {
        Self { granularity, step }
    }

    /// Coarsest entry of the table, used when nothing else fits.
    #[must_use]
    pub fn coarsest() -> Self {
        let last = &CALENDAR_INTERVALS[CALENDAR_INTERVALS.len() - 1];
        Self::new(last.granularity, last.steps[last.steps.len() - 1])
    }

    /// Every table entry from finest to coarsest.
    pub fn candidates() -> impl Iterator<Item = Self> {
        CALENDAR_INTERVALS.iter().flat_map(|interval| {
            interval
                .steps
                .iter()
                .map(move |step| Self::new(interval.granularity, *step))
        })
    }

    /// Whether `t` is a boundary of this step.
    #[must_use]
    pub fn is_aligned(self, t: NaiveDateTime) -> bool {
        if self.granularity.floor(t) != t {
            return false;
        }
        let step = self.step.max(1);
        match self.granularity {
            TimeGranularity::Millisecond
            | TimeGranularity::Second
            | TimeGranularity::Minute
            | TimeGranularity::Hour => {
                let size = self.fixed_step_millis();
                t.and_utc().timestamp_millis().rem_euclid(size) == 0
            }
            TimeGranularity::Day => (t.day() - 1) % step == 0,
            TimeGranularity::Week => true,
            TimeGranularity::Month => t.month0() % step == 0,
            TimeGranularity::Year => {
                t.year().rem_euclid(i32::try_from(step).unwrap_or(i32::MAX)) == 0
            }
        }
    }

    fn fixed_step_millis(self) -> i64 {
        self.granularity.fixed_millis().unwrap_or(1) * i64::from(self.step.max(1))
    }

    /// Aligned instants `t` with `start <= t <= end`, ascending.
    ///
    /// The sequence is produced lazily, so callers that only need to know
    /// whether a step fits can stop after a few items.
    pub fn ticks(
        self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> impl Iterator<Item = NaiveDateTime> {
        let first = if start <= end {
            self.first_at_or_after(start)
        } else {
            None
        };
        iter::successors(first, move |t| self.next_after(*t)).take_while(move |t| *t <= end)
    }

    fn first_at_or_after(self, start: NaiveDateTime) -> Option<NaiveDateTime> {
        if self.granularity.fixed_millis().is_some() {
            let size = self.fixed_step_millis();
            let millis = start.and_utc().timestamp_millis();
            let mut index = millis.div_euclid(size);
            // Sub-millisecond remainders still push the start past the boundary.
            let boundary = index * size;
            if boundary < millis || (boundary == millis && start.nanosecond() % 1_000_000 != 0) {
                index += 1;
            }
            return from_epoch_millis(index.checked_mul(size)?);
        }

        let mut cursor = self.granularity.floor(start);
        if cursor < start {
            cursor = self.granularity.offset(cursor, 1)?;
        }
        while !self.is_aligned(cursor) {
            cursor = self.granularity.offset(cursor, 1)?;
        }
        Some(cursor)
    }

    fn next_after(self, t: NaiveDateTime) -> Option<NaiveDateTime> {
        match self.granularity {
            // Month lengths are not multiples of the step, so walk day by day.
            TimeGranularity::Day => {
                let mut cursor = self.granularity.offset(t, 1)?;
                while !self.is_aligned(cursor) {
                    cursor = self.granularity.offset(cursor, 1)?;
                }
                Some(cursor)
            }
            granularity => granularity.offset(t, i64::from(self.step.max(1))),
        }
    }
}

/// Picks the calendar step used to tick `[start, end]` with about `count` ticks.
///
/// Candidates are scanned finest to coarsest and the first producing between
/// one and `count` ticks wins. When the following candidates produce the same
/// number of ticks the coarsest of them is preferred.
#[must_use]
pub fn select_step(start: NaiveDateTime, end: NaiveDateTime, count: usize) -> CalendarStep {
    let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
    let limit = count.max(1);

    let mut chosen: Option<(CalendarStep, usize)> = None;
    for candidate in CalendarStep::candidates() {
        let ticks = candidate.ticks(lo, hi).take(limit + 1).count();
        match chosen {
            None if (1..=limit).contains(&ticks) => chosen = Some((candidate, ticks)),
            None => {}
            Some((_, selected)) if selected == ticks => chosen = Some((candidate, ticks)),
            Some(_) => break,
        }
    }

    match chosen {
        Some((step, ticks)) => {
            trace!(granularity = ?step.granularity, step = step.step, ticks, "selected time step");
            step
        }
        None => {
            let fallback = CalendarStep::coarsest();
            debug!(
                count,
                granularity = ?fallback.granularity,
                step = fallback.step,
                "no calendar interval fits the domain, using the coarsest"
            );
            fallback
        }
    }
}

/// Timezone alignment used for calendar boundaries and time labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TimeAxisTimeZone {
    #[default]
    Utc,
    FixedOffsetMinutes {
        minutes: i16,
    },
}

impl TimeAxisTimeZone {
    #[must_use]
    pub fn offset_minutes(self) -> i16 {
        match self {
            Self::Utc => 0,
            Self::FixedOffsetMinutes { minutes } => {
                minutes.clamp(-MAX_OFFSET_MINUTES, MAX_OFFSET_MINUTES)
            }
        }
    }

    #[must_use]
    pub fn fixed_offset(self) -> FixedOffset {
        let seconds = i32::from(self.offset_minutes()) * 60;
        FixedOffset::east_opt(seconds).unwrap_or_else(|| Utc.fix())
    }

    /// Wall-clock time of `t` in this zone.
    #[must_use]
    pub fn to_local(self, t: DateTime<Utc>) -> NaiveDateTime {
        t.with_timezone(&self.fixed_offset()).naive_local()
    }

    /// Instant whose wall-clock time in this zone is `local`.
    ///
    /// Wall-clock times whose UTC instant falls outside chrono's range are
    /// returned unshifted.
    #[must_use]
    pub fn to_utc(self, local: NaiveDateTime) -> DateTime<Utc> {
        let shift = TimeDelta::minutes(i64::from(self.offset_minutes()));
        local
            .checked_sub_signed(shift)
            .unwrap_or(local)
            .and_utc()
    }
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn add_months(t: NaiveDateTime, n: i64) -> Option<NaiveDateTime> {
    let magnitude = u32::try_from(n.unsigned_abs()).ok()?;
    if n >= 0 {
        t.checked_add_months(Months::new(magnitude))
    } else {
        t.checked_sub_months(Months::new(magnitude))
    }
}

fn from_epoch_millis(millis: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis).map(|t| t.naive_utc())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};

    use super::{CalendarStep, TimeAxisTimeZone, TimeGranularity, select_step};

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .and_then(|date| date.and_hms_milli_opt(h, mi, s, ms))
            .expect("valid timestamp")
    }

    fn day(y: i32, mo: u32, d: u32) -> NaiveDateTime {
        at(y, mo, d, 0, 0, 0, 0)
    }

    #[test]
    fn floor_truncates_to_unit_start() {
        let t = at(2020, 3, 18, 13, 47, 21, 345);
        assert_eq!(TimeGranularity::Millisecond.floor(t), t);
        assert_eq!(TimeGranularity::Second.floor(t), at(2020, 3, 18, 13, 47, 21, 0));
        assert_eq!(TimeGranularity::Minute.floor(t), at(2020, 3, 18, 13, 47, 0, 0));
        assert_eq!(TimeGranularity::Hour.floor(t), at(2020, 3, 18, 13, 0, 0, 0));
        assert_eq!(TimeGranularity::Day.floor(t), day(2020, 3, 18));
        // 2020-03-18 is a Wednesday.
        assert_eq!(TimeGranularity::Week.floor(t), day(2020, 3, 15));
        assert_eq!(TimeGranularity::Month.floor(t), day(2020, 3, 1));
        assert_eq!(TimeGranularity::Year.floor(t), day(2020, 1, 1));
    }

    #[test]
    fn offset_handles_month_ends_and_negative_steps() {
        assert_eq!(
            TimeGranularity::Month.offset(day(2020, 1, 31), 1),
            Some(day(2020, 2, 29))
        );
        assert_eq!(
            TimeGranularity::Year.offset(day(2021, 6, 1), -2),
            Some(day(2019, 6, 1))
        );
        assert_eq!(
            TimeGranularity::Hour.offset(day(2020, 1, 1), -1),
            Some(at(2019, 12, 31, 23, 0, 0, 0))
        );
    }

    #[test]
    fn of_instant_reports_coarsest_alignment() {
        assert_eq!(TimeGranularity::of_instant(day(2020, 1, 1)), TimeGranularity::Year);
        assert_eq!(TimeGranularity::of_instant(day(2020, 5, 1)), TimeGranularity::Month);
        assert_eq!(TimeGranularity::of_instant(day(2020, 1, 5)), TimeGranularity::Week);
        assert_eq!(TimeGranularity::of_instant(day(2020, 1, 6)), TimeGranularity::Day);
        assert_eq!(
            TimeGranularity::of_instant(at(2020, 1, 1, 6, 0, 0, 0)),
            TimeGranularity::Hour
        );
        assert_eq!(
            TimeGranularity::of_instant(at(2020, 1, 1, 0, 0, 0, 100)),
            TimeGranularity::Millisecond
        );
    }

    #[test]
    fn day_steps_restart_each_month() {
        let step = CalendarStep::new(TimeGranularity::Day, 2);
        let ticks: Vec<_> = step.ticks(day(2020, 1, 28), day(2020, 2, 4)).collect();
        assert_eq!(
            ticks,
            vec![day(2020, 1, 29), day(2020, 1, 31), day(2020, 2, 1), day(2020, 2, 3)]
        );
    }

    #[test]
    fn week_ticks_land_on_sundays() {
        let step = CalendarStep::new(TimeGranularity::Week, 1);
        let ticks: Vec<_> = step.ticks(day(2020, 1, 1), day(2020, 1, 31)).collect();
        assert_eq!(
            ticks,
            vec![day(2020, 1, 5), day(2020, 1, 12), day(2020, 1, 19), day(2020, 1, 26)]
        );
    }

    #[test]
    fn fixed_steps_align_to_epoch_multiples() {
        let step = CalendarStep::new(TimeGranularity::Minute, 15);
        let ticks: Vec<_> = step
            .ticks(at(2020, 1, 1, 10, 7, 0, 0), at(2020, 1, 1, 11, 0, 0, 0))
            .collect();
        assert_eq!(
            ticks,
            vec![
                at(2020, 1, 1, 10, 15, 0, 0),
                at(2020, 1, 1, 10, 30, 0, 0),
                at(2020, 1, 1, 10, 45, 0, 0),
                at(2020, 1, 1, 11, 0, 0, 0),
            ]
        );
    }

    #[test]
    fn select_step_matches_reference_spans() {
        let cases = [
            (day(2020, 1, 1), at(2020, 1, 1, 0, 0, 4, 0), 5, TimeGranularity::Second, 1),
            (day(2020, 1, 1), at(2020, 1, 1, 0, 5, 0, 0), 6, TimeGranularity::Minute, 1),
            (day(2020, 1, 1), at(2020, 1, 1, 4, 0, 0, 0), 5, TimeGranularity::Hour, 1),
            (day(2020, 1, 1), day(2020, 1, 5), 5, TimeGranularity::Day, 1),
            (day(2020, 1, 1), day(2020, 5, 1), 5, TimeGranularity::Month, 1),
            (day(2020, 1, 1), day(2024, 1, 1), 5, TimeGranularity::Year, 1),
            (day(2020, 1, 1), at(2020, 1, 1, 0, 0, 0, 500), 6, TimeGranularity::Millisecond, 100),
            (day(2020, 1, 1), day(2020, 1, 2), 5, TimeGranularity::Hour, 6),
        ];
        for (start, end, count, granularity, step) in cases {
            assert_eq!(
                select_step(start, end, count),
                CalendarStep::new(granularity, step),
                "{start} .. {end} with {count} ticks"
            );
        }
    }

    #[test]
    fn select_step_is_direction_agnostic() {
        assert_eq!(
            select_step(day(2024, 1, 1), day(2020, 1, 1), 5),
            CalendarStep::new(TimeGranularity::Year, 1)
        );
    }

    #[test]
    fn select_step_falls_back_to_coarsest() {
        // Sub-millisecond domain between two millisecond boundaries.
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).expect("date");
        let start = date.and_hms_nano_opt(0, 0, 0, 100_000).expect("start");
        let end = date.and_hms_nano_opt(0, 0, 0, 900_000).expect("end");
        assert_eq!(select_step(start, end, 5), CalendarStep::coarsest());
    }

    #[test]
    fn fixed_offset_zone_shifts_wall_clock() {
        let zone = TimeAxisTimeZone::FixedOffsetMinutes { minutes: -300 };
        let instant = Utc.with_ymd_and_hms(2020, 1, 1, 5, 0, 0).single().expect("instant");
        assert_eq!(zone.to_local(instant), day(2020, 1, 1));
        assert_eq!(zone.to_utc(day(2020, 1, 1)), instant);
        assert_eq!(TimeAxisTimeZone::Utc.to_local(instant), at(2020, 1, 1, 5, 0, 0, 0));
    }

    #[test]
    fn to_utc_at_range_edge_does_not_overflow() {
        let zone = TimeAxisTimeZone::FixedOffsetMinutes { minutes: -600 };
        let edge = NaiveDateTime::MAX;
        assert_eq!(zone.to_utc(edge), edge.and_utc());
        let zone = TimeAxisTimeZone::FixedOffsetMinutes { minutes: 600 };
        assert_eq!(zone.to_utc(NaiveDateTime::MIN), NaiveDateTime::MIN.and_utc());
    }
}
