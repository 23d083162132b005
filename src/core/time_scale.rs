use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::calendar::{self, CalendarStep, TimeAxisTimeZone, TimeGranularity};
use crate::core::interval::Interval;
use crate::error::{AxisError, AxisResult};

/// Continuous scale over instants with calendar-aligned ticks.
///
/// Mapping is linear in epoch milliseconds. Tick alignment and granularity
/// selection happen in the wall-clock time of the configured zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    domain: (DateTime<Utc>, DateTime<Utc>),
    range: Interval,
    #[serde(default)]
    time_zone: TimeAxisTimeZone,
}

impl TimeScale {
    pub fn new(domain: (DateTime<Utc>, DateTime<Utc>), range: (f64, f64)) -> AxisResult<Self> {
        let range = Interval::range(range.0, range.1)?;
        Ok(Self {
            domain,
            range,
            time_zone: TimeAxisTimeZone::Utc,
        })
    }

    #[must_use]
    pub fn with_time_zone(mut self, time_zone: TimeAxisTimeZone) -> Self {
        self.time_zone = time_zone;
        self
    }

    #[must_use]
    pub fn domain(self) -> (DateTime<Utc>, DateTime<Utc>) {
        self.domain
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.range.as_tuple()
    }

    #[must_use]
    pub fn time_zone(self) -> TimeAxisTimeZone {
        self.time_zone
    }

    fn millis_domain(self) -> (f64, f64) {
        (epoch_millis(self.domain.0), epoch_millis(self.domain.1))
    }

    fn local_bounds(self) -> (NaiveDateTime, NaiveDateTime) {
        let (a, b) = (self.time_zone.to_local(self.domain.0), self.time_zone.to_local(self.domain.1));
        if a <= b { (a, b) } else { (b, a) }
    }

    #[must_use]
    pub fn map(self, value: DateTime<Utc>) -> f64 {
        let (d0, d1) = self.millis_domain();
        if d0 == d1 {
            return self.range.start;
        }
        self.range.interpolate((epoch_millis(value) - d0) / (d1 - d0))
    }

    pub fn invert(self, position: f64) -> AxisResult<DateTime<Utc>> {
        let (d0, d1) = self.millis_domain();
        if d0 == d1 {
            return Err(AxisError::InvertUndefined(
                "time domain has zero duration".to_owned(),
            ));
        }
        if !position.is_finite() {
            return Err(AxisError::InvalidParameter(
                "position must be finite".to_owned(),
            ));
        }
        let Some(t) = self.range.normalize(position) else {
            return Ok(self.domain.0);
        };
        let millis = (d0 + t * (d1 - d0)).round();
        DateTime::from_timestamp_millis(millis as i64).ok_or_else(|| {
            AxisError::InvalidParameter(format!("position {position} maps outside chrono range"))
        })
    }

    /// Calendar interval used for `count` requested ticks.
    #[must_use]
    pub fn tick_step(self, count: usize) -> CalendarStep {
        let (lo, hi) = self.local_bounds();
        calendar::select_step(lo, hi, count)
    }

    /// Granularity that labels for `count` requested ticks should show.
    ///
    /// A zero-duration domain reports the coarsest unit its single instant
    /// is aligned to.
    #[must_use]
    pub fn tick_granularity(self, count: usize) -> TimeGranularity {
        if self.domain.0 == self.domain.1 {
            return TimeGranularity::of_instant(self.time_zone.to_local(self.domain.0));
        }
        self.tick_step(count).granularity
    }

    /// Calendar-aligned tick instants in domain direction.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<DateTime<Utc>> {
        if self.domain.0 == self.domain.1 {
            debug!(instant = %self.domain.0, "zero-duration time domain, emitting a single tick");
            return vec![self.domain.0];
        }

        let (lo, hi) = self.local_bounds();
        let step = calendar::select_step(lo, hi, count);
        let mut ticks: Vec<DateTime<Utc>> = step
            .ticks(lo, hi)
            .map(|local| self.time_zone.to_utc(local))
            .collect();
        trace!(
            granularity = ?step.granularity,
            step = step.step,
            ticks = ticks.len(),
            "generated time ticks"
        );
        if self.domain.0 > self.domain.1 {
            ticks.reverse();
        }
        ticks
    }
}

/// Milliseconds since the Unix epoch, keeping sub-millisecond precision.
#[must_use]
pub fn epoch_millis(t: DateTime<Utc>) -> f64 {
    let sub_millis = f64::from(t.timestamp_subsec_nanos() % 1_000_000) / 1_000_000.0;
    t.timestamp_millis() as f64 + sub_millis
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use super::TimeScale;
    use crate::core::calendar::{TimeAxisTimeZone, TimeGranularity};
    use crate::error::AxisError;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).single().expect("valid instant")
    }

    #[test]
    fn four_second_span_ticks_every_second() {
        let scale =
            TimeScale::new((utc(2020, 1, 1, 0, 0, 0), utc(2020, 1, 1, 0, 0, 4)), (0.0, 100.0))
                .expect("scale");
        let ticks = scale.ticks(5);
        assert_eq!(ticks.len(), 5);
        assert_eq!(ticks[1], utc(2020, 1, 1, 0, 0, 1));
        let positions: Vec<f64> = ticks.iter().map(|t| scale.map(*t)).collect();
        assert_eq!(positions, vec![0.0, 25.0, 50.0, 75.0, 100.0]);
        assert_eq!(scale.tick_granularity(5), TimeGranularity::Second);
    }

    #[test]
    fn reversed_domain_gives_descending_ticks() {
        let scale = TimeScale::new((utc(2024, 1, 1, 0, 0, 0), utc(2020, 1, 1, 0, 0, 0)), (0.0, 100.0))
            .expect("scale");
        let ticks = scale.ticks(5);
        assert_eq!(ticks.first(), Some(&utc(2024, 1, 1, 0, 0, 0)));
        assert_eq!(ticks.last(), Some(&utc(2020, 1, 1, 0, 0, 0)));
        assert_eq!(ticks.len(), 5);
    }

    #[test]
    fn zero_duration_domain_yields_single_tick() {
        let instant = utc(2020, 6, 15, 12, 0, 0);
        let scale = TimeScale::new((instant, instant), (0.0, 100.0)).expect("scale");
        assert_eq!(scale.ticks(5), vec![instant]);
        assert_eq!(scale.map(instant), 0.0);
        assert_eq!(scale.tick_granularity(5), TimeGranularity::Hour);
        assert!(matches!(scale.invert(50.0), Err(AxisError::InvertUndefined(_))));
    }

    #[test]
    fn invert_round_trips_to_the_millisecond() {
        let scale = TimeScale::new((utc(2020, 1, 1, 0, 0, 0), utc(2020, 1, 2, 0, 0, 0)), (0.0, 240.0))
            .expect("scale");
        assert_eq!(scale.invert(60.0).expect("invert"), utc(2020, 1, 1, 6, 0, 0));
    }

    #[test]
    fn fixed_offset_aligns_to_local_midnight() {
        let zone = TimeAxisTimeZone::FixedOffsetMinutes { minutes: 120 };
        let scale = TimeScale::new((utc(2020, 1, 1, 0, 0, 0), utc(2020, 1, 5, 0, 0, 0)), (0.0, 100.0))
            .expect("scale")
            .with_time_zone(zone);
        let ticks = scale.ticks(5);
        // Local midnight at UTC+2 is 22:00 UTC on the previous day.
        assert_eq!(ticks.first(), Some(&utc(2020, 1, 1, 22, 0, 0)));
        assert!(ticks.iter().all(|t| zone.to_local(*t).time() == chrono::NaiveTime::MIN));
    }
}
