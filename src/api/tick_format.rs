use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::types::iso_millis;
use crate::core::{Scale, TickValue, TimeAxisTimeZone, TimeGranularity};
use crate::error::{AxisError, AxisResult};

pub type TickFormatterFn = Arc<dyn Fn(&TickValue) -> String + Send + Sync + 'static>;

const MAX_FIXED_PRECISION: u8 = 20;

/// How numeric tick values are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NumberFormat {
    /// Shortest decimal that round-trips, without trailing zeros.
    #[default]
    Shortest,
    Fixed { precision: u8 },
}

impl NumberFormat {
    pub fn fixed(precision: u8) -> AxisResult<Self> {
        if precision > MAX_FIXED_PRECISION {
            return Err(AxisError::InvalidParameter(format!(
                "fixed precision must be <= {MAX_FIXED_PRECISION}, got {precision}"
            )));
        }
        Ok(Self::Fixed { precision })
    }

    #[must_use]
    pub fn format(self, value: f64) -> String {
        match self {
            Self::Shortest => shortest_decimal(value),
            Self::Fixed { precision } => {
                if !value.is_finite() {
                    return shortest_decimal(value);
                }
                let precision = usize::from(precision.min(MAX_FIXED_PRECISION));
                strip_negative_zero(format!("{value:.precision$}"))
            }
        }
    }
}

/// Shortest round-tripping decimal form of `value`.
///
/// Never uses exponent notation and prints negative zero as `0`. Non-finite
/// values print as `NaN`, `inf` and `-inf`.
#[must_use]
pub fn shortest_decimal(value: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    value.to_string()
}

fn strip_negative_zero(text: String) -> String {
    match text.strip_prefix('-') {
        Some(rest) if rest.bytes().all(|b| b == b'0' || b == b'.') => rest.to_owned(),
        _ => text,
    }
}

/// Calendar label layouts for time ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeLabelPattern {
    SubSecond,
    Second,
    HourMinute,
    MonthDay,
    Weekday,
    MonthName,
    Year,
}

impl TimeLabelPattern {
    #[must_use]
    pub fn for_granularity(granularity: TimeGranularity) -> Self {
        match granularity {
            TimeGranularity::Millisecond => Self::SubSecond,
            TimeGranularity::Second => Self::Second,
            TimeGranularity::Minute | TimeGranularity::Hour => Self::HourMinute,
            TimeGranularity::Day => Self::MonthDay,
            TimeGranularity::Week => Self::Weekday,
            TimeGranularity::Month => Self::MonthName,
            TimeGranularity::Year => Self::Year,
        }
    }

    /// `chrono` format string for the pattern.
    #[must_use]
    pub fn format_str(self) -> &'static str {
        match self {
            Self::SubSecond => "%H:%M:%S%.3f",
            Self::Second => "%H:%M:%S",
            Self::HourMinute => "%H:%M",
            Self::MonthDay => "%m/%d",
            Self::Weekday => "%a",
            Self::MonthName => "%b",
            Self::Year => "%Y",
        }
    }

    #[must_use]
    pub fn format(self, value: DateTime<Utc>, time_zone: TimeAxisTimeZone) -> String {
        value
            .with_timezone(&time_zone.fixed_offset())
            .format(self.format_str())
            .to_string()
    }
}

/// Turns tick values into label text.
#[derive(Clone)]
pub enum TickFormat {
    Number(NumberFormat),
    Time {
        pattern: TimeLabelPattern,
        time_zone: TimeAxisTimeZone,
    },
    Custom(TickFormatterFn),
}

impl Default for TickFormat {
    fn default() -> Self {
        Self::Number(NumberFormat::Shortest)
    }
}

impl fmt::Debug for TickFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(format) => f.debug_tuple("Number").field(format).finish(),
            Self::Time { pattern, time_zone } => f
                .debug_struct("Time")
                .field("pattern", pattern)
                .field("time_zone", time_zone)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl TickFormat {
    pub fn custom<F>(formatter: F) -> Self
    where
        F: Fn(&TickValue) -> String + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(formatter))
    }

    /// Formats any value. Values of a kind this format does not handle
    /// fall back to their natural text form.
    #[must_use]
    pub fn format(&self, value: &TickValue) -> String {
        match (self, value) {
            (Self::Custom(formatter), value) => formatter(value),
            (Self::Number(format), TickValue::Number(number)) => format.format(*number),
            (Self::Time { pattern, time_zone }, TickValue::Time(instant)) => {
                pattern.format(*instant, *time_zone)
            }
            (_, value) => natural_label(value),
        }
    }
}

/// Text form used when no specific format applies.
#[must_use]
pub fn natural_label(value: &TickValue) -> String {
    match value {
        TickValue::Number(number) => shortest_decimal(*number),
        TickValue::Time(instant) => iso_millis(*instant),
        TickValue::Key(key) => key.clone(),
    }
}

impl Scale {
    /// Default label format for about `count` ticks of this scale.
    ///
    /// Numbers print as their shortest decimal. Time scales follow the
    /// granularity of the selected calendar interval.
    #[must_use]
    pub fn tick_format(&self, count: usize) -> TickFormat {
        match self {
            Self::Linear(_) | Self::Log(_) | Self::Band(_) => {
                TickFormat::Number(NumberFormat::Shortest)
            }
            Self::Time(scale) => TickFormat::Time {
                pattern: TimeLabelPattern::for_granularity(scale.tick_granularity(count)),
                time_zone: scale.time_zone(),
            },
        }
    }
}
