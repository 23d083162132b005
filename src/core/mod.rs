pub mod band_scale;
pub mod calendar;
pub mod interval;
pub mod linear_scale;
pub mod log_scale;
pub mod nice;
pub mod scale;
pub mod time_scale;
pub mod types;

pub use band_scale::{BandLayout, BandScale};
pub use calendar::{
    CALENDAR_INTERVALS, CalendarInterval, CalendarStep, TimeAxisTimeZone, TimeGranularity,
};
pub use interval::{ContinuousMap, Interval};
pub use linear_scale::LinearScale;
pub use log_scale::{DEFAULT_LOG_BASE, LogScale};
pub use nice::{NiceStep, nice_domain, nice_ticks};
pub use scale::{Scale, ScaleKind};
pub use time_scale::TimeScale;
pub use types::{Tick, TickValue};
