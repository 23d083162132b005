use serde::{Deserialize, Serialize};

use crate::core::band_scale::BandScale;
use crate::core::linear_scale::LinearScale;
use crate::core::log_scale::LogScale;
use crate::core::time_scale::TimeScale;
use crate::core::types::TickValue;
use crate::error::{AxisError, AxisResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScaleKind {
    Linear,
    Log,
    Time,
    Band,
}

/// Any of the supported scale families behind one interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scale {
    Linear(LinearScale),
    Log(LogScale),
    Time(TimeScale),
    Band(BandScale),
}

impl Scale {
    #[must_use]
    pub fn kind(&self) -> ScaleKind {
        match self {
            Self::Linear(_) => ScaleKind::Linear,
            Self::Log(_) => ScaleKind::Log,
            Self::Time(_) => ScaleKind::Time,
            Self::Band(_) => ScaleKind::Band,
        }
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Linear(scale) => scale.range(),
            Self::Log(scale) => scale.range(),
            Self::Time(scale) => scale.range(),
            Self::Band(scale) => scale.range(),
        }
    }

    /// Position of `value` in the output range.
    ///
    /// Fails when the value kind does not belong to this scale family, when a
    /// band key is unknown, or when a log scale is given a value on the wrong
    /// side of zero.
    pub fn map(&self, value: &TickValue) -> AxisResult<f64> {
        match (self, value) {
            (Self::Linear(scale), TickValue::Number(number)) => Ok(scale.map(*number)),
            (Self::Log(scale), TickValue::Number(number)) => {
                let position = scale.map(*number);
                if position.is_nan() {
                    return Err(AxisError::InvalidDomain(format!(
                        "{number} has no logarithm in domain {:?}",
                        scale.domain()
                    )));
                }
                Ok(position)
            }
            (Self::Time(scale), TickValue::Time(instant)) => Ok(scale.map(*instant)),
            (Self::Band(scale), TickValue::Key(key)) => scale
                .map(key)
                .ok_or_else(|| AxisError::InvalidDomain(format!("unknown band key `{key}`"))),
            (scale, value) => Err(AxisError::InvalidDomain(format!(
                "{} value cannot be mapped by a {:?} scale",
                value.kind_name(),
                scale.kind()
            ))),
        }
    }

    pub fn invert(&self, position: f64) -> AxisResult<TickValue> {
        match self {
            Self::Linear(scale) => scale.invert(position).map(TickValue::Number),
            Self::Log(scale) => scale.invert(position).map(TickValue::Number),
            Self::Time(scale) => scale.invert(position).map(TickValue::Time),
            Self::Band(_) => Err(AxisError::InvertUndefined(
                "band scales are not invertible".to_owned(),
            )),
        }
    }

    /// Tick values for about `count` ticks. Band scales return every key.
    #[must_use]
    pub fn tick_values(&self, count: usize) -> Vec<TickValue> {
        match self {
            Self::Linear(scale) => scale.ticks(count).into_iter().map(TickValue::Number).collect(),
            Self::Log(scale) => scale.ticks(count).into_iter().map(TickValue::Number).collect(),
            Self::Time(scale) => scale.ticks(count).into_iter().map(TickValue::Time).collect(),
            Self::Band(scale) => scale.domain().iter().cloned().map(TickValue::Key).collect(),
        }
    }

    /// Shift applied to tick positions so band ticks sit at band centres.
    #[must_use]
    pub fn tick_offset(&self) -> f64 {
        match self {
            Self::Band(scale) => scale.bandwidth() / 2.0,
            Self::Linear(_) | Self::Log(_) | Self::Time(_) => 0.0,
        }
    }
}

impl From<LinearScale> for Scale {
    fn from(scale: LinearScale) -> Self {
        Self::Linear(scale)
    }
}

impl From<LogScale> for Scale {
    fn from(scale: LogScale) -> Self {
        Self::Log(scale)
    }
}

impl From<TimeScale> for Scale {
    fn from(scale: TimeScale) -> Self {
        Self::Time(scale)
    }
}

impl From<BandScale> for Scale {
    fn from(scale: BandScale) -> Self {
        Self::Band(scale)
    }
}
