use serde::{Deserialize, Serialize};

use crate::error::{AxisError, AxisResult};

pub const DEFAULT_TICK_COUNT: usize = 10;
pub const DEFAULT_TICK_SIZE_INNER: f64 = 6.0;
pub const DEFAULT_TICK_PADDING: f64 = 3.0;

/// Side of the plot the axis is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AxisOrientation {
    Top,
    Right,
    #[default]
    Bottom,
    Left,
}

impl AxisOrientation {
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// `+1` when marks grow away from the origin (bottom, right), else `-1`.
    #[must_use]
    pub fn direction(self) -> f64 {
        match self {
            Self::Bottom | Self::Right => 1.0,
            Self::Top | Self::Left => -1.0,
        }
    }

    #[must_use]
    pub fn text_anchor(self) -> &'static str {
        match self {
            Self::Top | Self::Bottom => "middle",
            Self::Left => "end",
            Self::Right => "start",
        }
    }

    #[must_use]
    pub fn dy(self) -> &'static str {
        match self {
            Self::Bottom => "0.71em",
            Self::Top => "0em",
            Self::Left | Self::Right => "0.32em",
        }
    }
}

/// Tick geometry shared by all axis orientations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisConfig {
    pub tick_count: usize,
    pub tick_size_inner: f64,
    pub tick_padding: f64,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            tick_count: DEFAULT_TICK_COUNT,
            tick_size_inner: DEFAULT_TICK_SIZE_INNER,
            tick_padding: DEFAULT_TICK_PADDING,
        }
    }
}

impl AxisConfig {
    pub fn validate(self) -> AxisResult<Self> {
        if !self.tick_size_inner.is_finite() {
            return Err(AxisError::InvalidParameter(format!(
                "tick size must be finite, got {}",
                self.tick_size_inner
            )));
        }
        if !self.tick_padding.is_finite() || self.tick_padding < 0.0 {
            return Err(AxisError::InvalidParameter(format!(
                "tick padding must be finite and >= 0, got {}",
                self.tick_padding
            )));
        }
        Ok(self)
    }

    /// Signed distance from the axis line to the end of a tick mark.
    #[must_use]
    pub fn mark_length(self, orientation: AxisOrientation) -> f64 {
        orientation.direction() * self.tick_size_inner
    }

    /// Signed distance from the axis line to the label anchor.
    #[must_use]
    pub fn text_offset(self, orientation: AxisOrientation) -> f64 {
        orientation.direction() * (self.tick_size_inner.max(0.0) + self.tick_padding)
    }
}

#[cfg(test)]
mod tests {
    use super::{AxisConfig, AxisOrientation};
    use crate::error::AxisError;

    #[test]
    fn defaults_produce_reference_geometry() {
        let config = AxisConfig::default();
        assert_eq!(config.tick_count, 10);
        assert_eq!(config.mark_length(AxisOrientation::Bottom), 6.0);
        assert_eq!(config.text_offset(AxisOrientation::Bottom), 9.0);
        assert_eq!(config.mark_length(AxisOrientation::Left), -6.0);
        assert_eq!(config.text_offset(AxisOrientation::Top), -9.0);
    }

    #[test]
    fn validate_rejects_bad_geometry() {
        let bad_size = AxisConfig {
            tick_size_inner: f64::NAN,
            ..AxisConfig::default()
        };
        assert!(matches!(bad_size.validate(), Err(AxisError::InvalidParameter(_))));
        let bad_padding = AxisConfig {
            tick_padding: -1.0,
            ..AxisConfig::default()
        };
        assert!(matches!(bad_padding.validate(), Err(AxisError::InvalidParameter(_))));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: AxisConfig = serde_json::from_str(r#"{"tick_count":5}"#).expect("config");
        assert_eq!(config.tick_count, 5);
        assert_eq!(config.tick_size_inner, 6.0);
    }

    #[test]
    fn orientation_text_attributes() {
        assert_eq!(AxisOrientation::Bottom.dy(), "0.71em");
        assert_eq!(AxisOrientation::Top.dy(), "0em");
        assert_eq!(AxisOrientation::Left.text_anchor(), "end");
        assert_eq!(AxisOrientation::Right.text_anchor(), "start");
        assert!(!AxisOrientation::Right.is_horizontal());
    }
}
