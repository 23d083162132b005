use serde::{Deserialize, Serialize};

use crate::error::{AxisError, AxisResult};

/// Directed pair of finite bounds.
///
/// `start` is not required to be below `end`: domains and ranges keep the
/// direction they were authored with so `domain.start` always maps onto
/// `range.start`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    pub fn new(start: f64, end: f64) -> AxisResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(AxisError::InvalidDomain(
                "interval bounds must be finite".to_owned(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Same as [`Interval::new`] but reports failures as range errors.
    pub fn range(start: f64, end: f64) -> AxisResult<Self> {
        Self::new(start, end).map_err(|_| {
            AxisError::InvalidRange("range bounds must be finite".to_owned())
        })
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.end - self.start
    }

    #[must_use]
    pub fn is_degenerate(self) -> bool {
        self.start == self.end
    }

    #[must_use]
    pub fn is_reversed(self) -> bool {
        self.start > self.end
    }

    #[must_use]
    pub fn min(self) -> f64 {
        self.start.min(self.end)
    }

    #[must_use]
    pub fn max(self) -> f64 {
        self.start.max(self.end)
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value >= self.min() && value <= self.max()
    }

    #[must_use]
    pub fn interpolate(self, t: f64) -> f64 {
        self.start + t * (self.end - self.start)
    }

    /// Position of `value` inside the interval as a `0..=1` parameter.
    ///
    /// Returns `None` for zero-span intervals.
    #[must_use]
    pub fn normalize(self, value: f64) -> Option<f64> {
        let span = self.span();
        if span == 0.0 {
            return None;
        }
        Some((value - self.start) / span)
    }

    #[must_use]
    pub fn as_tuple(self) -> (f64, f64) {
        (self.start, self.end)
    }
}

/// Affine mapping between a continuous domain and an output range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContinuousMap {
    domain: Interval,
    range: Interval,
    #[serde(default)]
    clamp: bool,
}

impl ContinuousMap {
    #[must_use]
    pub fn new(domain: Interval, range: Interval) -> Self {
        Self {
            domain,
            range,
            clamp: false,
        }
    }

    #[must_use]
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    #[must_use]
    pub fn domain(self) -> Interval {
        self.domain
    }

    #[must_use]
    pub fn range(self) -> Interval {
        self.range
    }

    #[must_use]
    pub fn is_clamped(self) -> bool {
        self.clamp
    }

    /// Maps a domain value into the range.
    ///
    /// A zero-span domain maps every input onto `range.start`.
    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let Some(mut t) = self.domain.normalize(value) else {
            return self.range.start;
        };
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        self.range.interpolate(t)
    }

    /// Maps a range position back into the domain.
    pub fn invert(self, position: f64) -> AxisResult<f64> {
        if self.domain.is_degenerate() {
            return Err(AxisError::InvertUndefined(
                "domain has zero span".to_owned(),
            ));
        }
        if !position.is_finite() {
            return Err(AxisError::InvalidParameter(
                "position must be finite".to_owned(),
            ));
        }

        let Some(mut t) = self.range.normalize(position) else {
            return Ok(self.domain.start);
        };
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        Ok(self.domain.interpolate(t))
    }
}
