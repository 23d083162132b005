use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::interval::{ContinuousMap, Interval};
use crate::core::nice::{self, NiceStep};
use crate::error::{AxisError, AxisResult};

/// Continuous scale with an affine domain-to-range mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    map: ContinuousMap,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> AxisResult<Self> {
        let domain = Interval::new(domain.0, domain.1)?;
        let range = Interval::range(range.0, range.1)?;
        Ok(Self {
            map: ContinuousMap::new(domain, range),
        })
    }

    #[must_use]
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.map = self.map.with_clamp(clamp);
        self
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        self.map.domain().as_tuple()
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.map.range().as_tuple()
    }

    #[must_use]
    pub fn is_clamped(self) -> bool {
        self.map.is_clamped()
    }

    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        self.map.map(value)
    }

    pub fn invert(self, position: f64) -> AxisResult<f64> {
        self.map.invert(position)
    }

    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        let (start, end) = self.domain();
        if start == end {
            debug!(value = start, "zero-span linear domain, emitting a single tick");
        }
        nice::nice_ticks(start, end, count)
    }

    #[must_use]
    pub fn tick_step(self, count: usize) -> Option<NiceStep> {
        let (start, end) = self.domain();
        nice::tick_step(start, end, count)
    }

    /// Decimal places needed to label [`LinearScale::ticks`] without loss.
    #[must_use]
    pub fn tick_precision(self, count: usize) -> u8 {
        self.tick_step(count).map_or(0, nice::step_precision)
    }

    /// Returns a copy whose domain is extended to nice round bounds.
    pub fn nice(self, count: usize) -> AxisResult<Self> {
        let (start, end) = self.domain();
        let (start, end) = nice::nice_domain(start, end, count);
        let domain = Interval::new(start, end).map_err(|_| {
            AxisError::InvalidDomain(format!("cannot nice domain [{start}, {end}]"))
        })?;
        Ok(Self {
            map: ContinuousMap::new(domain, self.map.range()).with_clamp(self.is_clamped()),
        })
    }
}
