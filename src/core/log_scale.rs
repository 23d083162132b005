use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::interval::Interval;
use crate::core::nice::{self, NiceStep};
use crate::error::{AxisError, AxisResult};

pub const DEFAULT_LOG_BASE: f64 = 10.0;

const LADDER_MULTIPLIERS: [u32; 3] = [1, 2, 5];
const CANDIDATE_TOLERANCE: f64 = 1e-12;

/// Logarithmic scale over a domain that is strictly positive or strictly negative.
///
/// Negative domains are handled by mirroring: `-x` is mapped with the same
/// transform as `x` and the result negated in log space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogScale {
    domain: Interval,
    range: Interval,
    base: f64,
}

impl LogScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> AxisResult<Self> {
        let domain = Interval::new(domain.0, domain.1)?;
        let range = Interval::range(range.0, range.1)?;
        let positive = domain.start > 0.0 && domain.end > 0.0;
        let negative = domain.start < 0.0 && domain.end < 0.0;
        if !positive && !negative {
            return Err(AxisError::InvalidDomain(format!(
                "log domain [{}, {}] must not include or cross zero",
                domain.start, domain.end
            )));
        }
        Ok(Self {
            domain,
            range,
            base: DEFAULT_LOG_BASE,
        })
    }

    /// Sets the logarithm base.
    pub fn with_base(mut self, base: f64) -> AxisResult<Self> {
        if !base.is_finite() || base <= 0.0 || base == 1.0 {
            return Err(AxisError::InvalidParameter(format!(
                "log base must be finite, > 0 and != 1, got {base}"
            )));
        }
        self.base = base;
        Ok(self)
    }

    #[must_use]
    pub fn base(self) -> f64 {
        self.base
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        self.domain.as_tuple()
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.range.as_tuple()
    }

    fn is_negative(self) -> bool {
        self.domain.start < 0.0
    }

    fn log(self, x: f64) -> f64 {
        if self.base == 10.0 {
            x.log10()
        } else if self.base == 2.0 {
            x.log2()
        } else {
            x.ln() / self.base.ln()
        }
    }

    fn pow(self, exponent: f64) -> f64 {
        if exponent.fract() == 0.0 && exponent.abs() <= f64::from(i32::MAX) {
            return self.base.powi(exponent as i32);
        }
        self.base.powf(exponent)
    }

    fn transform(self, x: f64) -> f64 {
        if self.is_negative() {
            -self.log(-x)
        } else {
            self.log(x)
        }
    }

    fn untransform(self, y: f64) -> f64 {
        if self.is_negative() {
            -self.pow(-y)
        } else {
            self.pow(y)
        }
    }

    /// Maps `value` into the range.
    ///
    /// Values on the wrong side of zero have no logarithm and map to `NaN`.
    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let same_sign = if self.is_negative() { value < 0.0 } else { value > 0.0 };
        if !same_sign {
            return f64::NAN;
        }
        let (t0, t1) = (self.transform(self.domain.start), self.transform(self.domain.end));
        if t0 == t1 {
            return self.range.start;
        }
        let t = (self.transform(value) - t0) / (t1 - t0);
        self.range.interpolate(t)
    }

    pub fn invert(self, position: f64) -> AxisResult<f64> {
        if self.domain.is_degenerate() {
            return Err(AxisError::InvertUndefined(
                "log domain has zero span".to_owned(),
            ));
        }
        if !position.is_finite() {
            return Err(AxisError::InvalidParameter(
                "position must be finite".to_owned(),
            ));
        }
        let Some(t) = self.range.normalize(position) else {
            return Ok(self.domain.start);
        };
        let (t0, t1) = (self.transform(self.domain.start), self.transform(self.domain.end));
        Ok(self.untransform(t0 + t * (t1 - t0)))
    }

    /// Tick values in domain direction.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        if self.domain.is_degenerate() {
            debug!(value = self.domain.start, "zero-span log domain, emitting a single tick");
            return vec![self.domain.start];
        }

        let count = count.max(1);
        let (lo, hi) = (self.domain.min().abs(), self.domain.max().abs());
        let (u, v) = (lo.min(hi), lo.max(hi));

        let mut ticks = self.positive_ticks(u, v, count);
        if self.is_negative() {
            ticks.iter_mut().for_each(|tick| *tick = -*tick);
        }
        ticks.sort_by_key(|tick| OrderedFloat(*tick));
        if self.domain.is_reversed() {
            ticks.reverse();
        }
        ticks
    }

    fn positive_ticks(self, u: f64, v: f64, count: usize) -> Vec<f64> {
        let i = self.log(u);
        let j = self.log(v);
        let decades = j - i;

        let integral_base = self.base.fract() == 0.0
            && self.base >= 2.0
            && self.base <= f64::from(u16::MAX);
        if integral_base && decades < count as f64 {
            return self.ladder_ticks(u, v, i, j, count);
        }

        let exponent_count = decades.min(count as f64);
        let Some(step) = NiceStep::for_raw(decades / exponent_count) else {
            return vec![u];
        };
        nice::ticks_for_step(i, j, step)
            .into_iter()
            .map(|exponent| self.pow(exponent))
            .collect()
    }

    /// `k * base^e` candidates, thinned to the 1-2-5 ladder and then to
    /// exact powers while there are more than `2 * count` of them.
    fn ladder_ticks(self, u: f64, v: f64, i: f64, j: f64, count: usize) -> Vec<f64> {
        let base = self.base as u32;
        let first = i.floor() as i32;
        let last = j.ceil() as i32;

        let mut candidates: Vec<(u32, f64)> = Vec::new();
        for exponent in first..=last {
            for k in 1..base {
                let value = if exponent >= 0 {
                    f64::from(k) * self.base.powi(exponent)
                } else {
                    f64::from(k) / self.base.powi(-exponent)
                };
                if value >= u * (1.0 - CANDIDATE_TOLERANCE) && value <= v * (1.0 + CANDIDATE_TOLERANCE)
                {
                    candidates.push((k, value));
                }
            }
        }

        let limit = count.saturating_mul(2);
        if candidates.len() > limit && base > 5 {
            let before = candidates.len();
            candidates.retain(|(k, _)| LADDER_MULTIPLIERS.contains(k));
            debug!(before, after = candidates.len(), "thinned log ticks to 1-2-5 ladder");
        }
        if candidates.len() > limit {
            let before = candidates.len();
            candidates.retain(|(k, _)| *k == 1);
            debug!(before, after = candidates.len(), "thinned log ticks to powers");
        }

        candidates.into_iter().map(|(_, value)| value).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::LogScale;
    use crate::error::AxisError;

    #[test]
    fn decades_thin_to_powers() {
        let scale = LogScale::new((1.0, 1000.0), (0.0, 300.0)).expect("scale");
        assert_eq!(scale.ticks(4), vec![1.0, 10.0, 100.0, 1000.0]);
        let positions: Vec<f64> = scale.ticks(4).into_iter().map(|v| scale.map(v)).collect();
        for (actual, expected) in positions.iter().zip([0.0, 100.0, 200.0, 300.0]) {
            assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
        }
    }

    #[test]
    fn narrow_domain_keeps_all_multipliers() {
        let scale = LogScale::new((1.0, 10.0), (0.0, 100.0)).expect("scale");
        assert_eq!(
            scale.ticks(10),
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]
        );
    }

    #[test]
    fn ladder_keeps_one_two_five() {
        let scale = LogScale::new((1.0, 1000.0), (0.0, 300.0)).expect("scale");
        assert_eq!(
            scale.ticks(5),
            vec![1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0, 200.0, 500.0, 1000.0]
        );
    }

    #[test]
    fn wide_domain_uses_nice_exponents() {
        let scale = LogScale::new((1.0, 1e10), (0.0, 100.0)).expect("scale");
        assert_eq!(scale.ticks(5), vec![1.0, 100.0, 1e4, 1e6, 1e8, 1e10]);
    }

    #[test]
    fn negative_domain_mirrors_positive() {
        let scale = LogScale::new((-1000.0, -1.0), (0.0, 300.0)).expect("scale");
        assert_eq!(scale.ticks(4), vec![-1000.0, -100.0, -10.0, -1.0]);
        assert!((scale.map(-10.0) - 200.0).abs() < 1e-9);
        assert!((scale.invert(100.0).expect("invert") + 100.0).abs() < 1e-9);
    }

    #[test]
    fn reversed_domain_reverses_ticks() {
        let scale = LogScale::new((1000.0, 1.0), (0.0, 300.0)).expect("scale");
        assert_eq!(scale.ticks(4), vec![1000.0, 100.0, 10.0, 1.0]);
    }

    #[test]
    fn base_two_ticks_are_powers() {
        let scale = LogScale::new((1.0, 16.0), (0.0, 100.0))
            .expect("scale")
            .with_base(2.0)
            .expect("base");
        assert_eq!(scale.ticks(10), vec![1.0, 2.0, 4.0, 8.0, 16.0]);
    }

    #[test]
    fn domain_touching_zero_is_rejected() {
        assert!(matches!(
            LogScale::new((0.0, 10.0), (0.0, 1.0)),
            Err(AxisError::InvalidDomain(_))
        ));
        assert!(matches!(
            LogScale::new((-1.0, 10.0), (0.0, 1.0)),
            Err(AxisError::InvalidDomain(_))
        ));
    }

    #[test]
    fn invalid_bases_are_rejected() {
        let scale = LogScale::new((1.0, 10.0), (0.0, 1.0)).expect("scale");
        for base in [1.0, 0.0, -2.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                scale.with_base(base),
                Err(AxisError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn degenerate_domain_yields_single_tick() {
        let scale = LogScale::new((5.0, 5.0), (0.0, 100.0)).expect("scale");
        assert_eq!(scale.ticks(5), vec![5.0]);
        assert_eq!(scale.map(5.0), 0.0);
        assert!(matches!(scale.invert(1.0), Err(AxisError::InvertUndefined(_))));
    }

    #[test]
    fn out_of_sign_values_map_to_nan() {
        let scale = LogScale::new((1.0, 10.0), (0.0, 100.0)).expect("scale");
        assert!(scale.map(0.0).is_nan());
        assert!(scale.map(-3.0).is_nan());
    }
}
