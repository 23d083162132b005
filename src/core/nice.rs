use serde::{Deserialize, Serialize};

const NICE_MULTIPLIERS: [u32; 4] = [1, 2, 5, 10];
const END_TOLERANCE: f64 = 1e-6;
const NICE_DOMAIN_MAX_PASSES: usize = 10;

/// A "round" tick step of the form `multiplier * 10^power`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NiceStep {
    pub multiplier: u32,
    pub power: i32,
}

impl NiceStep {
    /// Picks the step for `span` split into roughly `count` intervals.
    ///
    /// The multiplier is the smallest of `{1, 2, 5, 10}` that is at least the
    /// raw step's mantissa, so the step never drops below `span / count`.
    #[must_use]
    pub fn for_span(span: f64, count: usize) -> Option<Self> {
        let span = span.abs();
        if !span.is_finite() || span == 0.0 {
            return None;
        }

        Self::for_raw(span / count.max(1) as f64)
    }

    /// Rounds a raw step size up to the nearest nice step.
    #[must_use]
    pub fn for_raw(raw: f64) -> Option<Self> {
        if !raw.is_finite() || raw <= 0.0 {
            return None;
        }

        let mut power = raw.log10().floor() as i32;
        let mut mantissa = if power >= 0 {
            raw / pow10(power)
        } else {
            raw * pow10(-power)
        };
        // log10 rounding can leave the mantissa a hair outside [1, 10).
        if mantissa >= 10.0 {
            power += 1;
            mantissa /= 10.0;
        } else if mantissa < 1.0 {
            power -= 1;
            mantissa *= 10.0;
        }

        let multiplier = NICE_MULTIPLIERS
            .into_iter()
            .find(|candidate| f64::from(*candidate) >= mantissa)
            .unwrap_or(10);
        Some(Self { multiplier, power })
    }

    #[must_use]
    pub fn size(self) -> f64 {
        self.value(1)
    }

    /// Returns `k * step`.
    ///
    /// Negative powers divide by `10^-power` so decimal steps such as `0.1`
    /// produce `0.3` rather than `0.30000000000000004`.
    #[must_use]
    pub fn value(self, k: i64) -> f64 {
        let scaled = k as f64 * f64::from(self.multiplier);
        if self.power >= 0 {
            scaled * pow10(self.power)
        } else {
            scaled / pow10(-self.power)
        }
    }

    /// Index of the first multiple of the step that is `>= value`.
    #[must_use]
    pub fn ceil_index(self, value: f64) -> i64 {
        (self.units(value) - END_TOLERANCE).ceil() as i64
    }

    /// Index of the last multiple of the step that is `<= value`.
    #[must_use]
    pub fn floor_index(self, value: f64) -> i64 {
        (self.units(value) + END_TOLERANCE).floor() as i64
    }

    fn units(self, value: f64) -> f64 {
        let multiplier = f64::from(self.multiplier);
        if self.power >= 0 {
            value / pow10(self.power) / multiplier
        } else {
            value * pow10(-self.power) / multiplier
        }
    }
}

/// Nice-number ticks between `start` and `end`, in domain direction.
///
/// The step favours round numbers over hitting `count` exactly: five ticks
/// requested over `[0, 10]` yield the six values `0, 2, 4, 6, 8, 10`.
#[must_use]
pub fn nice_ticks(start: f64, end: f64, count: usize) -> Vec<f64> {
    if !start.is_finite() || !end.is_finite() {
        return Vec::new();
    }
    if start == end {
        return vec![start];
    }

    let Some(step) = NiceStep::for_span(end - start, count) else {
        return Vec::new();
    };
    ticks_for_step(start, end, step)
}

/// Multiples of `step` inside `[start, end]`, in domain direction.
#[must_use]
pub fn ticks_for_step(start: f64, end: f64, step: NiceStep) -> Vec<f64> {
    let (lo, hi) = (start.min(end), start.max(end));
    let first = step.ceil_index(lo);
    let last = step.floor_index(hi);
    if last < first {
        return Vec::new();
    }

    let mut ticks: Vec<f64> = (first..=last).map(|k| step.value(k)).collect();
    if start > end {
        ticks.reverse();
    }
    ticks
}

/// Step that [`nice_ticks`] would use for the same inputs.
#[must_use]
pub fn tick_step(start: f64, end: f64, count: usize) -> Option<NiceStep> {
    if !start.is_finite() || !end.is_finite() {
        return None;
    }
    NiceStep::for_span(end - start, count)
}

/// Extends `[start, end]` outward to multiples of the nice step.
///
/// Widening can change the step, so this repeats until the bounds settle.
#[must_use]
pub fn nice_domain(start: f64, end: f64, count: usize) -> (f64, f64) {
    if !start.is_finite() || !end.is_finite() || start == end {
        return (start, end);
    }

    let reversed = start > end;
    let (mut lo, mut hi) = (start.min(end), start.max(end));
    let mut previous: Option<NiceStep> = None;

    for _ in 0..NICE_DOMAIN_MAX_PASSES {
        let Some(step) = NiceStep::for_span(hi - lo, count) else {
            break;
        };
        if previous == Some(step) {
            break;
        }
        lo = step.value(step.floor_index(lo));
        hi = step.value(step.ceil_index(hi));
        previous = Some(step);
    }

    if reversed { (hi, lo) } else { (lo, hi) }
}

/// Decimal digits needed to print every multiple of `step` exactly.
#[must_use]
pub fn step_precision(step: NiceStep) -> u8 {
    if step.power >= 0 {
        0
    } else {
        u8::try_from(-step.power).unwrap_or(u8::MAX)
    }
}

fn pow10(power: i32) -> f64 {
    10_f64.powi(power)
}

#[cfg(test)]
mod tests {
    use super::{NiceStep, nice_domain, nice_ticks, step_precision, tick_step};

    #[test]
    fn five_ticks_over_ten_prefer_step_two() {
        assert_eq!(
            nice_ticks(0.0, 10.0, 5),
            vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]
        );
    }

    #[test]
    fn descending_domain_yields_descending_ticks() {
        assert_eq!(nice_ticks(10.0, 0.0, 5), vec![10.0, 8.0, 6.0, 4.0, 2.0, 0.0]);
    }

    #[test]
    fn decimal_steps_stay_exact() {
        assert_eq!(
            nice_ticks(0.0, 1.0, 10),
            vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0]
        );
    }

    #[test]
    fn unaligned_domain_starts_at_next_multiple() {
        assert_eq!(nice_ticks(0.5, 9.7, 5), vec![2.0, 4.0, 6.0, 8.0]);
        assert_eq!(nice_ticks(-3.0, 3.0, 3), vec![-2.0, 0.0, 2.0]);
    }

    #[test]
    fn degenerate_and_non_finite_domains() {
        assert_eq!(nice_ticks(0.0, 0.0, 5), vec![0.0]);
        assert_eq!(nice_ticks(5.0, 5.0, 1), vec![5.0]);
        assert!(nice_ticks(f64::NAN, 1.0, 5).is_empty());
        assert!(nice_ticks(f64::INFINITY, f64::INFINITY, 5).is_empty());
    }

    #[test]
    fn zero_count_behaves_like_one() {
        assert_eq!(nice_ticks(0.0, 10.0, 0), vec![0.0, 10.0]);
    }

    #[test]
    fn step_multiplier_is_from_nice_set() {
        for (span, count) in [(7.3, 4), (0.013, 6), (12_345.0, 10), (3.0, 7)] {
            let step = NiceStep::for_span(span, count).expect("step");
            assert!([1, 2, 5, 10].contains(&step.multiplier));
            assert!(step.size() >= span / count as f64 * (1.0 - 1e-12));
        }
    }

    #[test]
    fn nice_domain_widens_to_step_multiples() {
        assert_eq!(nice_domain(0.3, 9.6, 5), (0.0, 10.0));
        assert_eq!(nice_domain(9.6, 0.3, 5), (10.0, 0.0));
        assert_eq!(nice_domain(4.0, 4.0, 5), (4.0, 4.0));
    }

    #[test]
    fn precision_follows_step_power() {
        let step = tick_step(0.0, 1.0, 4).expect("step");
        assert_eq!(step, NiceStep { multiplier: 5, power: -1 });
        assert_eq!(step_precision(step), 1);
        assert_eq!(step_precision(tick_step(0.0, 100.0, 5).expect("step")), 0);
    }
}
