use serde::{Deserialize, Serialize};

use crate::core::interval::Interval;
use crate::error::{AxisError, AxisResult};

const DEFAULT_ALIGN: f64 = 0.5;

/// Resolved geometry of a band scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandLayout {
    /// Distance between the starts of adjacent bands.
    pub step: f64,
    pub bandwidth: f64,
    /// Start of the first band in ascending range order.
    pub start: f64,
}

/// Discrete scale assigning each key an equal-width band.
///
/// Paddings are expressed as fractions of the step. Duplicate keys are kept
/// and occupy their own band; lookups resolve to the first occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandScale {
    keys: Vec<String>,
    range: Interval,
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
}

impl BandScale {
    pub fn new<I, S>(keys: I, range: (f64, f64)) -> AxisResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let range = Interval::range(range.0, range.1)?;
        Ok(Self {
            keys: keys.into_iter().map(Into::into).collect(),
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: DEFAULT_ALIGN,
        })
    }

    pub fn with_padding_inner(mut self, padding: f64) -> AxisResult<Self> {
        if !padding.is_finite() || !(0.0..=1.0).contains(&padding) {
            return Err(AxisError::InvalidParameter(format!(
                "inner padding must be within [0, 1], got {padding}"
            )));
        }
        self.padding_inner = padding;
        Ok(self)
    }

    pub fn with_padding_outer(mut self, padding: f64) -> AxisResult<Self> {
        if !padding.is_finite() || padding < 0.0 {
            return Err(AxisError::InvalidParameter(format!(
                "outer padding must be finite and >= 0, got {padding}"
            )));
        }
        self.padding_outer = padding;
        Ok(self)
    }

    /// Sets inner and outer padding to the same value.
    pub fn with_padding(self, padding: f64) -> AxisResult<Self> {
        self.with_padding_inner(padding)?.with_padding_outer(padding)
    }

    /// Distributes leftover outer space: 0 packs bands at the range start,
    /// 1 at the end.
    pub fn with_align(mut self, align: f64) -> AxisResult<Self> {
        if !align.is_finite() || !(0.0..=1.0).contains(&align) {
            return Err(AxisError::InvalidParameter(format!(
                "band align must be within [0, 1], got {align}"
            )));
        }
        self.align = align;
        Ok(self)
    }

    #[must_use]
    pub fn domain(&self) -> &[String] {
        &self.keys
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.range.as_tuple()
    }

    #[must_use]
    pub fn padding_inner(&self) -> f64 {
        self.padding_inner
    }

    #[must_use]
    pub fn padding_outer(&self) -> f64 {
        self.padding_outer
    }

    #[must_use]
    pub fn align(&self) -> f64 {
        self.align
    }

    #[must_use]
    pub fn layout(&self) -> BandLayout {
        let n = self.keys.len() as f64;
        let span = self.range.span().abs();
        let step = span / (n - self.padding_inner + 2.0 * self.padding_outer).max(1.0);
        let start = self.range.min() + (span - step * (n - self.padding_inner)) * self.align;
        BandLayout {
            step,
            bandwidth: step * (1.0 - self.padding_inner),
            start,
        }
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.layout().step
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.layout().bandwidth
    }

    fn position_of(&self, index: usize, layout: BandLayout) -> f64 {
        let slot = if self.range.is_reversed() {
            self.keys.len() - 1 - index
        } else {
            index
        };
        layout.start + slot as f64 * layout.step
    }

    /// Start of the band for `key`, or `None` for keys outside the domain.
    #[must_use]
    pub fn map(&self, key: &str) -> Option<f64> {
        let index = self.keys.iter().position(|candidate| candidate == key)?;
        Some(self.position_of(index, self.layout()))
    }

    #[must_use]
    pub fn band_center(&self, key: &str) -> Option<f64> {
        let layout = self.layout();
        self.map(key).map(|start| start + layout.bandwidth / 2.0)
    }

    /// Band starts for every key in domain order.
    #[must_use]
    pub fn positions(&self) -> Vec<f64> {
        let layout = self.layout();
        (0..self.keys.len())
            .map(|index| self.position_of(index, layout))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::BandScale;
    use crate::error::AxisError;

    fn categorical() -> BandScale {
        BandScale::new(["Alpha", "Beta", "Gamma", "Delta"], (0.0, 400.0))
            .expect("scale")
            .with_padding_inner(0.1)
            .expect("inner")
            .with_padding_outer(0.05)
            .expect("outer")
    }

    #[test]
    fn categorical_layout_matches_reference() {
        let scale = categorical();
        let layout = scale.layout();
        assert!((layout.step - 100.0).abs() < 1e-9);
        assert!((layout.bandwidth - 90.0).abs() < 1e-9);
        assert!((layout.start - 5.0).abs() < 1e-9);
        let centers: Vec<f64> = scale
            .domain()
            .iter()
            .filter_map(|key| scale.band_center(key))
            .collect();
        for (actual, expected) in centers.iter().zip([50.0, 150.0, 250.0, 350.0]) {
            assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
        }
    }

    #[test]
    fn step_fills_range_exactly() {
        let scale = categorical();
        let n = scale.domain().len() as f64;
        let total = scale.step() * (n - scale.padding_inner() + 2.0 * scale.padding_outer());
        assert!((total - 400.0).abs() < 1e-9);
    }

    #[test]
    fn reversed_range_reverses_positions() {
        let scale = BandScale::new(["a", "b", "c"], (300.0, 0.0)).expect("scale");
        assert_eq!(scale.map("a"), Some(200.0));
        assert_eq!(scale.map("c"), Some(0.0));
        assert_eq!(scale.positions(), vec![200.0, 100.0, 0.0]);
    }

    #[test]
    fn unknown_key_maps_to_none() {
        assert_eq!(categorical().map("Omega"), None);
    }

    #[test]
    fn duplicates_resolve_to_first_band() {
        let scale = BandScale::new(["x", "y", "x"], (0.0, 300.0)).expect("scale");
        assert_eq!(scale.domain().len(), 3);
        assert_eq!(scale.map("x"), Some(0.0));
    }

    #[test]
    fn align_shifts_leftover_space() {
        let scale = BandScale::new(["a", "b"], (0.0, 100.0))
            .expect("scale")
            .with_padding_outer(1.0)
            .expect("outer")
            .with_align(0.0)
            .expect("align");
        assert_eq!(scale.map("a"), Some(0.0));
        assert_eq!(scale.step(), 25.0);
    }

    #[test]
    fn invalid_padding_is_rejected() {
        let scale = categorical();
        assert!(matches!(
            scale.clone().with_padding_inner(1.5),
            Err(AxisError::InvalidParameter(_))
        ));
        assert!(matches!(
            scale.clone().with_padding_outer(-0.1),
            Err(AxisError::InvalidParameter(_))
        ));
        assert!(matches!(
            scale.with_align(f64::NAN),
            Err(AxisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn empty_domain_has_no_positions() {
        let scale = BandScale::new(Vec::<String>::new(), (0.0, 100.0)).expect("scale");
        assert!(scale.positions().is_empty());
        assert_eq!(scale.map("a"), None);
    }
}
