use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Tick, TickValue};
use crate::error::{AxisError, AxisResult};

/// Expected ticks grouped by scale family and then by scenario name.
///
/// Insertion order is preserved on both levels so serialized corpora diff
/// cleanly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceCorpus {
    families: IndexMap<String, IndexMap<String, Vec<Tick>>>,
}

impl ReferenceCorpus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(input: &str) -> AxisResult<Self> {
        serde_json::from_str(input).map_err(|e| {
            AxisError::InvalidData(format!("failed to parse reference corpus: {e}"))
        })
    }

    pub fn to_json_pretty(&self) -> AxisResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            AxisError::InvalidData(format!("failed to serialize reference corpus: {e}"))
        })
    }

    /// Stores `ticks` under `family`/`scenario`, returning any ticks replaced.
    pub fn insert(
        &mut self,
        family: impl Into<String>,
        scenario: impl Into<String>,
        ticks: Vec<Tick>,
    ) -> Option<Vec<Tick>> {
        self.families
            .entry(family.into())
            .or_default()
            .insert(scenario.into(), ticks)
    }

    #[must_use]
    pub fn scenario(&self, family: &str, scenario: &str) -> Option<&[Tick]> {
        self.families
            .get(family)
            .and_then(|scenarios| scenarios.get(scenario))
            .map(Vec::as_slice)
    }

    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.families.keys().map(String::as_str)
    }

    pub fn scenarios(&self, family: &str) -> impl Iterator<Item = &str> {
        self.families
            .get(family)
            .into_iter()
            .flat_map(|scenarios| scenarios.keys().map(String::as_str))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.families.values().all(IndexMap::is_empty)
    }
}

/// One difference between reference and generated ticks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TickMismatch {
    Count {
        reference: usize,
        generated: usize,
    },
    Value {
        index: usize,
        reference: TickValue,
        generated: TickValue,
    },
    Position {
        index: usize,
        reference: f64,
        generated: f64,
    },
    Label {
        index: usize,
        reference: String,
        generated: String,
    },
}

/// Compares tick lists pairwise.
///
/// Numeric values and positions match within `tolerance`; instants, keys and
/// labels must be identical. A length difference is reported once and the
/// common prefix is still compared.
#[must_use]
pub fn compare_ticks(reference: &[Tick], generated: &[Tick], tolerance: f64) -> Vec<TickMismatch> {
    let mut mismatches = Vec::new();
    if reference.len() != generated.len() {
        mismatches.push(TickMismatch::Count {
            reference: reference.len(),
            generated: generated.len(),
        });
    }

    for (index, (expected, actual)) in reference.iter().zip(generated).enumerate() {
        if !values_match(&expected.value, &actual.value, tolerance) {
            mismatches.push(TickMismatch::Value {
                index,
                reference: expected.value.clone(),
                generated: actual.value.clone(),
            });
        }
        if !within(expected.position, actual.position, tolerance) {
            mismatches.push(TickMismatch::Position {
                index,
                reference: expected.position,
                generated: actual.position,
            });
        }
        if expected.label != actual.label {
            mismatches.push(TickMismatch::Label {
                index,
                reference: expected.label.clone(),
                generated: actual.label.clone(),
            });
        }
    }

    for mismatch in &mismatches {
        debug!(?mismatch, "tick mismatch");
    }
    mismatches
}

fn values_match(reference: &TickValue, generated: &TickValue, tolerance: f64) -> bool {
    match (reference, generated) {
        (TickValue::Number(a), TickValue::Number(b)) => within(*a, *b, tolerance),
        (a, b) => a == b,
    }
}

fn within(a: f64, b: f64, tolerance: f64) -> bool {
    a == b || (a - b).abs() <= tolerance
}
