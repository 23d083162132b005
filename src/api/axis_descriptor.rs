use serde::{Deserialize, Serialize};

use crate::api::axis_config::AxisOrientation;
use crate::api::tick_format::shortest_decimal;
use crate::core::TickValue;

/// Everything needed to draw one tick of an axis.
///
/// `value` is serialized with its kind as the key (`{"Key": "..."}`), so band
/// keys that look like numbers or instants survive a JSON round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickRenderRecord {
    #[serde(with = "tagged_value")]
    pub value: TickValue,
    pub position: f64,
    pub transform: String,
    /// Signed tick mark length along the cross axis.
    pub mark_length: f64,
    /// Signed label offset along the cross axis.
    pub text_offset: f64,
    pub text_anchor: String,
    pub dy: String,
    pub label: String,
}

/// Renderer-agnostic description of an axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisDescriptor {
    pub orientation: AxisOrientation,
    pub domain_path: String,
    pub ticks: Vec<TickRenderRecord>,
}

impl AxisDescriptor {
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.ticks.iter().map(|tick| tick.label.as_str()).collect()
    }

    #[must_use]
    pub fn positions(&self) -> Vec<f64> {
        self.ticks.iter().map(|tick| tick.position).collect()
    }
}

/// Baseline path from `range.0` to `range.1`, offset half a pixel for crisp
/// strokes.
#[must_use]
pub fn domain_path(orientation: AxisOrientation, range: (f64, f64)) -> String {
    let r0 = shortest_decimal(range.0 + 0.5);
    let r1 = shortest_decimal(range.1 + 0.5);
    if orientation.is_horizontal() {
        format!("M{r0},0H{r1}V0")
    } else {
        format!("M0,{r0}V{r1}H0")
    }
}

/// Translation placing a tick at `position` along the axis.
#[must_use]
pub fn tick_transform(orientation: AxisOrientation, position: f64) -> String {
    let position = shortest_decimal(position);
    if orientation.is_horizontal() {
        format!("translate({position},0)")
    } else {
        format!("translate(0,{position})")
    }
}

mod tagged_value {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::core::TickValue;

    #[derive(Serialize)]
    enum TaggedRef<'a> {
        Number(f64),
        Time(&'a DateTime<Utc>),
        Key(&'a str),
    }

    #[derive(Deserialize)]
    enum Tagged {
        Number(f64),
        Time(DateTime<Utc>),
        Key(String),
    }

    pub fn serialize<S: Serializer>(value: &TickValue, serializer: S) -> Result<S::Ok, S::Error> {
        let tagged = match value {
            TickValue::Number(number) => TaggedRef::Number(*number),
            TickValue::Time(instant) => TaggedRef::Time(instant),
            TickValue::Key(key) => TaggedRef::Key(key),
        };
        tagged.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TickValue, D::Error> {
        Ok(match Tagged::deserialize(deserializer)? {
            Tagged::Number(number) => TickValue::Number(number),
            Tagged::Time(instant) => TickValue::Time(instant),
            Tagged::Key(key) => TickValue::Key(key),
        })
    }
}
