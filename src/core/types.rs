use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A value a tick sits on: a number, an instant, or a band key.
#[derive(Debug, Clone, PartialEq)]
pub enum TickValue {
    Number(f64),
    Time(DateTime<Utc>),
    Key(String),
}

impl TickValue {
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Time(_) | Self::Key(_) => None,
        }
    }

    #[must_use]
    pub fn as_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Time(value) => Some(*value),
            Self::Number(_) | Self::Key(_) => None,
        }
    }

    #[must_use]
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Key(value) => Some(value),
            Self::Number(_) | Self::Time(_) => None,
        }
    }

    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Time(_) => "time",
            Self::Key(_) => "key",
        }
    }
}

impl From<f64> for TickValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<DateTime<Utc>> for TickValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Time(value)
    }
}

impl From<&str> for TickValue {
    fn from(value: &str) -> Self {
        Self::Key(value.to_owned())
    }
}

impl From<String> for TickValue {
    fn from(value: String) -> Self {
        Self::Key(value)
    }
}

/// ISO-8601 form with millisecond precision, e.g. `2020-01-01T00:00:00.000Z`.
#[must_use]
pub fn iso_millis(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl Serialize for TickValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(value) => serializer.serialize_f64(*value),
            Self::Time(value) => serializer.serialize_str(&iso_millis(*value)),
            Self::Key(value) => serializer.serialize_str(value),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTickValue {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for TickValue {
    /// Strings that parse as RFC 3339 instants become `Time`, any other
    /// string becomes a `Key`.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawTickValue::deserialize(deserializer)? {
            RawTickValue::Number(value) => Self::Number(value),
            RawTickValue::Text(text) => match DateTime::parse_from_rfc3339(&text) {
                Ok(instant) => Self::Time(instant.with_timezone(&Utc)),
                Err(_) => Self::Key(text),
            },
        })
    }
}

/// A positioned, labelled tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub value: TickValue,
    pub position: f64,
    pub label: String,
}

impl Tick {
    #[must_use]
    pub fn new(value: impl Into<TickValue>, position: f64, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            position,
            label: label.into(),
        }
    }
}
