use tracing::debug;

use crate::api::axis_config::{AxisConfig, AxisOrientation};
use crate::api::axis_descriptor::{AxisDescriptor, TickRenderRecord, domain_path, tick_transform};
use crate::api::tick_format::TickFormat;
use crate::core::{Scale, Tick, TickValue};
use crate::error::AxisResult;

/// A scale plus the presentation choices needed to draw it as an axis.
#[derive(Debug, Clone)]
pub struct Axis {
    scale: Scale,
    orientation: AxisOrientation,
    config: AxisConfig,
    tick_values: Option<Vec<TickValue>>,
    tick_format: Option<TickFormat>,
}

impl Axis {
    #[must_use]
    pub fn new(scale: impl Into<Scale>, orientation: AxisOrientation) -> Self {
        Self {
            scale: scale.into(),
            orientation,
            config: AxisConfig::default(),
            tick_values: None,
            tick_format: None,
        }
    }

    #[must_use]
    pub fn with_tick_count(mut self, count: usize) -> Self {
        self.config.tick_count = count;
        self
    }

    /// Uses `values` instead of the scale's generated ticks.
    #[must_use]
    pub fn with_tick_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<TickValue>,
    {
        self.tick_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_tick_format(mut self, format: TickFormat) -> Self {
        self.tick_format = Some(format);
        self
    }

    pub fn with_tick_size(self, size: f64) -> AxisResult<Self> {
        let config = AxisConfig {
            tick_size_inner: size,
            ..self.config
        };
        self.with_config(config)
    }

    pub fn with_tick_padding(self, padding: f64) -> AxisResult<Self> {
        let config = AxisConfig {
            tick_padding: padding,
            ..self.config
        };
        self.with_config(config)
    }

    pub fn with_config(mut self, config: AxisConfig) -> AxisResult<Self> {
        self.config = config.validate()?;
        Ok(self)
    }

    #[must_use]
    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    #[must_use]
    pub fn orientation(&self) -> AxisOrientation {
        self.orientation
    }

    #[must_use]
    pub fn config(&self) -> AxisConfig {
        self.config
    }

    fn resolved_format(&self) -> TickFormat {
        self.tick_format
            .clone()
            .unwrap_or_else(|| self.scale.tick_format(self.config.tick_count))
    }

    /// Positioned and labelled ticks.
    ///
    /// Fails only when explicit tick values cannot be mapped by the scale.
    pub fn ticks(&self) -> AxisResult<Vec<Tick>> {
        let values = match &self.tick_values {
            Some(values) => values.clone(),
            None => self.scale.tick_values(self.config.tick_count),
        };
        let format = self.resolved_format();
        let offset = self.scale.tick_offset();

        values
            .into_iter()
            .map(|value| {
                let position = self.scale.map(&value)? + offset;
                let label = format.format(&value);
                Ok(Tick {
                    value,
                    position,
                    label,
                })
            })
            .collect()
    }

    pub fn render(&self) -> AxisResult<AxisDescriptor> {
        let orientation = self.orientation;
        let mark_length = self.config.mark_length(orientation);
        let text_offset = self.config.text_offset(orientation);

        let ticks: Vec<TickRenderRecord> = self
            .ticks()?
            .into_iter()
            .map(|tick| TickRenderRecord {
                transform: tick_transform(orientation, tick.position),
                value: tick.value,
                position: tick.position,
                mark_length,
                text_offset,
                text_anchor: orientation.text_anchor().to_owned(),
                dy: orientation.dy().to_owned(),
                label: tick.label,
            })
            .collect();

        debug!(
            kind = ?self.scale.kind(),
            ?orientation,
            tick_count = self.config.tick_count,
            rendered = ticks.len(),
            "rendered axis"
        );

        Ok(AxisDescriptor {
            orientation,
            domain_path: domain_path(orientation, self.scale.range()),
            ticks,
        })
    }
}

impl Scale {
    /// Renders this scale as an axis with default geometry.
    pub fn render(&self, orientation: AxisOrientation, count: usize) -> AxisResult<AxisDescriptor> {
        Axis::new(self.clone(), orientation)
            .with_tick_count(count)
            .render()
    }
}
