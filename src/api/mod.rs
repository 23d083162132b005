mod axis;
mod axis_config;
mod axis_descriptor;
mod json_contract;
mod reference;
mod tick_format;

pub use axis::Axis;
pub use axis_config::{
    AxisConfig, AxisOrientation, DEFAULT_TICK_COUNT, DEFAULT_TICK_PADDING,
    DEFAULT_TICK_SIZE_INNER,
};
pub use axis_descriptor::{AxisDescriptor, TickRenderRecord, domain_path, tick_transform};
pub use json_contract::{AXIS_DESCRIPTOR_JSON_SCHEMA_V1, AxisDescriptorJsonContractV1};
pub use reference::{ReferenceCorpus, TickMismatch, compare_ticks};
pub use tick_format::{
    NumberFormat, TickFormat, TickFormatterFn, TimeLabelPattern, natural_label, shortest_decimal,
};
