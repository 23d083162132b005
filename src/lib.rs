//! axis-ticks: deterministic scale and axis tick generation.
//!
//! Scales (linear, log, time, band) live in [`core`] and know nothing about
//! text. [`api`] adds label formatting and turns a scale into an
//! [`api::AxisDescriptor`], which [`render`] serializes to SVG.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{Axis, AxisConfig, AxisDescriptor, AxisOrientation, TickFormat};
pub use crate::core::{BandScale, LinearScale, LogScale, Scale, Tick, TickValue, TimeScale};
pub use error::{AxisError, AxisResult};
