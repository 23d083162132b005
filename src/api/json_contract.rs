use serde::{Deserialize, Serialize};

use crate::error::{AxisError, AxisResult};

use super::AxisDescriptor;

pub const AXIS_DESCRIPTOR_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisDescriptorJsonContractV1 {
    pub schema_version: u32,
    pub axis: AxisDescriptor,
}

impl AxisDescriptor {
    pub fn to_json_pretty(&self) -> AxisResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            AxisError::InvalidData(format!("failed to serialize axis descriptor: {e}"))
        })
    }

    pub fn to_json_contract_v1_pretty(&self) -> AxisResult<String> {
        let payload = AxisDescriptorJsonContractV1 {
            schema_version: AXIS_DESCRIPTOR_JSON_SCHEMA_V1,
            axis: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            AxisError::InvalidData(format!("failed to serialize axis contract v1: {e}"))
        })
    }

    /// Parses either a bare descriptor or a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> AxisResult<Self> {
        if let Ok(axis) = serde_json::from_str::<AxisDescriptor>(input) {
            return Ok(axis);
        }
        let payload: AxisDescriptorJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            AxisError::InvalidData(format!("failed to parse axis json payload: {e}"))
        })?;
        if payload.schema_version != AXIS_DESCRIPTOR_JSON_SCHEMA_V1 {
            return Err(AxisError::InvalidData(format!(
                "unsupported axis schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.axis)
    }
}
