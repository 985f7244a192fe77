//! Reference table row: ReferenceEntry

use serde::{Deserialize, Serialize};

/// Per-equipment-type reference constants.
///
/// The equipment type is not guaranteed unique across rows; lookups use the
/// first match. Numeric columns are optional so a partially filled sheet
/// still resolves (missing values fall back to the resolver defaults).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ReferenceEntry {
    pub equipment_type: String,
    #[serde(default)]
    pub expected_service_life_hours: Option<f64>,
    #[serde(default)]
    pub annual_depreciation_rate: Option<f64>,
    #[serde(default)]
    pub hourly_operating_cost: Option<f64>,
    #[serde(default)]
    pub downtime_cost_per_day: Option<f64>,
}

impl ReferenceEntry {
    pub fn new(equipment_type: impl Into<String>, service_life_hours: f64, depreciation_rate: f64) -> Self {
        Self {
            equipment_type: equipment_type.into(),
            expected_service_life_hours: Some(service_life_hours),
            annual_depreciation_rate: Some(depreciation_rate),
            hourly_operating_cost: None,
            downtime_cost_per_day: None,
        }
    }
}
