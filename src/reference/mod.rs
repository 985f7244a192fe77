//! Reference Resolver
//!
//! Looks up per-equipment-type constants in the reference table. A missing
//! type is a recoverable condition: the lookup yields `None` and the merge
//! step substitutes the configured defaults.

use serde::{Deserialize, Serialize};

use crate::config::ReferenceDefaults;
use crate::types::ReferenceEntry;

/// Constants the engine needs for one equipment type, after default merging.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ReferenceConstants {
    pub expected_service_life_hours: f64,
    pub annual_depreciation_rate: f64,
    pub hourly_operating_cost: f64,
    pub downtime_cost_per_day: f64,
    /// True when a reference row matched the equipment type
    pub matched: bool,
}

impl ReferenceConstants {
    /// Merge an optional reference row with the defaults.
    ///
    /// Each field falls back independently. A service life that is absent,
    /// non-finite or not positive takes the default, since it is the divisor
    /// of the usage ratio.
    pub fn resolve(found: Option<&ReferenceEntry>, defaults: &ReferenceDefaults) -> Self {
        let Some(entry) = found else {
            return Self::defaults(defaults);
        };

        let life = entry
            .expected_service_life_hours
            .filter(|h| h.is_finite() && *h > 0.0);
        if life.is_none() {
            tracing::warn!(
                equipment_type = %entry.equipment_type,
                value = ?entry.expected_service_life_hours,
                "Reference service life unusable, using default"
            );
        }

        Self {
            expected_service_life_hours: life.unwrap_or(defaults.default_service_life_hours),
            annual_depreciation_rate: non_negative(entry.annual_depreciation_rate)
                .unwrap_or(defaults.default_depreciation_rate),
            hourly_operating_cost: non_negative(entry.hourly_operating_cost)
                .unwrap_or(defaults.default_hourly_operating_cost),
            downtime_cost_per_day: non_negative(entry.downtime_cost_per_day)
                .unwrap_or(defaults.default_downtime_cost_per_day),
            matched: true,
        }
    }

    /// Constants for an equipment type with no reference row.
    pub fn defaults(defaults: &ReferenceDefaults) -> Self {
        Self {
            expected_service_life_hours: defaults.default_service_life_hours,
            annual_depreciation_rate: defaults.default_depreciation_rate,
            hourly_operating_cost: defaults.default_hourly_operating_cost,
            downtime_cost_per_day: defaults.default_downtime_cost_per_day,
            matched: false,
        }
    }
}

fn non_negative(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v >= 0.0)
}

/// First reference row whose equipment type equals `equipment_type`.
///
/// Duplicate rows for the same type are not rejected; later rows are ignored.
pub fn find_reference<'a>(equipment_type: &str, table: &'a [ReferenceEntry]) -> Option<&'a ReferenceEntry> {
    table.iter().find(|entry| entry.equipment_type == equipment_type)
}

/// Look up and merge in one step.
pub fn resolve_reference(
    equipment_type: &str,
    table: &[ReferenceEntry],
    defaults: &ReferenceDefaults,
) -> ReferenceConstants {
    let found = find_reference(equipment_type, table);
    if found.is_none() {
        tracing::debug!(equipment_type, "No reference row, using defaults");
    }
    ReferenceConstants::resolve(found, defaults)
}
