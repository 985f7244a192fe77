//! Asset registry types: AssetRecord, RowError

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Asset Registry
// ============================================================================

/// One physical equipment unit from the asset registry.
///
/// Monetary fields are in the fleet's reporting currency. Absent values are
/// carried as 0 by the data source (see `ingest`), never as NaN.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetRecord {
    /// Unique asset identifier (fleet-wide key)
    pub id: String,
    /// Equipment category, joins to the reference table
    pub equipment_type: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    /// Year of purchase, if known
    #[serde(default)]
    pub purchase_year: Option<i32>,
    /// Current meter reading (operating hours)
    pub current_hours: f64,
    /// Acquisition value
    #[serde(default)]
    pub purchase_value: f64,
    /// Estimated residual (market) value
    #[serde(default)]
    pub residual_value: f64,
    /// Age in years, derived by the data source as `current year - purchase year`
    #[serde(default)]
    pub age_years: f64,
}

impl AssetRecord {
    /// Build a record with the fields the engine needs; registry metadata left blank.
    pub fn new(id: impl Into<String>, equipment_type: impl Into<String>, current_hours: f64) -> Self {
        Self {
            id: id.into(),
            equipment_type: equipment_type.into(),
            brand: String::new(),
            model: String::new(),
            purchase_year: None,
            current_hours,
            purchase_value: 0.0,
            residual_value: 0.0,
            age_years: 0.0,
        }
    }

    /// Recompute `age_years` from `purchase_year` relative to `current_year`.
    ///
    /// A purchase year in the future clamps the age to 0. Without a purchase
    /// year the existing value is kept.
    pub fn derive_age(&mut self, current_year: i32) {
        if let Some(year) = self.purchase_year {
            self.age_years = f64::from(current_year.saturating_sub(year).max(0));
        }
    }

    /// Check the structural invariants a row must satisfy to be scored.
    pub fn validate(&self) -> Result<(), RowError> {
        if self.id.trim().is_empty() {
            return Err(RowError::MissingIdentifier);
        }
        if !self.current_hours.is_finite() || self.current_hours < 0.0 {
            return Err(RowError::InvalidMeterReading {
                id: self.id.clone(),
                value: self.current_hours,
            });
        }
        for (field, value) in [
            ("purchase_value", self.purchase_value),
            ("residual_value", self.residual_value),
            ("age_years", self.age_years),
        ] {
            if !value.is_finite() {
                return Err(RowError::NonFiniteField {
                    id: self.id.clone(),
                    field,
                });
            }
        }
        Ok(())
    }
}

/// Why a single asset row was excluded from a fleet pass.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum RowError {
    #[error("asset row has no identifier")]
    MissingIdentifier,

    #[error("asset {0} appears more than once in the registry")]
    DuplicateIdentifier(String),

    #[error("asset {id}: meter reading must be a finite value >= 0, got {value}")]
    InvalidMeterReading { id: String, value: f64 },

    #[error("asset {id}: field {field} is not a finite number")]
    NonFiniteField { id: String, field: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_age_from_purchase_year() {
        let mut asset = AssetRecord::new("EX-01", "Excavator", 1200.0);
        asset.purchase_year = Some(2018);
        asset.derive_age(2026);
        assert_eq!(asset.age_years, 8.0);
    }

    #[test]
    fn test_derive_age_future_purchase_clamps_to_zero() {
        let mut asset = AssetRecord::new("EX-02", "Excavator", 0.0);
        asset.purchase_year = Some(2030);
        asset.derive_age(2026);
        assert_eq!(asset.age_years, 0.0);
    }

    #[test]
    fn test_derive_age_extreme_years_do_not_overflow() {
        let mut asset = AssetRecord::new("EX-04", "Excavator", 0.0);
        asset.purchase_year = Some(i32::MIN);
        asset.derive_age(2026);
        assert_eq!(asset.age_years, f64::from(i32::MAX));

        asset.purchase_year = Some(i32::MAX);
        asset.derive_age(i32::MIN);
        assert_eq!(asset.age_years, 0.0);
    }

    #[test]
    fn test_derive_age_without_year_keeps_value() {
        let mut asset = AssetRecord::new("EX-03", "Excavator", 0.0);
        asset.age_years = 3.0;
        asset.derive_age(2026);
        assert_eq!(asset.age_years, 3.0);
    }

    #[test]
    fn test_validate_rejects_blank_identifier() {
        let asset = AssetRecord::new("  ", "Loader", 10.0);
        assert_eq!(asset.validate(), Err(RowError::MissingIdentifier));
    }

    #[test]
    fn test_validate_rejects_negative_hours() {
        let asset = AssetRecord::new("LD-01", "Loader", -5.0);
        assert!(matches!(
            asset.validate(),
            Err(RowError::InvalidMeterReading { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_nan_residual() {
        let mut asset = AssetRecord::new("LD-02", "Loader", 5.0);
        asset.residual_value = f64::NAN;
        assert!(matches!(
            asset.validate(),
            Err(RowError::NonFiniteField { field: "residual_value", .. })
        ));
    }

    #[test]
    fn test_validate_accepts_zero_values() {
        let asset = AssetRecord::new("LD-03", "Loader", 0.0);
        assert!(asset.validate().is_ok());
    }
}
