//! Maintenance history types: MaintenanceKind, MaintenanceEvent

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of service intervention.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum MaintenanceKind {
    /// Scheduled maintenance
    #[default]
    Preventive,
    /// Unplanned, failure-driven maintenance
    Corrective,
    /// Label the source used that is neither of the above (inspection, warranty...)
    Other(String),
}

impl MaintenanceKind {
    /// Parse a free-text label. English and Spanish spellings are accepted,
    /// case-insensitively; anything else is kept verbatim as `Other`.
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed.to_lowercase().as_str() {
            "preventive" | "preventivo" | "preventiva" | "scheduled" => Self::Preventive,
            "corrective" | "correctivo" | "correctiva" | "unplanned" | "breakdown" => {
                Self::Corrective
            }
            _ => Self::Other(trimmed.to_string()),
        }
    }

    pub fn is_corrective(&self) -> bool {
        matches!(self, Self::Corrective)
    }
}

impl std::fmt::Display for MaintenanceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Preventive => write!(f, "Preventive"),
            Self::Corrective => write!(f, "Corrective"),
            Self::Other(label) => write!(f, "{label}"),
        }
    }
}

/// One service intervention tied to exactly one asset.
///
/// Cost columns are optional because not every source sheet carries the
/// breakdown. `total_cost()` substitutes 0 for whatever is missing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MaintenanceEvent {
    /// Foreign key into the asset registry
    pub asset_id: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub kind: MaintenanceKind,
    #[serde(default)]
    pub parts_cost: Option<f64>,
    #[serde(default)]
    pub labor_cost: Option<f64>,
    /// Pre-summed cost column; takes precedence over the breakdown when present
    #[serde(default)]
    pub recorded_total: Option<f64>,
    #[serde(default)]
    pub downtime_hours: Option<f64>,
    #[serde(default)]
    pub description: String,
}

impl MaintenanceEvent {
    pub fn new(asset_id: impl Into<String>, kind: MaintenanceKind) -> Self {
        Self {
            asset_id: asset_id.into(),
            kind,
            ..Self::default()
        }
    }

    /// Builder-style helper for the parts/labor breakdown.
    pub fn with_costs(mut self, parts: f64, labor: f64) -> Self {
        self.parts_cost = Some(parts);
        self.labor_cost = Some(labor);
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Parts + labor, or the recorded total when the source provided one.
    pub fn total_cost(&self) -> f64 {
        if let Some(total) = self.recorded_total.filter(|v| v.is_finite()) {
            return total;
        }
        finite_or_zero(self.parts_cost) + finite_or_zero(self.labor_cost)
    }

    pub fn downtime(&self) -> f64 {
        finite_or_zero(self.downtime_hours)
    }
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_label_spanish_and_english() {
        assert_eq!(MaintenanceKind::from_label("Correctivo"), MaintenanceKind::Corrective);
        assert_eq!(MaintenanceKind::from_label(" corrective "), MaintenanceKind::Corrective);
        assert_eq!(MaintenanceKind::from_label("Preventivo"), MaintenanceKind::Preventive);
        assert_eq!(
            MaintenanceKind::from_label("Inspection"),
            MaintenanceKind::Other("Inspection".to_string())
        );
    }

    #[test]
    fn test_total_cost_sums_breakdown() {
        let event = MaintenanceEvent::new("TR-01", MaintenanceKind::Corrective).with_costs(300.0, 200.0);
        assert_eq!(event.total_cost(), 500.0);
    }

    #[test]
    fn test_total_cost_missing_columns_are_zero() {
        let mut event = MaintenanceEvent::new("TR-01", MaintenanceKind::Preventive);
        assert_eq!(event.total_cost(), 0.0);
        event.labor_cost = Some(150.0);
        assert_eq!(event.total_cost(), 150.0);
    }

    #[test]
    fn test_recorded_total_takes_precedence() {
        let mut event = MaintenanceEvent::new("TR-01", MaintenanceKind::Preventive).with_costs(1.0, 1.0);
        event.recorded_total = Some(900.0);
        assert_eq!(event.total_cost(), 900.0);
    }

    #[test]
    fn test_non_finite_costs_are_ignored() {
        let mut event = MaintenanceEvent::new("TR-01", MaintenanceKind::Preventive);
        event.parts_cost = Some(f64::NAN);
        event.labor_cost = Some(40.0);
        event.downtime_hours = Some(f64::INFINITY);
        assert_eq!(event.total_cost(), 40.0);
        assert_eq!(event.downtime(), 0.0);
    }
}
