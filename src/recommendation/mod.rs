//! Recommendation rules
//!
//! Ordered decision list over the health score. The first matching band wins:
//!
//! | health          | condition             | action                    | horizon | prio |
//! |-----------------|-----------------------|---------------------------|---------|------|
//! | < critical      |                       | Critical Replacement      | 3       | 1    |
//! | < overhaul      | cost/residual > 0.4   | Economic Write-off Review | 6       | 1    |
//! | < overhaul      |                       | Major Overhaul            | 6       | 2    |
//! | < preventive    |                       | Preventive Maintenance    | 12      | 3    |
//! | otherwise       |                       | Normal Operation          | 24      | 4    |
//!
//! Band edges, the write-off ratio, impact shares and horizons all come from
//! `RecommendationRules`.

use crate::config::RecommendationRules;
use crate::reference::ReferenceConstants;
use crate::scoring::subscores::safe_ratio;
use crate::types::{HealthAssessment, Recommendation, RecommendedAction};

/// Everything the rule table reads for one asset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationInput {
    pub health_score: f64,
    pub rul_hours: f64,
    /// Maintenance spend attributed to the trailing year (or the whole history)
    pub annual_maintenance_cost: f64,
    pub residual_value: f64,
}

impl RecommendationInput {
    pub fn new(assessment: &HealthAssessment, annual_maintenance_cost: f64, residual_value: f64) -> Self {
        Self {
            health_score: assessment.health_score,
            rul_hours: assessment.rul_hours,
            annual_maintenance_cost,
            residual_value,
        }
    }
}

/// Pick the action for one scored asset.
///
/// Total over every input: a NaN score is treated as 0 so it lands in the
/// most urgent band rather than falling through to Normal Operation.
pub fn recommend(
    input: &RecommendationInput,
    reference: &ReferenceConstants,
    rules: &RecommendationRules,
) -> Recommendation {
    let health = if input.health_score.is_nan() { 0.0 } else { input.health_score };
    let cost = finite_non_negative(input.annual_maintenance_cost);
    let residual = finite_non_negative(input.residual_value);

    let (action, reason, detail, horizon_months, economic_impact) = if health < rules.critical_below {
        (
            RecommendedAction::CriticalReplacement,
            "Reliability compromised and service life exceeded".to_string(),
            format!(
                "Health score {health:.1} is below the safety band ({:.0}). RUL {:.0} h of {:.0} h expected life. High risk of catastrophic failure.",
                rules.critical_below, input.rul_hours, reference.expected_service_life_hours
            ),
            rules.horizon_critical_months,
            rules.critical_residual_share * residual + cost,
        )
    } else if health < rules.overhaul_below {
        let cost_ratio = safe_ratio(cost, residual);
        if cost_ratio > rules.write_off_cost_ratio {
            (
                RecommendedAction::EconomicWriteOffReview,
                format!(
                    "Maintenance cost exceeds {:.0}% of residual value",
                    rules.write_off_cost_ratio * 100.0
                ),
                format!(
                    "Health score {health:.1}. Annual maintenance {cost:.0} vs residual value {residual:.0} ({:.0}%). Repair is not cost-effective.",
                    cost_ratio * 100.0
                ),
                rules.horizon_overhaul_months,
                cost,
            )
        } else {
            (
                RecommendedAction::MajorOverhaul,
                "Medium-high wear, intervention required to extend life".to_string(),
                format!(
                    "Health score {health:.1}. RUL {:.0} h. Plan a major repair; annual maintenance {cost:.0}.",
                    input.rul_hours
                ),
                rules.horizon_overhaul_months,
                rules.overhaul_cost_share * cost,
            )
        }
    } else if health < rules.preventive_below {
        (
            RecommendedAction::PreventiveMaintenance,
            "Normal operation with expected wear".to_string(),
            format!(
                "Health score {health:.1}. Reinforce preventive schedule by meter reading; RUL {:.0} h.",
                input.rul_hours
            ),
            rules.horizon_preventive_months,
            0.0,
        )
    } else {
        (
            RecommendedAction::NormalOperation,
            "Equipment in optimal condition".to_string(),
            format!("Health score {health:.1}. No corrective action required."),
            rules.horizon_normal_months,
            0.0,
        )
    };

    let detail = if reference.downtime_cost_per_day > 0.0 && action != RecommendedAction::NormalOperation {
        format!("{detail} Downtime costs {:.0}/day.", reference.downtime_cost_per_day)
    } else {
        detail
    };

    Recommendation {
        action,
        reason,
        detail,
        horizon_months,
        priority: action.priority(),
        economic_impact,
    }
}

fn finite_non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
