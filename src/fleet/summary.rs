//! Fleet aggregates for dashboards and the narrative layer
//!
//! Everything here is computed from `EvaluatedAsset` rows only, never from
//! raw scoring internals.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::defaults::{
    CRITICAL_HEALTH_SCORE, NEAR_TERM_HORIZON_MONTHS, SHORT_TERM_HORIZON_MONTHS, URGENT_PRIORITY_MAX,
};
use crate::types::{EvaluatedAsset, HealthBand, RecommendedAction};

/// Headline numbers for one fleet pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FleetSummary {
    pub total_assets: usize,
    /// Asset rows excluded from the pass
    pub rejected_rows: usize,
    /// Health score below 40
    pub critical_assets: usize,
    pub average_health: f64,
    pub average_age_years: f64,
    /// Horizon of 12 months or less
    pub actions_within_12_months: usize,
    /// Horizon of 6 months or less
    pub actions_within_6_months: usize,
    /// Priority 1 or 2
    pub urgent_actions: usize,
    pub total_economic_impact: f64,
    pub total_maintenance_cost: f64,
    pub total_downtime_cost: f64,
    pub bands: BandCounts,
    pub actions: BTreeMap<RecommendedAction, usize>,
    /// Per equipment type, ascending by average health
    pub by_type: Vec<TypeHealth>,
    /// Per asset, descending by maintenance cost
    pub cost_rollups: Vec<AssetCostRollup>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct BandCounts {
    pub red: usize,
    pub amber: usize,
    pub green: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeHealth {
    pub equipment_type: String,
    pub assets: usize,
    pub average_health: f64,
    pub total_maintenance_cost: f64,
}

/// Cost exposure of one asset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetCostRollup {
    pub asset_id: String,
    pub equipment_type: String,
    pub health_score: f64,
    pub maintenance_cost: f64,
    pub maintenance_events: usize,
    pub corrective_events: usize,
    pub downtime_hours: f64,
    pub downtime_cost: f64,
    pub economic_impact: f64,
}

impl From<&EvaluatedAsset> for AssetCostRollup {
    fn from(e: &EvaluatedAsset) -> Self {
        Self {
            asset_id: e.asset.id.clone(),
            equipment_type: e.asset.equipment_type.clone(),
            health_score: e.health_score,
            maintenance_cost: e.trailing_maintenance_cost,
            maintenance_events: e.maintenance_events,
            corrective_events: e.corrective_events,
            downtime_hours: e.downtime_hours,
            downtime_cost: e.downtime_cost,
            economic_impact: e.recommendation.economic_impact,
        }
    }
}

impl FleetSummary {
    pub fn from_assets(assets: &[EvaluatedAsset]) -> Self {
        let mut bands = BandCounts::default();
        let mut actions: BTreeMap<RecommendedAction, usize> = BTreeMap::new();
        for a in assets {
            match a.health_band() {
                HealthBand::Red => bands.red += 1,
                HealthBand::Amber => bands.amber += 1,
                HealthBand::Green => bands.green += 1,
            }
            *actions.entry(a.recommendation.action).or_default() += 1;
        }

        let mut cost_rollups: Vec<AssetCostRollup> = assets.iter().map(AssetCostRollup::from).collect();
        cost_rollups.sort_by(|a, b| b.maintenance_cost.total_cmp(&a.maintenance_cost));

        Self {
            total_assets: assets.len(),
            rejected_rows: 0,
            critical_assets: count(assets, |a| a.health_score < CRITICAL_HEALTH_SCORE),
            average_health: mean(assets.iter().map(|a| a.health_score)),
            average_age_years: mean(assets.iter().map(|a| a.asset.age_years)),
            actions_within_12_months: count(assets, |a| a.recommendation.horizon_months <= NEAR_TERM_HORIZON_MONTHS),
            actions_within_6_months: count(assets, |a| a.recommendation.horizon_months <= SHORT_TERM_HORIZON_MONTHS),
            urgent_actions: count(assets, |a| a.priority() <= URGENT_PRIORITY_MAX),
            total_economic_impact: assets.iter().map(|a| a.recommendation.economic_impact).sum(),
            total_maintenance_cost: assets.iter().map(|a| a.trailing_maintenance_cost).sum(),
            total_downtime_cost: assets.iter().map(|a| a.downtime_cost).sum(),
            bands,
            actions,
            by_type: health_by_type(assets),
            cost_rollups,
        }
    }

    /// Assets below the critical threshold, worst first.
    pub fn critical<'e>(assets: &'e [EvaluatedAsset]) -> Vec<&'e EvaluatedAsset> {
        let mut critical: Vec<&EvaluatedAsset> =
            assets.iter().filter(|a| a.health_score < CRITICAL_HEALTH_SCORE).collect();
        critical.sort_by(|a, b| a.health_score.total_cmp(&b.health_score));
        critical
    }
}

/// Count, mean health and spend per equipment type, weakest type first.
pub fn health_by_type(assets: &[EvaluatedAsset]) -> Vec<TypeHealth> {
    let mut groups: BTreeMap<&str, (usize, f64, f64)> = BTreeMap::new();
    for a in assets {
        let entry = groups.entry(a.asset.equipment_type.as_str()).or_default();
        entry.0 += 1;
        entry.1 += a.health_score;
        entry.2 += a.trailing_maintenance_cost;
    }

    let mut rows: Vec<TypeHealth> = groups
        .into_iter()
        .map(|(equipment_type, (n, health_sum, cost))| TypeHealth {
            equipment_type: equipment_type.to_string(),
            assets: n,
            average_health: health_sum / n as f64,
            total_maintenance_cost: cost,
        })
        .collect();
    rows.sort_by(|a, b| a.average_health.total_cmp(&b.average_health));
    rows
}

fn count(assets: &[EvaluatedAsset], pred: impl Fn(&EvaluatedAsset) -> bool) -> usize {
    assets.iter().filter(|a| pred(*a)).count()
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::fleet::FleetEvaluator;
    use crate::types::AssetRecord;

    fn fleet() -> Vec<EvaluatedAsset> {
        let config = EngineConfig::default();
        let eval = FleetEvaluator::new(&config);
        let specs: [(&str, &str, f64, f64); 4] = [
            ("EX-01", "Excavator", 20_000.0, 8.0),
            ("EX-02", "Excavator", 0.0, 0.0),
            ("TR-01", "Truck", 30_000.0, 20.0),
            ("TR-02", "Truck", 3_000.0, 2.0),
        ];
        specs
            .iter()
            .map(|(id, kind, hours, age)| {
                let mut a = AssetRecord::new(*id, *kind, *hours);
                a.age_years = *age;
                a.residual_value = 10_000.0;
                eval.evaluate_asset(&a, &[], &[])
            })
            .collect()
    }

    #[test]
    fn test_empty_fleet() {
        let s = FleetSummary::from_assets(&[]);
        assert_eq!(s.total_assets, 0);
        assert_eq!(s.average_health, 0.0);
        assert!(s.by_type.is_empty());
    }

    #[test]
    fn test_counts_and_averages() {
        let assets = fleet();
        let s = FleetSummary::from_assets(&assets);
        assert_eq!(s.total_assets, 4);
        assert_eq!(s.average_age_years, 7.5);
        let expected = assets.iter().map(|a| a.health_score).sum::<f64>() / 4.0;
        assert!((s.average_health - expected).abs() < 1e-9);
        assert_eq!(s.bands.red + s.bands.amber + s.bands.green, 4);
        assert_eq!(s.actions.values().sum::<usize>(), 4);
        assert!(s.actions_within_6_months <= s.actions_within_12_months);
        // EX-01 lands in Major Overhaul
        assert!(s.urgent_actions >= 1, "urgent: {}", s.urgent_actions);
    }

    #[test]
    fn test_by_type_sorted_weakest_first() {
        let s = FleetSummary::from_assets(&fleet());
        assert_eq!(s.by_type.len(), 2);
        assert!(s.by_type[0].average_health <= s.by_type[1].average_health);
        assert_eq!(s.by_type[0].assets, 2);
    }

    #[test]
    fn test_critical_listing_worst_first() {
        let mut assets = fleet();
        assets[1].health_score = 10.0;
        assets[3].health_score = 5.0;
        let critical = FleetSummary::critical(&assets);
        assert_eq!(critical[0].id(), "TR-02");
        assert_eq!(critical[1].id(), "EX-02");
    }
}
