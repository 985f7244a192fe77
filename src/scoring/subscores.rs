//! Sub-score curves.
//!
//! Every function here returns a value in [0, 100] (100 = perfect health) and
//! never divides by zero: a zero divisor yields a ratio of 0.

use crate::types::{AssetRecord, MaintenanceEvent};

/// Clamp into the sub-score range.
pub(crate) fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}

/// `numerator / denominator`, or 0 when the denominator is not positive.
pub(crate) fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 && denominator.is_finite() {
        numerator / denominator
    } else {
        0.0
    }
}

/// Wear from meter reading.
///
/// `ratio = min(hours / life, cap)`, `score = 100 * (1 - ratio^exponent)`.
/// An exponent above 1 penalizes heavy overuse super-linearly.
pub fn usage_score(current_hours: f64, expected_life_hours: f64, cap: f64, exponent: f64) -> f64 {
    let ratio = safe_ratio(current_hours.max(0.0), expected_life_hours).min(cap);
    clamp_score(100.0 * (1.0 - ratio.powf(exponent)))
}

/// Straight-line obsolescence: `100 - slope * age`.
pub fn linear_age_score(age_years: f64, slope_per_year: f64) -> f64 {
    clamp_score(100.0 - slope_per_year * age_years)
}

/// Exponential obsolescence: `100 * exp(-k * age)`.
///
/// Gentle over the first years, steeper in relative terms later on.
pub fn exponential_age_score(age_years: f64, decay_rate: f64) -> f64 {
    clamp_score(100.0 * (-decay_rate * age_years).exp())
}

/// Aggregates of one asset's maintenance history that the reliability
/// curves depend on.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HistoryStats {
    pub total_events: usize,
    pub corrective_events: usize,
    pub total_spend: f64,
    pub corrective_spend: f64,
    pub downtime_hours: f64,
}

impl HistoryStats {
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a MaintenanceEvent>) -> Self {
        events.into_iter().fold(Self::default(), |mut stats, event| {
            let cost = event.total_cost();
            stats.total_events += 1;
            stats.total_spend += cost;
            stats.downtime_hours += event.downtime();
            if event.kind.is_corrective() {
                stats.corrective_events += 1;
                stats.corrective_spend += cost;
            }
            stats
        })
    }

    pub fn is_empty(&self) -> bool {
        self.total_events == 0
    }

    /// Corrective events / all events (0 with no history).
    pub fn failure_rate(&self) -> f64 {
        if self.total_events == 0 {
            0.0
        } else {
            self.corrective_events as f64 / self.total_events as f64
        }
    }

    /// Corrective spend / total spend (0 when nothing was spent).
    pub fn corrective_spend_share(&self) -> f64 {
        safe_ratio(self.corrective_spend, self.total_spend)
    }
}

/// Maintenance score as a share of the purchase value spent on upkeep.
///
/// `100 - 100 * (spend / purchase_value)`. With no history at all the neutral
/// `no_history_score` applies.
pub fn cost_ratio_score(asset: &AssetRecord, history: &HistoryStats, no_history_score: f64) -> f64 {
    if history.is_empty() {
        return clamp_score(no_history_score);
    }
    let ratio = safe_ratio(history.total_spend, asset.purchase_value);
    clamp_score(100.0 - 100.0 * ratio)
}

/// Reliability from the share of unplanned interventions.
///
/// `100 - 100 * failure_rate`, minus `penalty` points when corrective work
/// accounts for more than `share_threshold` of total spend. No history is a
/// perfect 100.
pub fn corrective_share_score(history: &HistoryStats, share_threshold: f64, penalty: f64) -> f64 {
    if history.is_empty() {
        return 100.0;
    }
    let mut score = clamp_score(100.0 - history.failure_rate() * 100.0);
    if history.total_spend > 0.0 && history.corrective_spend_share() > share_threshold {
        score -= penalty;
    }
    clamp_score(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MaintenanceKind;

    fn event(kind: MaintenanceKind, cost: f64) -> MaintenanceEvent {
        MaintenanceEvent::new("A-1", kind).with_costs(cost, 0.0)
    }

    #[test]
    fn test_usage_new_asset_is_perfect() {
        assert_eq!(usage_score(0.0, 15_000.0, 1.5, 1.2), 100.0);
    }

    #[test]
    fn test_usage_half_life_linear() {
        let score = usage_score(7_500.0, 15_000.0, 1.2, 1.0);
        assert!((score - 50.0).abs() < 1e-9, "Score: {}", score);
    }

    #[test]
    fn test_usage_overuse_floors_at_zero() {
        let score = usage_score(20_000.0, 15_000.0, 1.5, 1.2);
        assert_eq!(score, 0.0, "Score: {}", score);
    }

    #[test]
    fn test_usage_exponent_below_end_of_life() {
        // ratio < 1: ratio^1.2 < ratio
        let linear = usage_score(14_000.0, 15_000.0, 1.5, 1.0);
        let refined = usage_score(14_000.0, 15_000.0, 1.5, 1.2);
        assert!(refined > linear, "linear {} refined {}", linear, refined);
        assert!(refined < 15.0, "Score: {}", refined);
    }

    #[test]
    fn test_usage_zero_life_is_zero_ratio() {
        assert_eq!(usage_score(5_000.0, 0.0, 1.5, 1.2), 100.0);
    }

    #[test]
    fn test_linear_age() {
        assert_eq!(linear_age_score(0.0, 10.0), 100.0);
        assert_eq!(linear_age_score(8.0, 10.0), 20.0);
        assert_eq!(linear_age_score(15.0, 10.0), 0.0);
    }

    #[test]
    fn test_exponential_age() {
        assert_eq!(exponential_age_score(0.0, 0.1), 100.0);
        let eight = exponential_age_score(8.0, 0.1);
        assert!((eight - 44.932_896).abs() < 1e-4, "Score: {}", eight);
        assert!(exponential_age_score(40.0, 0.1) > 0.0);
    }

    #[test]
    fn test_negative_age_capped_at_100() {
        assert_eq!(exponential_age_score(-3.0, 0.1), 100.0);
        assert_eq!(linear_age_score(-3.0, 10.0), 100.0);
    }

    #[test]
    fn test_history_stats() {
        let events = vec![
            event(MaintenanceKind::Corrective, 700.0),
            event(MaintenanceKind::Preventive, 300.0),
            event(MaintenanceKind::Other("Inspection".into()), 0.0),
        ];
        let stats = HistoryStats::from_events(&events);
        assert_eq!(stats.total_events, 3);
        assert_eq!(stats.corrective_events, 1);
        assert_eq!(stats.total_spend, 1_000.0);
        assert!((stats.corrective_spend_share() - 0.7).abs() < 1e-12);
        assert!((stats.failure_rate() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_corrective_share_no_history_is_perfect() {
        assert_eq!(corrective_share_score(&HistoryStats::default(), 0.6, 10.0), 100.0);
    }

    #[test]
    fn test_corrective_share_with_spend_penalty() {
        let events = vec![
            event(MaintenanceKind::Corrective, 700.0),
            event(MaintenanceKind::Preventive, 300.0),
        ];
        let stats = HistoryStats::from_events(&events);
        // 50% failure rate -> 50, corrective spend 70% > 60% -> minus 10
        assert_eq!(corrective_share_score(&stats, 0.6, 10.0), 40.0);
    }

    #[test]
    fn test_corrective_share_without_penalty() {
        let events = vec![
            event(MaintenanceKind::Corrective, 100.0),
            event(MaintenanceKind::Preventive, 900.0),
        ];
        let stats = HistoryStats::from_events(&events);
        assert_eq!(corrective_share_score(&stats, 0.6, 10.0), 50.0);
    }

    #[test]
    fn test_corrective_share_zero_spend_skips_penalty() {
        let events = vec![event(MaintenanceKind::Corrective, 0.0)];
        let stats = HistoryStats::from_events(&events);
        assert_eq!(corrective_share_score(&stats, 0.6, 10.0), 0.0);
    }

    #[test]
    fn test_cost_ratio_no_history_is_neutral() {
        let asset = AssetRecord::new("A-1", "Loader", 0.0);
        assert_eq!(cost_ratio_score(&asset, &HistoryStats::default(), 80.0), 80.0);
    }

    #[test]
    fn test_cost_ratio_zero_purchase_value() {
        let asset = AssetRecord::new("A-1", "Loader", 0.0);
        let events = vec![event(MaintenanceKind::Corrective, 5_000.0)];
        let stats = HistoryStats::from_events(&events);
        assert_eq!(cost_ratio_score(&asset, &stats, 80.0), 100.0);
    }

    #[test]
    fn test_cost_ratio_quarter_of_value() {
        let mut asset = AssetRecord::new("A-1", "Loader", 0.0);
        asset.purchase_value = 40_000.0;
        let events = vec![event(MaintenanceKind::Preventive, 10_000.0)];
        let stats = HistoryStats::from_events(&events);
        assert_eq!(cost_ratio_score(&asset, &stats, 80.0), 75.0);
    }
}
