//! Health Scoring Module
//!
//! Deterministic, rule-based health score calculation for fleet assets.
//!
//! The health score is a weighted blend of three sub-scores, each in [0, 100]:
//! - Usage: meter reading against expected service life
//! - Age: calendar obsolescence
//! - Reliability: what the maintenance history says about the unit
//!
//! How each sub-score is computed and how they are weighted is a
//! `HealthPolicy`. Two policies ship with the engine (`LinearPolicy` and
//! `RefinedPolicy`); the active one is chosen by `[scoring] policy` in the
//! engine config.

pub mod policy;
pub mod subscores;

pub use policy::{LinearPolicy, RefinedPolicy};
pub use subscores::HistoryStats;

use crate::config::{PolicyKind, ScoringConfig, SubScoreWeights};
use crate::reference::ReferenceConstants;
use crate::types::{AssetRecord, HealthAssessment, MaintenanceEvent, SubScores};

/// Strategy for the three sub-score curves and their blend weights.
pub trait HealthPolicy: Send + Sync {
    /// Which configured policy this is
    fn kind(&self) -> PolicyKind;

    /// Wear from `current_hours` against `expected_life_hours`
    fn usage_score(&self, current_hours: f64, expected_life_hours: f64) -> f64;

    /// Obsolescence from calendar age
    fn age_score(&self, age_years: f64) -> f64;

    /// Score derived from the asset's maintenance history
    fn reliability_score(&self, asset: &AssetRecord, history: &HistoryStats) -> f64;

    fn weights(&self) -> SubScoreWeights;
}

/// Build the policy selected in the scoring config.
pub fn policy_from_config(config: &ScoringConfig) -> Box<dyn HealthPolicy> {
    match config.policy {
        PolicyKind::Linear => Box::new(LinearPolicy::new(config.linear.clone())),
        PolicyKind::Refined => Box::new(RefinedPolicy::new(config.refined.clone())),
    }
}

/// Score one asset from its maintenance history and resolved reference constants.
///
/// `history` must already be filtered to this asset. The result always
/// satisfies `0 <= health_score <= 100` and `rul_hours >= 0`.
pub fn evaluate<'a>(
    asset: &AssetRecord,
    history: impl IntoIterator<Item = &'a MaintenanceEvent>,
    reference: &ReferenceConstants,
    policy: &dyn HealthPolicy,
) -> HealthAssessment {
    let stats = HistoryStats::from_events(history);
    evaluate_with_stats(asset, &stats, reference, policy)
}

/// `evaluate` over pre-aggregated history.
pub fn evaluate_with_stats(
    asset: &AssetRecord,
    stats: &HistoryStats,
    reference: &ReferenceConstants,
    policy: &dyn HealthPolicy,
) -> HealthAssessment {
    let life = reference.expected_service_life_hours;

    let sub_scores = SubScores {
        usage: policy.usage_score(asset.current_hours, life),
        age: policy.age_score(asset.age_years),
        reliability: policy.reliability_score(asset, stats),
    };

    let w = policy.weights();
    let health_score = subscores::clamp_score(
        sub_scores.usage * w.usage + sub_scores.age * w.age + sub_scores.reliability * w.reliability,
    );

    let rul_hours = remaining_useful_life(asset.current_hours, life);

    tracing::debug!(
        asset_id = %asset.id,
        policy = %policy.kind(),
        usage = sub_scores.usage,
        age = sub_scores.age,
        reliability = sub_scores.reliability,
        health_score = health_score,
        rul_hours = rul_hours,
        "Asset scored"
    );

    HealthAssessment {
        health_score,
        rul_hours,
        sub_scores,
    }
}

/// Hours left until expected end of service life, floored at 0.
pub fn remaining_useful_life(current_hours: f64, expected_life_hours: f64) -> f64 {
    let rul = expected_life_hours - current_hours;
    if rul.is_finite() { rul.max(0.0) } else { 0.0 }
}
