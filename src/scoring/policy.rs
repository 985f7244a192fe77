//! Built-in health policies

use super::subscores::{
    self, corrective_share_score, cost_ratio_score, exponential_age_score, linear_age_score,
    HistoryStats,
};
use super::HealthPolicy;
use crate::config::{LinearPolicyConfig, PolicyKind, RefinedPolicyConfig, SubScoreWeights};
use crate::types::AssetRecord;

/// Linear age decay and a cost-ratio maintenance score.
///
/// Defaults: usage cap 1.2, exponent 1.0, `100 - 10 * age`, weights 0.4 / 0.3 / 0.3.
#[derive(Debug, Clone, Default)]
pub struct LinearPolicy {
    pub config: LinearPolicyConfig,
}

impl LinearPolicy {
    pub fn new(config: LinearPolicyConfig) -> Self {
        Self { config }
    }
}

impl HealthPolicy for LinearPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Linear
    }

    fn usage_score(&self, current_hours: f64, expected_life_hours: f64) -> f64 {
        subscores::usage_score(
            current_hours,
            expected_life_hours,
            self.config.usage_cap,
            self.config.usage_exponent,
        )
    }

    fn age_score(&self, age_years: f64) -> f64 {
        linear_age_score(age_years, self.config.age_slope_per_year)
    }

    fn reliability_score(&self, asset: &AssetRecord, history: &HistoryStats) -> f64 {
        cost_ratio_score(asset, history, self.config.no_history_score)
    }

    fn weights(&self) -> SubScoreWeights {
        self.config.weights
    }
}

/// Exponential age decay and a corrective-share reliability score.
///
/// Defaults: usage cap 1.5, exponent 1.2, `100 * exp(-0.1 * age)`,
/// weights 0.30 / 0.20 / 0.50.
#[derive(Debug, Clone, Default)]
pub struct RefinedPolicy {
    pub config: RefinedPolicyConfig,
}

impl RefinedPolicy {
    pub fn new(config: RefinedPolicyConfig) -> Self {
        Self { config }
    }
}

impl HealthPolicy for RefinedPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Refined
    }

    fn usage_score(&self, current_hours: f64, expected_life_hours: f64) -> f64 {
        subscores::usage_score(
            current_hours,
            expected_life_hours,
            self.config.usage_cap,
            self.config.usage_exponent,
        )
    }

    fn age_score(&self, age_years: f64) -> f64 {
        exponential_age_score(age_years, self.config.age_decay_rate)
    }

    fn reliability_score(&self, _asset: &AssetRecord, history: &HistoryStats) -> f64 {
        corrective_share_score(
            history,
            self.config.corrective_spend_share,
            self.config.corrective_spend_penalty,
        )
    }

    fn weights(&self) -> SubScoreWeights {
        self.config.weights
    }
}
