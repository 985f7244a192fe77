//! Engine Configuration - scoring policy, recommendation bands and defaults as TOML values
//!
//! Every constant the scoring formula and the rule table depend on is a field
//! in this module. Each struct implements `Default` with the documented values,
//! so an absent or empty config file behaves exactly like the built-in policy.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Environment variable naming the config file to load.
pub const CONFIG_ENV_VAR: &str = "FLEET_HEALTH_CONFIG";

/// Config file looked up in the working directory when the env var is unset.
pub const LOCAL_CONFIG_FILE: &str = "fleet_health.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a fleet-health deployment.
///
/// Load with `EngineConfig::load()` which searches:
/// 1. `$FLEET_HEALTH_CONFIG` env var
/// 2. `./fleet_health.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fleet identification (reports and logs only)
    #[serde(default)]
    pub fleet: FleetInfo,

    /// Health score policy selection and parameters
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Fallback constants for unmatched equipment types
    #[serde(default)]
    pub reference: ReferenceDefaults,

    /// Recommendation band thresholds and impact factors
    #[serde(default)]
    pub recommendation: RecommendationRules,

    /// Maintenance cost rollup
    #[serde(default)]
    pub costs: CostConfig,
}

impl EngineConfig {
    /// Load configuration using the standard search order:
    /// 1. `$FLEET_HEALTH_CONFIG` environment variable
    /// 2. `./fleet_health.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), fleet = %config.fleet.name, "Loaded engine config from {}", CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", CONFIG_ENV_VAR);
            }
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(fleet = %config.fleet.name, "Loaded engine config from ./{}", LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", LOCAL_CONFIG_FILE);
                }
            }
        }

        info!("No {} found, using built-in defaults", LOCAL_CONFIG_FILE);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config = Self::from_toml_str(&contents)
            .map_err(|e| match e {
                ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
                other => other,
            })?;
        Ok(config)
    }

    /// Parse and validate a TOML document. Unknown keys are logged, not rejected.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in &super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::from("<inline>"), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate all parameters for internal consistency.
    ///
    /// Rules:
    /// - Each policy's weights must sum to approximately 1.0
    /// - Band thresholds must be strictly increasing inside (0, 100]
    /// - Usage caps >= 1, exponents and decay rates > 0
    /// - Default service life > 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        let linear = &self.scoring.linear;
        Self::check_weights(&linear.weights, "scoring.linear.weights", &mut errors);
        Self::check_usage_curve(linear.usage_cap, linear.usage_exponent, "scoring.linear", &mut errors);
        if linear.age_slope_per_year < 0.0 {
            errors.push("scoring.linear.age_slope_per_year must be >= 0".to_string());
        }
        if !(0.0..=100.0).contains(&linear.no_history_score) {
            errors.push(format!(
                "scoring.linear.no_history_score must be in [0, 100], got {:.1}",
                linear.no_history_score
            ));
        }

        let refined = &self.scoring.refined;
        Self::check_weights(&refined.weights, "scoring.refined.weights", &mut errors);
        Self::check_usage_curve(refined.usage_cap, refined.usage_exponent, "scoring.refined", &mut errors);
        if refined.age_decay_rate <= 0.0 {
            errors.push("scoring.refined.age_decay_rate must be > 0".to_string());
        }
        if !(0.0..=1.0).contains(&refined.corrective_spend_share) {
            errors.push(format!(
                "scoring.refined.corrective_spend_share must be in [0, 1], got {:.2}",
                refined.corrective_spend_share
            ));
        }
        if !(0.0..=100.0).contains(&refined.corrective_spend_penalty) {
            errors.push("scoring.refined.corrective_spend_penalty must be in [0, 100]".to_string());
        }

        if self.reference.default_service_life_hours <= 0.0 {
            errors.push("reference.default_service_life_hours must be > 0".to_string());
        }

        let r = &self.recommendation;
        if !(0.0 < r.critical_below && r.critical_below < r.overhaul_below
            && r.overhaul_below < r.preventive_below && r.preventive_below <= 100.0)
        {
            errors.push(format!(
                "recommendation bands must satisfy 0 < critical_below ({:.1}) < overhaul_below ({:.1}) < preventive_below ({:.1}) <= 100",
                r.critical_below, r.overhaul_below, r.preventive_below
            ));
        }

        let (range_errors, range_warnings) = super::validation::validate_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        // NaN/Inf comparisons silently pass the checks above
        for (name, value) in super::validation::numeric_fields(self) {
            if !value.is_finite() {
                errors.push(format!("{name} must be a finite number, got {value}"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_weights(weights: &SubScoreWeights, name: &str, errors: &mut Vec<String>) {
        if weights.usage < 0.0 || weights.age < 0.0 || weights.reliability < 0.0 {
            errors.push(format!("{name}: weights must be >= 0"));
        }
        let sum = weights.sum();
        if !(0.95..=1.05).contains(&sum) {
            errors.push(format!("{name} must sum to ~1.0, got {sum:.2}"));
        }
    }

    fn check_usage_curve(cap: f64, exponent: f64, name: &str, errors: &mut Vec<String>) {
        if cap < 1.0 {
            errors.push(format!("{name}.usage_cap ({cap:.2}) must be >= 1.0"));
        }
        if exponent <= 0.0 {
            errors.push(format!("{name}.usage_exponent must be > 0"));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}

// ============================================================================
// Fleet Info
// ============================================================================

/// Identification metadata, not used for logic but shown in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetInfo {
    #[serde(default = "default_fleet_name")]
    pub name: String,

    /// Currency code printed next to monetary amounts
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_fleet_name() -> String {
    "DEFAULT".to_string()
}

fn default_currency() -> String {
    "CLP".to_string()
}

impl Default for FleetInfo {
    fn default() -> Self {
        Self {
            name: default_fleet_name(),
            currency: default_currency(),
        }
    }
}

// ============================================================================
// Scoring
// ============================================================================

/// Which health policy the engine runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Linear age decay, cost-ratio maintenance score
    Linear,
    /// Exponential age decay, corrective-share reliability score
    #[default]
    Refined,
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Refined => write!(f, "refined"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub policy: PolicyKind,

    #[serde(default)]
    pub linear: LinearPolicyConfig,

    #[serde(default)]
    pub refined: RefinedPolicyConfig,
}

/// Blend weights for the three sub-scores.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SubScoreWeights {
    pub usage: f64,
    pub age: f64,
    pub reliability: f64,
}

impl SubScoreWeights {
    pub fn sum(&self) -> f64 {
        self.usage + self.age + self.reliability
    }
}

/// Parameters of the linear ("simple") policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearPolicyConfig {
    /// Upper bound on hours / expected life
    #[serde(default = "default_linear_usage_cap")]
    pub usage_cap: f64,

    /// Exponent applied to the usage ratio (1.0 = linear wear)
    #[serde(default = "default_linear_usage_exponent")]
    pub usage_exponent: f64,

    /// Points lost per year of age
    #[serde(default = "default_age_slope")]
    pub age_slope_per_year: f64,

    /// Maintenance score for an asset with no recorded events
    #[serde(default = "default_no_history_score")]
    pub no_history_score: f64,

    #[serde(default = "default_linear_weights")]
    pub weights: SubScoreWeights,
}

fn default_linear_usage_cap() -> f64 {
    1.2
}

fn default_linear_usage_exponent() -> f64 {
    1.0
}

fn default_age_slope() -> f64 {
    10.0
}

fn default_no_history_score() -> f64 {
    80.0
}

fn default_linear_weights() -> SubScoreWeights {
    SubScoreWeights {
        usage: 0.4,
        age: 0.3,
        reliability: 0.3,
    }
}

impl Default for LinearPolicyConfig {
    fn default() -> Self {
        Self {
            usage_cap: default_linear_usage_cap(),
            usage_exponent: default_linear_usage_exponent(),
            age_slope_per_year: default_age_slope(),
            no_history_score: default_no_history_score(),
            weights: default_linear_weights(),
        }
    }
}

/// Parameters of the refined policy (the default).
///
/// Observed failure history carries half of the score; theoretical age the
/// smallest share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinedPolicyConfig {
    #[serde(default = "default_refined_usage_cap")]
    pub usage_cap: f64,

    /// > 1.0 super-linearly penalizes heavy overuse
    #[serde(default = "default_refined_usage_exponent")]
    pub usage_exponent: f64,

    /// k in `100 * exp(-k * age_years)`
    #[serde(default = "default_age_decay_rate")]
    pub age_decay_rate: f64,

    /// Corrective share of total spend above which the penalty applies
    #[serde(default = "default_corrective_spend_share")]
    pub corrective_spend_share: f64,

    /// Flat points removed from reliability when the spend share is exceeded
    #[serde(default = "default_corrective_spend_penalty")]
    pub corrective_spend_penalty: f64,

    #[serde(default = "default_refined_weights")]
    pub weights: SubScoreWeights,
}

fn default_refined_usage_cap() -> f64 {
    1.5
}

fn default_refined_usage_exponent() -> f64 {
    1.2
}

fn default_age_decay_rate() -> f64 {
    0.1
}

fn default_corrective_spend_share() -> f64 {
    0.6
}

fn default_corrective_spend_penalty() -> f64 {
    10.0
}

fn default_refined_weights() -> SubScoreWeights {
    SubScoreWeights {
        usage: 0.30,
        age: 0.20,
        reliability: 0.50,
    }
}

impl Default for RefinedPolicyConfig {
    fn default() -> Self {
        Self {
            usage_cap: default_refined_usage_cap(),
            usage_exponent: default_refined_usage_exponent(),
            age_decay_rate: default_age_decay_rate(),
            corrective_spend_share: default_corrective_spend_share(),
            corrective_spend_penalty: default_corrective_spend_penalty(),
            weights: default_refined_weights(),
        }
    }
}

// ============================================================================
// Reference Defaults
// ============================================================================

/// Constants used when an equipment type has no reference row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceDefaults {
    #[serde(default = "default_service_life_hours")]
    pub default_service_life_hours: f64,

    #[serde(default = "default_depreciation_rate")]
    pub default_depreciation_rate: f64,

    #[serde(default)]
    pub default_hourly_operating_cost: f64,

    #[serde(default)]
    pub default_downtime_cost_per_day: f64,
}

fn default_service_life_hours() -> f64 {
    15_000.0
}

fn default_depreciation_rate() -> f64 {
    0.15
}

impl Default for ReferenceDefaults {
    fn default() -> Self {
        Self {
            default_service_life_hours: default_service_life_hours(),
            default_depreciation_rate: default_depreciation_rate(),
            default_hourly_operating_cost: 0.0,
            default_downtime_cost_per_day: 0.0,
        }
    }
}

// ============================================================================
// Recommendation Rules
// ============================================================================

/// Band thresholds (health score, exclusive upper bounds) and impact factors
/// for the recommendation decision list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRules {
    /// Below this: Critical Replacement
    #[serde(default = "default_critical_below")]
    pub critical_below: f64,

    /// Below this: Write-off Review or Major Overhaul
    #[serde(default = "default_overhaul_below")]
    pub overhaul_below: f64,

    /// Below this: Preventive Maintenance; at or above: Normal Operation
    #[serde(default = "default_preventive_below")]
    pub preventive_below: f64,

    /// Annual cost / residual value above which an overhaul becomes a write-off review
    #[serde(default = "default_write_off_cost_ratio")]
    pub write_off_cost_ratio: f64,

    /// Share of residual value counted in the critical-replacement impact
    #[serde(default = "default_critical_residual_share")]
    pub critical_residual_share: f64,

    /// Share of annual cost counted in the overhaul impact
    #[serde(default = "default_overhaul_cost_share")]
    pub overhaul_cost_share: f64,

    #[serde(default = "default_horizon_critical")]
    pub horizon_critical_months: u32,

    #[serde(default = "default_horizon_overhaul")]
    pub horizon_overhaul_months: u32,

    #[serde(default = "default_horizon_preventive")]
    pub horizon_preventive_months: u32,

    #[serde(default = "default_horizon_normal")]
    pub horizon_normal_months: u32,
}

fn default_critical_below() -> f64 {
    40.0
}

fn default_overhaul_below() -> f64 {
    60.0
}

fn default_preventive_below() -> f64 {
    85.0
}

fn default_write_off_cost_ratio() -> f64 {
    0.4
}

fn default_critical_residual_share() -> f64 {
    0.2
}

fn default_overhaul_cost_share() -> f64 {
    0.5
}

fn default_horizon_critical() -> u32 {
    3
}

fn default_horizon_overhaul() -> u32 {
    6
}

fn default_horizon_preventive() -> u32 {
    12
}

fn default_horizon_normal() -> u32 {
    24
}

impl Default for RecommendationRules {
    fn default() -> Self {
        Self {
            critical_below: default_critical_below(),
            overhaul_below: default_overhaul_below(),
            preventive_below: default_preventive_below(),
            write_off_cost_ratio: default_write_off_cost_ratio(),
            critical_residual_share: default_critical_residual_share(),
            overhaul_cost_share: default_overhaul_cost_share(),
            horizon_critical_months: default_horizon_critical(),
            horizon_overhaul_months: default_horizon_overhaul(),
            horizon_preventive_months: default_horizon_preventive(),
            horizon_normal_months: default_horizon_normal(),
        }
    }
}

// ============================================================================
// Cost Rollup
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CostConfig {
    /// Only events newer than this many months (relative to the as-of date)
    /// count toward the trailing maintenance cost. Absent = whole history.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailing_window_months: Option<u32>,
}
