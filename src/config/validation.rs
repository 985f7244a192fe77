//! Config validation: unknown-key detection with Levenshtein suggestions
//! and range checks.
//!
//! Two-pass parse: the raw TOML is first read into `toml::Value`, its key tree
//! is compared against the known field names, and typos produce warnings with
//! "did you mean?" suggestions. Normal serde deserialization follows. Warnings
//! never break an existing config.

use std::collections::HashSet;

use super::EngineConfig;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for EngineConfig.
///
/// Maintained by hand to match the struct hierarchy in engine_config.rs.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [fleet]
        "fleet",
        "fleet.name",
        "fleet.currency",
        // [scoring]
        "scoring",
        "scoring.policy",
        // [scoring.linear]
        "scoring.linear",
        "scoring.linear.usage_cap",
        "scoring.linear.usage_exponent",
        "scoring.linear.age_slope_per_year",
        "scoring.linear.no_history_score",
        "scoring.linear.weights",
        "scoring.linear.weights.usage",
        "scoring.linear.weights.age",
        "scoring.linear.weights.reliability",
        // [scoring.refined]
        "scoring.refined",
        "scoring.refined.usage_cap",
        "scoring.refined.usage_exponent",
        "scoring.refined.age_decay_rate",
        "scoring.refined.corrective_spend_share",
        "scoring.refined.corrective_spend_penalty",
        "scoring.refined.weights",
        "scoring.refined.weights.usage",
        "scoring.refined.weights.age",
        "scoring.refined.weights.reliability",
        // [reference]
        "reference",
        "reference.default_service_life_hours",
        "reference.default_depreciation_rate",
        "reference.default_hourly_operating_cost",
        "reference.default_downtime_cost_per_day",
        // [recommendation]
        "recommendation",
        "recommendation.critical_below",
        "recommendation.overhaul_below",
        "recommendation.preventive_below",
        "recommendation.write_off_cost_ratio",
        "recommendation.critical_residual_share",
        "recommendation.overhaul_cost_share",
        "recommendation.horizon_critical_months",
        "recommendation.horizon_overhaul_months",
        "recommendation.horizon_preventive_months",
        "recommendation.horizon_normal_months",
        // [costs]
        "costs",
        "costs.trailing_window_months",
    ];
    keys.iter().copied().collect()
}

/// Recursively collect every dotted key path in a TOML value.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Closest known key within edit distance 3, ties broken alphabetically.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (k, levenshtein(unknown, k)))
        .filter(|&(_, dist)| dist <= 3)
        .min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)))
        .map(|(k, _)| k.to_string())
}

/// Warn about keys that do not map to any config field.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are reported by serde later
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Range Validation
// ============================================================================

/// Every floating-point parameter with its dotted key, for finiteness checks.
pub fn numeric_fields(config: &EngineConfig) -> Vec<(&'static str, f64)> {
    let l = &config.scoring.linear;
    let r = &config.scoring.refined;
    let d = &config.reference;
    let rec = &config.recommendation;
    vec![
        ("scoring.linear.usage_cap", l.usage_cap),
        ("scoring.linear.usage_exponent", l.usage_exponent),
        ("scoring.linear.age_slope_per_year", l.age_slope_per_year),
        ("scoring.linear.no_history_score", l.no_history_score),
        ("scoring.linear.weights.usage", l.weights.usage),
        ("scoring.linear.weights.age", l.weights.age),
        ("scoring.linear.weights.reliability", l.weights.reliability),
        ("scoring.refined.usage_cap", r.usage_cap),
        ("scoring.refined.usage_exponent", r.usage_exponent),
        ("scoring.refined.age_decay_rate", r.age_decay_rate),
        ("scoring.refined.corrective_spend_share", r.corrective_spend_share),
        ("scoring.refined.corrective_spend_penalty", r.corrective_spend_penalty),
        ("scoring.refined.weights.usage", r.weights.usage),
        ("scoring.refined.weights.age", r.weights.age),
        ("scoring.refined.weights.reliability", r.weights.reliability),
        ("reference.default_service_life_hours", d.default_service_life_hours),
        ("reference.default_depreciation_rate", d.default_depreciation_rate),
        ("reference.default_hourly_operating_cost", d.default_hourly_operating_cost),
        ("reference.default_downtime_cost_per_day", d.default_downtime_cost_per_day),
        ("recommendation.critical_below", rec.critical_below),
        ("recommendation.overhaul_below", rec.overhaul_below),
        ("recommendation.preventive_below", rec.preventive_below),
        ("recommendation.write_off_cost_ratio", rec.write_off_cost_ratio),
        ("recommendation.critical_residual_share", rec.critical_residual_share),
        ("recommendation.overhaul_cost_share", rec.overhaul_cost_share),
    ]
}

/// Validate value ranges on a parsed EngineConfig.
///
/// Returns (errors, warnings). Errors are impossible values that must be
/// rejected; warnings are suspicious but legal.
pub fn validate_ranges(config: &EngineConfig) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let d = &config.reference;
    if !(0.0..=1.0).contains(&d.default_depreciation_rate) {
        errors.push(format!(
            "reference.default_depreciation_rate = {:.3} is outside [0, 1]",
            d.default_depreciation_rate
        ));
    }
    if d.default_hourly_operating_cost < 0.0 {
        errors.push("reference.default_hourly_operating_cost cannot be negative".to_string());
    }
    if d.default_downtime_cost_per_day < 0.0 {
        errors.push("reference.default_downtime_cost_per_day cannot be negative".to_string());
    }

    let rec = &config.recommendation;
    for (name, value) in [
        ("recommendation.write_off_cost_ratio", rec.write_off_cost_ratio),
        ("recommendation.critical_residual_share", rec.critical_residual_share),
        ("recommendation.overhaul_cost_share", rec.overhaul_cost_share),
    ] {
        if value < 0.0 {
            errors.push(format!("{name} = {value:.3} cannot be negative"));
        }
    }

    if config.costs.trailing_window_months == Some(0) {
        errors.push("costs.trailing_window_months must be > 0 when set".to_string());
    }

    // Service life outside 100 h .. 500 000 h is almost certainly a unit mistake
    let life = d.default_service_life_hours;
    if life > 0.0 && !(100.0..=500_000.0).contains(&life) {
        warnings.push(ValidationWarning {
            field: "reference.default_service_life_hours".to_string(),
            message: format!(
                "default_service_life_hours = {life:.0} is outside typical range (100-500000 h)"
            ),
            suggestion: None,
        });
    }

    let horizons = [
        rec.horizon_critical_months,
        rec.horizon_overhaul_months,
        rec.horizon_preventive_months,
        rec.horizon_normal_months,
    ];
    if horizons.windows(2).any(|w| w[0] > w[1]) {
        warnings.push(ValidationWarning {
            field: "recommendation.horizon_*_months".to_string(),
            message: format!(
                "action horizons {horizons:?} are not non-decreasing from critical to normal"
            ),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_identical() {
        assert_eq!(levenshtein("usage_cap", "usage_cap"), 0);
    }

    #[test]
    fn test_levenshtein_one_edit() {
        assert_eq!(levenshtein("usage_cpa", "usage_cap"), 2);
        assert_eq!(levenshtein("reliabilty", "reliability"), 1);
    }

    #[test]
    fn test_levenshtein_empty() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn test_walk_toml_keys_nested() {
        let toml: toml::Value = r#"
            [scoring]
            policy = "linear"
            [scoring.linear.weights]
            usage = 0.4
        "#
        .parse()
        .unwrap();
        let keys = walk_toml_keys(&toml, "");
        assert!(keys.contains(&"scoring".to_string()));
        assert!(keys.contains(&"scoring.policy".to_string()));
        assert!(keys.contains(&"scoring.linear.weights".to_string()));
        assert!(keys.contains(&"scoring.linear.weights.usage".to_string()));
    }

    #[test]
    fn test_typo_key_produces_warning_with_suggestion() {
        let toml_str = r#"
[scoring.refined]
age_decay_rat = 0.12
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].field.contains("age_decay_rat"));
        assert_eq!(
            warnings[0].suggestion.as_deref(),
            Some("scoring.refined.age_decay_rate")
        );
    }

    #[test]
    fn test_all_valid_keys_produce_zero_warnings() {
        let toml_str = r#"
[fleet]
name = "Plant 2"

[scoring]
policy = "refined"

[scoring.refined.weights]
usage = 0.3
age = 0.2
reliability = 0.5

[costs]
trailing_window_months = 12
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert!(warnings.is_empty(), "Expected 0 warnings, got: {:?}", warnings);
    }

    #[test]
    fn test_unknown_section_produces_warning() {
        let warnings = validate_unknown_keys("[scoring.quadratic]\nexponent = 2.0\n");
        assert!(warnings.iter().any(|w| w.field.contains("quadratic")));
    }

    #[test]
    fn test_suggest_correction_no_match_for_garbage() {
        let known = known_config_keys();
        assert!(suggest_correction("completely_unrelated_garbage_key_xyz", &known).is_none());
    }

    #[test]
    fn test_known_keys_cover_serialized_defaults() {
        let known = known_config_keys();
        let toml_str = EngineConfig::default().to_toml().unwrap();
        let value: toml::Value = toml_str.parse().unwrap();
        for key in walk_toml_keys(&value, "") {
            assert!(known.contains(key.as_str()), "serialized key '{key}' missing from known keys");
        }
    }

    #[test]
    fn test_range_errors_for_depreciation_and_window() {
        let mut config = EngineConfig::default();
        config.reference.default_depreciation_rate = 1.5;
        config.costs.trailing_window_months = Some(0);
        let (errors, _) = validate_ranges(&config);
        assert_eq!(errors.len(), 2, "errors: {:?}", errors);
    }

    #[test]
    fn test_range_warning_for_tiny_service_life() {
        let mut config = EngineConfig::default();
        config.reference.default_service_life_hours = 20.0;
        let (errors, warnings) = validate_ranges(&config);
        assert!(errors.is_empty());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_warning_display_includes_suggestion() {
        let w = ValidationWarning {
            field: "fleet.nmae".to_string(),
            message: "Unknown config key 'fleet.nmae'".to_string(),
            suggestion: Some("fleet.name".to_string()),
        };
        assert_eq!(w.to_string(), "Unknown config key 'fleet.nmae' (did you mean 'fleet.name'?)");
    }
}
