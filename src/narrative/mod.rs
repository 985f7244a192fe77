//! Template-based prompts for the narrative collaborator
//!
//! Builds the text handed to an external text-generation service. Only
//! evaluated outputs and fleet aggregates go into a prompt, never raw
//! scoring internals. This crate does not call the service.

use crate::config::defaults::{MAX_CRITICAL_ASSETS_IN_PROMPT, MAX_HISTORY_EVENTS_IN_PROMPT};
use crate::fleet::FleetSummary;
use crate::types::{EvaluatedAsset, MaintenanceEvent};

/// Executive summary request over the whole fleet.
///
/// Sections: fleet headline numbers, weakest equipment types, critical
/// assets (capped), and the requested structure of the answer.
pub fn executive_summary_prompt(
    summary: &FleetSummary,
    assets: &[EvaluatedAsset],
    currency: &str,
) -> String {
    let mut sections = Vec::new();

    sections.push(
        "You are an expert consultant in industrial asset management. \
         Write a professional executive summary based on the following data."
            .to_string(),
    );

    sections.push(format!(
        "## Fleet\n\n\
         - Total assets: {}\n\
         - Critical assets (health score < 40): {}\n\
         - Average fleet health score: {:.1}\n\
         - Average age: {:.1} years\n\
         - Actions due within 6 months: {}\n\
         - Actions due within 12 months: {}\n\
         - Urgent actions (priority 1-2): {}\n\
         - Estimated economic impact of inaction: {:.0} {}",
        summary.total_assets,
        summary.critical_assets,
        summary.average_health,
        summary.average_age_years,
        summary.actions_within_6_months,
        summary.actions_within_12_months,
        summary.urgent_actions,
        summary.total_economic_impact,
        currency,
    ));

    if !summary.by_type.is_empty() {
        let mut lines = vec!["## Equipment types (weakest first)\n".to_string()];
        for t in &summary.by_type {
            lines.push(format!(
                "- {}: {} asset(s), average health {:.1}",
                t.equipment_type, t.assets, t.average_health
            ));
        }
        sections.push(lines.join("\n"));
    }

    let critical = FleetSummary::critical(assets);
    let mut lines = vec!["## Critical assets\n".to_string()];
    if critical.is_empty() {
        lines.push("No critical assets.".to_string());
    } else {
        for a in critical.iter().take(MAX_CRITICAL_ASSETS_IN_PROMPT) {
            lines.push(format!(
                "- {} ({}): health {:.1}, {}",
                a.id(),
                a.asset.equipment_type,
                a.health_score,
                a.recommendation.action
            ));
        }
        if critical.len() > MAX_CRITICAL_ASSETS_IN_PROMPT {
            lines.push(format!(
                "- ... and {} more",
                critical.len() - MAX_CRITICAL_ASSETS_IN_PROMPT
            ));
        }
    }
    sections.push(lines.join("\n"));

    sections.push(
        "Write 200-300 words covering:\n\
         1. Overall fleet condition\n\
         2. Main risks\n\
         3. Priority recommendations\n\
         4. Estimated economic impact"
            .to_string(),
    );

    sections.join("\n\n")
}

/// Technical report request for one asset.
///
/// `history` is expected most recent first (see `fleet::maintenance_history`).
pub fn asset_analysis_prompt(asset: &EvaluatedAsset, history: &[&MaintenanceEvent], currency: &str) -> String {
    let a = &asset.asset;
    let rec = &asset.recommendation;
    let mut sections = Vec::new();

    sections.push(format!(
        "Analyze this industrial asset and write a technical report.\n\n\
         - ID: {}\n\
         - Type: {}\n\
         - Brand/Model: {} {}\n\
         - Age: {:.0} years\n\
         - Health score: {:.1} (usage {:.1}, age {:.1}, reliability {:.1})\n\
         - Meter reading: {:.0} h\n\
         - RUL: {:.0} h\n\
         - Maintenance cost: {:.0} {} over {} event(s), {} corrective\n\
         - Recommended action: {} within {} months ({})",
        a.id,
        a.equipment_type,
        a.brand,
        a.model,
        a.age_years,
        asset.health_score,
        asset.sub_scores.usage,
        asset.sub_scores.age,
        asset.sub_scores.reliability,
        a.current_hours,
        asset.rul_hours,
        asset.trailing_maintenance_cost,
        currency,
        asset.maintenance_events,
        asset.corrective_events,
        rec.action,
        rec.horizon_months,
        rec.reason,
    ));

    if !history.is_empty() {
        let mut lines = vec!["## Recent maintenance\n".to_string()];
        for event in history.iter().take(MAX_HISTORY_EVENTS_IN_PROMPT) {
            let date = event
                .date
                .map_or_else(|| "undated".to_string(), |d| d.format("%Y-%m-%d").to_string());
            lines.push(format!(
                "- {} {}: {:.0} {}, {:.1} h down. {}",
                date,
                event.kind,
                event.total_cost(),
                currency,
                event.downtime(),
                event.description
            ));
        }
        sections.push(lines.join("\n"));
    }

    sections.push(
        "Write 150-200 words covering:\n\
         1. Diagnosis of the current condition\n\
         2. Risk factors\n\
         3. Specific technical recommendation"
            .to_string(),
    );

    sections.join("\n\n")
}

/// Free-form question about the fleet, answered over a compact per-asset table.
pub fn fleet_question_prompt(assets: &[EvaluatedAsset], question: &str) -> String {
    let mut table = vec!["id | type | health | age | action".to_string()];
    for a in assets {
        table.push(format!(
            "{} | {} | {:.1} | {:.0} | {}",
            a.id(),
            a.asset.equipment_type,
            a.health_score,
            a.asset.age_years,
            a.recommendation.action
        ));
    }

    format!(
        "You are an expert in heavy machinery management for construction and concrete.\n\n\
         ## Fleet data\n\n{}\n\n\
         ## Question\n\n{}\n\n\
         Answer professionally and concisely, with actionable recommendations.",
        table.join("\n"),
        question.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::fleet::{maintenance_history, FleetEvaluator};
    use crate::types::{AssetRecord, MaintenanceKind};

    fn evaluated() -> Vec<EvaluatedAsset> {
        let config = EngineConfig::default();
        let eval = FleetEvaluator::new(&config);
        let mut worn = AssetRecord::new("TR-09", "Mixer Truck", 40_000.0);
        worn.age_years = 25.0;
        let fresh = AssetRecord::new("EX-01", "Excavator", 100.0);
        let events = vec![MaintenanceEvent::new("TR-09", MaintenanceKind::Corrective).with_costs(900.0, 100.0)];
        eval.evaluate_fleet(&[worn, fresh], &events, &[]).assets
    }

    #[test]
    fn test_executive_prompt_lists_critical_assets() {
        let assets = evaluated();
        let summary = FleetSummary::from_assets(&assets);
        let prompt = executive_summary_prompt(&summary, &assets, "CLP");
        assert!(prompt.contains("Total assets: 2"), "{prompt}");
        assert!(prompt.contains("TR-09 (Mixer Truck)"), "{prompt}");
        assert!(!prompt.contains("EX-01 (Excavator)"), "{prompt}");
        assert!(prompt.contains("## Equipment types"));
    }

    #[test]
    fn test_executive_prompt_without_critical_assets() {
        let assets: Vec<EvaluatedAsset> = evaluated().into_iter().filter(|a| a.id() == "EX-01").collect();
        let summary = FleetSummary::from_assets(&assets);
        let prompt = executive_summary_prompt(&summary, &assets, "USD");
        assert!(prompt.contains("No critical assets."));
    }

    #[test]
    fn test_asset_prompt_includes_history() {
        let events = vec![
            MaintenanceEvent::new("TR-09", MaintenanceKind::Corrective)
                .with_costs(900.0, 100.0)
                .with_date(chrono::NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()),
        ];
        let assets = evaluated();
        let history = maintenance_history("TR-09", &events);
        let prompt = asset_analysis_prompt(&assets[0], &history, "CLP");
        assert!(prompt.contains("ID: TR-09"));
        assert!(prompt.contains("2025-08-01 Corrective: 1000 CLP"), "{prompt}");
    }

    #[test]
    fn test_question_prompt() {
        let prompt = fleet_question_prompt(&evaluated(), "  Which trucks should we replace first? ");
        assert!(prompt.contains("TR-09 | Mixer Truck"));
        assert!(prompt.ends_with("actionable recommendations."));
        assert!(prompt.contains("## Question\n\nWhich trucks should we replace first?\n\n"));
    }
}
