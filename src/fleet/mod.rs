//! Fleet pass - evaluate every asset, rank the results
//!
//! ## Pipeline
//!
//! 1. Validate rows; malformed and duplicate rows go to `FleetEvaluation::rejected`
//! 2. Group maintenance events by asset id (once per pass)
//! 3. Per asset, in parallel: resolve reference, score, cost rollup, recommend
//! 4. `prioritize()` sorts the result for the ranked-action view
//!
//! Assets share no mutable state, so the per-asset map runs on rayon. The
//! indexed collect keeps output order equal to input order.

pub mod summary;

pub use summary::{AssetCostRollup, BandCounts, FleetSummary, TypeHealth};

use std::collections::{HashMap, HashSet};

use chrono::{Months, NaiveDate};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{defaults, EngineConfig};
use crate::recommendation::{recommend, RecommendationInput};
use crate::reference::{resolve_reference, ReferenceConstants};
use crate::scoring::{evaluate_with_stats, policy_from_config, HealthPolicy, HistoryStats};
use crate::types::{
    AssetRecord, EvaluatedAsset, MaintenanceEvent, PrioritizedAction, ReferenceEntry, RowError,
};

/// An asset row excluded from the pass.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RejectedRow {
    /// Position in the input asset table
    pub row_index: usize,
    /// Identifier as given, if any
    pub asset_id: Option<String>,
    pub error: RowError,
}

/// Outcome of one fleet pass.
#[derive(Debug, Clone, Serialize, Default)]
pub struct FleetEvaluation {
    /// One entry per accepted asset row, in input order
    pub assets: Vec<EvaluatedAsset>,
    pub rejected: Vec<RejectedRow>,
}

impl FleetEvaluation {
    /// Ranked-action view of the accepted assets.
    pub fn prioritized(&self) -> Vec<PrioritizedAction> {
        prioritize(&self.assets)
    }

    /// Look up an evaluated asset; ids are compared trimmed.
    pub fn find(&self, asset_id: &str) -> Option<&EvaluatedAsset> {
        let asset_id = asset_id.trim();
        self.assets.iter().find(|a| a.id().trim() == asset_id)
    }

    /// Dashboard aggregates over the accepted assets.
    pub fn summary(&self) -> FleetSummary {
        let mut summary = FleetSummary::from_assets(&self.assets);
        summary.rejected_rows = self.rejected.len();
        summary
    }
}

/// Runs fleet passes against one engine config.
pub struct FleetEvaluator<'a> {
    config: &'a EngineConfig,
    policy: Box<dyn HealthPolicy>,
    as_of: NaiveDate,
}

impl<'a> FleetEvaluator<'a> {
    /// Evaluator for today's date using the policy named in `config`.
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            config,
            policy: policy_from_config(&config.scoring),
            as_of: chrono::Local::now().date_naive(),
        }
    }

    /// Anchor the trailing cost window at `as_of` instead of today.
    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = as_of;
        self
    }

    /// Replace the configured policy.
    pub fn with_policy(mut self, policy: Box<dyn HealthPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    pub fn policy(&self) -> &dyn HealthPolicy {
        self.policy.as_ref()
    }

    /// Evaluate every asset. Never fails: bad rows are reported in `rejected`.
    pub fn evaluate_fleet(
        &self,
        assets: &[AssetRecord],
        events: &[MaintenanceEvent],
        reference: &[ReferenceEntry],
    ) -> FleetEvaluation {
        let (accepted, rejected) = partition_rows(assets);
        for row in &rejected {
            warn!(row = row.row_index, error = %row.error, "Asset row rejected");
        }

        let by_asset = group_by_asset(events);
        let orphans = events.len() - by_asset.values().map(Vec::len).sum::<usize>();
        let known: HashSet<&str> = accepted.iter().map(|a| a.id.trim()).collect();
        let unmatched = by_asset.keys().filter(|id| !known.contains(*id)).count();
        if orphans > 0 || unmatched > 0 {
            debug!(orphans, unmatched_assets = unmatched, "Maintenance events without a scored asset");
        }

        let evaluated: Vec<EvaluatedAsset> = accepted
            .par_iter()
            .map(|asset| {
                let history = by_asset.get(asset.id.trim()).map_or(&[][..], Vec::as_slice);
                self.evaluate_asset(asset, history, reference)
            })
            .collect();

        let fallbacks = evaluated.iter().filter(|a| !a.reference_matched).count();
        info!(
            policy = %self.policy.kind(),
            assets = evaluated.len(),
            rejected = rejected.len(),
            events = events.len(),
            reference_fallbacks = fallbacks,
            "Fleet evaluation complete"
        );

        FleetEvaluation {
            assets: evaluated,
            rejected,
        }
    }

    /// Evaluate one asset against its own (pre-filtered) history.
    pub fn evaluate_asset(
        &self,
        asset: &AssetRecord,
        history: &[&MaintenanceEvent],
        reference: &[ReferenceEntry],
    ) -> EvaluatedAsset {
        let constants = resolve_reference(&asset.equipment_type, reference, &self.config.reference);
        let stats = HistoryStats::from_events(history.iter().copied());
        let assessment = evaluate_with_stats(asset, &stats, &constants, self.policy.as_ref());

        let trailing_cost = trailing_maintenance_cost(
            history.iter().copied(),
            self.as_of,
            self.config.costs.trailing_window_months,
        );

        let input = RecommendationInput::new(&assessment, trailing_cost, asset.residual_value);
        let recommendation = recommend(&input, &constants, &self.config.recommendation);

        EvaluatedAsset {
            asset: asset.clone(),
            health_score: assessment.health_score,
            sub_scores: assessment.sub_scores,
            rul_hours: assessment.rul_hours,
            trailing_maintenance_cost: trailing_cost,
            maintenance_events: stats.total_events,
            corrective_events: stats.corrective_events,
            downtime_hours: stats.downtime_hours,
            downtime_cost: downtime_cost(stats.downtime_hours, &constants),
            depreciated_book_value: depreciated_book_value(asset, &constants),
            reference_matched: constants.matched,
            recommendation,
        }
    }
}

/// Split rows into scoreable and rejected. First occurrence of an id wins.
fn partition_rows(assets: &[AssetRecord]) -> (Vec<&AssetRecord>, Vec<RejectedRow>) {
    let mut seen: HashSet<&str> = HashSet::with_capacity(assets.len());
    let mut accepted = Vec::with_capacity(assets.len());
    let mut rejected = Vec::new();

    for (row_index, asset) in assets.iter().enumerate() {
        let result = asset.validate().and_then(|()| {
            if seen.insert(asset.id.trim()) {
                Ok(())
            } else {
                Err(RowError::DuplicateIdentifier(asset.id.clone()))
            }
        });
        match result {
            Ok(()) => accepted.push(asset),
            Err(error) => rejected.push(RejectedRow {
                row_index,
                asset_id: Some(asset.id.clone()).filter(|id| !id.trim().is_empty()),
                error,
            }),
        }
    }
    (accepted, rejected)
}

/// Index events by asset id. Events with a blank id are dropped.
pub fn group_by_asset(events: &[MaintenanceEvent]) -> HashMap<&str, Vec<&MaintenanceEvent>> {
    let mut map: HashMap<&str, Vec<&MaintenanceEvent>> = HashMap::new();
    for event in events {
        let id = event.asset_id.trim();
        if !id.is_empty() {
            map.entry(id).or_default().push(event);
        }
    }
    map
}

/// Spend on events inside the trailing window ending at `as_of`.
///
/// `None` counts the whole history. Undated events always count.
pub fn trailing_maintenance_cost<'e>(
    history: impl IntoIterator<Item = &'e MaintenanceEvent>,
    as_of: NaiveDate,
    window_months: Option<u32>,
) -> f64 {
    let start = window_months.and_then(|m| as_of.checked_sub_months(Months::new(m)));
    history
        .into_iter()
        .filter(|event| match (start, event.date) {
            (Some(start), Some(date)) => date > start,
            _ => true,
        })
        .map(MaintenanceEvent::total_cost)
        .sum()
}

/// Downtime hours priced at the reference per-day rate.
pub fn downtime_cost(downtime_hours: f64, reference: &ReferenceConstants) -> f64 {
    downtime_hours / defaults::HOURS_PER_DAY * reference.downtime_cost_per_day
}

/// `purchase_value * (1 - rate)^age`, floored at 0.
pub fn depreciated_book_value(asset: &AssetRecord, reference: &ReferenceConstants) -> f64 {
    let rate = reference.annual_depreciation_rate.clamp(0.0, 1.0);
    let age = asset.age_years.max(0.0);
    (asset.purchase_value * (1.0 - rate).powf(age)).max(0.0)
}

/// Rank assets most urgent first: ascending (priority, health score).
///
/// Stable, so equal keys keep their input order.
pub fn prioritize(assets: &[EvaluatedAsset]) -> Vec<PrioritizedAction> {
    let mut ranked: Vec<&EvaluatedAsset> = assets.iter().collect();
    ranked.sort_by(|a, b| {
        a.priority()
            .cmp(&b.priority())
            .then_with(|| a.health_score.total_cmp(&b.health_score))
    });
    ranked.into_iter().map(PrioritizedAction::from).collect()
}

/// One asset's events, most recent first. Undated events go last.
pub fn maintenance_history<'e>(asset_id: &str, events: &'e [MaintenanceEvent]) -> Vec<&'e MaintenanceEvent> {
    let asset_id = asset_id.trim();
    let mut history: Vec<&MaintenanceEvent> =
        events.iter().filter(|e| e.asset_id.trim() == asset_id).collect();
    history.sort_by(|a, b| b.date.cmp(&a.date));
    history
}
