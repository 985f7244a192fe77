//! Engine outputs: SubScores, HealthAssessment, RecommendedAction,
//! Recommendation, EvaluatedAsset, PrioritizedAction, HealthBand

use serde::{Deserialize, Serialize};

use super::AssetRecord;

// ============================================================================
// Health Scoring
// ============================================================================

/// The three independently computed components of the health score, each 0-100.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct SubScores {
    /// Wear from meter reading vs expected service life
    pub usage: f64,
    /// Obsolescence from calendar age
    pub age: f64,
    /// Maintenance history (cost ratio or corrective share, depending on policy)
    pub reliability: f64,
}

/// Result of scoring one asset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HealthAssessment {
    /// Weighted blend of the sub-scores, 0-100
    pub health_score: f64,
    /// Remaining useful life in operating hours, >= 0
    pub rul_hours: f64,
    pub sub_scores: SubScores,
}

/// Dashboard colour band for a health score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum HealthBand {
    Red,
    Amber,
    Green,
}

impl HealthBand {
    /// Red below 40, amber below 70, green otherwise.
    pub fn from_score(score: f64) -> Self {
        if score < 40.0 {
            Self::Red
        } else if score < 70.0 {
            Self::Amber
        } else {
            Self::Green
        }
    }
}

impl std::fmt::Display for HealthBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Red => write!(f, "RED"),
            Self::Amber => write!(f, "AMBER"),
            Self::Green => write!(f, "GREEN"),
        }
    }
}

// ============================================================================
// Recommendations
// ============================================================================

/// Action recommended for an asset, ordered from most to least urgent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    CriticalReplacement,
    EconomicWriteOffReview,
    MajorOverhaul,
    PreventiveMaintenance,
    NormalOperation,
}

impl RecommendedAction {
    /// Human-readable label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::CriticalReplacement => "Critical Replacement",
            Self::EconomicWriteOffReview => "Economic Write-off Review",
            Self::MajorOverhaul => "Major Overhaul",
            Self::PreventiveMaintenance => "Preventive Maintenance",
            Self::NormalOperation => "Normal Operation",
        }
    }

    /// Triage rank: 1 = most urgent, 4 = least urgent.
    pub fn priority(self) -> u8 {
        match self {
            Self::CriticalReplacement | Self::EconomicWriteOffReview => 1,
            Self::MajorOverhaul => 2,
            Self::PreventiveMaintenance => 3,
            Self::NormalOperation => 4,
        }
    }
}

impl std::fmt::Display for RecommendedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Named recommendation record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub action: RecommendedAction,
    /// Short justification
    pub reason: String,
    /// Explanatory text embedding the numbers behind the decision
    pub detail: String,
    /// Months before the action should be executed
    pub horizon_months: u32,
    /// 1 (most urgent) .. 4 (least urgent)
    pub priority: u8,
    /// Estimated currency cost of inaction
    pub economic_impact: f64,
}

// ============================================================================
// Evaluated Asset
// ============================================================================

/// An asset record augmented with everything one evaluation pass computes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluatedAsset {
    #[serde(flatten)]
    pub asset: AssetRecord,
    pub health_score: f64,
    pub sub_scores: SubScores,
    pub rul_hours: f64,
    /// Cost of the maintenance events inside the trailing window
    pub trailing_maintenance_cost: f64,
    /// Events in the full history
    pub maintenance_events: usize,
    pub corrective_events: usize,
    pub downtime_hours: f64,
    /// Downtime hours priced at the reference cost-per-downtime-day
    pub downtime_cost: f64,
    /// Purchase value depreciated at the reference annual rate over the asset's age
    pub depreciated_book_value: f64,
    /// False when the equipment type fell back to reference defaults
    pub reference_matched: bool,
    #[serde(flatten)]
    pub recommendation: Recommendation,
}

impl EvaluatedAsset {
    pub fn id(&self) -> &str {
        &self.asset.id
    }

    pub fn priority(&self) -> u8 {
        self.recommendation.priority
    }

    pub fn health_band(&self) -> HealthBand {
        HealthBand::from_score(self.health_score)
    }
}

/// Projection of an evaluated asset onto the columns of the ranked-action view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrioritizedAction {
    pub asset_id: String,
    pub equipment_type: String,
    pub health_score: f64,
    pub action: RecommendedAction,
    pub reason: String,
    pub detail: String,
    pub horizon_months: u32,
    pub priority: u8,
    pub economic_impact: f64,
}

impl From<&EvaluatedAsset> for PrioritizedAction {
    fn from(evaluated: &EvaluatedAsset) -> Self {
        let rec = &evaluated.recommendation;
        Self {
            asset_id: evaluated.asset.id.clone(),
            equipment_type: evaluated.asset.equipment_type.clone(),
            health_score: evaluated.health_score,
            action: rec.action,
            reason: rec.reason.clone(),
            detail: rec.detail.clone(),
            horizon_months: rec.horizon_months,
            priority: rec.priority,
            economic_impact: rec.economic_impact,
        }
    }
}
