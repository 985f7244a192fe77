//! Fleet Health: rule-based asset health scoring and maintenance recommendations
//!
//! Turns an asset registry, a maintenance log and a per-equipment-type
//! reference table into a health score, a remaining-useful-life estimate and
//! a prioritized action for every asset.
//!
//! ## Architecture
//!
//! - **Reference Resolver** (`reference`): per-type constants with default fallback
//! - **Health Scoring** (`scoring`): sub-score curves behind a `HealthPolicy`
//! - **Recommendation** (`recommendation`): ordered band table over the health score
//! - **Fleet** (`fleet`): parallel fleet pass, prioritizer, dashboard aggregates
//! - **Ingest** (`ingest`): CSV adapter for the three input tables
//! - **Narrative** (`narrative`): prompt text for an external summary generator

pub mod config;
pub mod types;
pub mod reference;
pub mod scoring;
pub mod recommendation;
pub mod fleet;
pub mod ingest;
pub mod narrative;

// Re-export engine configuration
pub use config::{ConfigError, EngineConfig, PolicyKind};

// Re-export commonly used types
pub use types::{
    AssetRecord, EvaluatedAsset, HealthAssessment, HealthBand, MaintenanceEvent, MaintenanceKind,
    PrioritizedAction, Recommendation, RecommendedAction, ReferenceEntry, RowError, SubScores,
};

// Re-export the engine operations
pub use reference::{find_reference, resolve_reference, ReferenceConstants};
pub use scoring::{evaluate, policy_from_config, HealthPolicy, LinearPolicy, RefinedPolicy};
pub use recommendation::{recommend, RecommendationInput};
pub use fleet::{
    maintenance_history, prioritize, FleetEvaluation, FleetEvaluator, FleetSummary, RejectedRow,
};
pub use ingest::{IngestError, LoadReport, Loaded};
