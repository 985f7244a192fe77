//! Shared data structures for fleet health evaluation
//!
//! Input tables (all consumed read-only by the engine):
//! - `AssetRecord`: one row of the asset registry
//! - `MaintenanceEvent`: one service intervention
//! - `ReferenceEntry`: per-equipment-type reference constants
//!
//! Outputs (created fresh on every evaluation pass):
//! - `HealthAssessment`: score, RUL and sub-score breakdown
//! - `Recommendation`: action, reason, horizon, priority, impact
//! - `EvaluatedAsset`: the asset row augmented with both
//! - `PrioritizedAction`: ranked-action view row

mod asset;
mod maintenance;
mod reference;
mod evaluation;

pub use asset::*;
pub use maintenance::*;
pub use reference::*;
pub use evaluation::*;
