//! System-wide default constants.
//!
//! Numbers that are not operator-tunable policy but are shared across the
//! summary, narrative and CLI layers.

// ============================================================================
// Fleet Summary
// ============================================================================

/// Health score below which an asset counts as critical in fleet aggregates.
pub const CRITICAL_HEALTH_SCORE: f64 = 40.0;

/// Horizon (months) for the "action inside the next year" dashboard count.
pub const NEAR_TERM_HORIZON_MONTHS: u32 = 12;

/// Horizon (months) for the "action inside six months" count.
pub const SHORT_TERM_HORIZON_MONTHS: u32 = 6;

/// Assets at or above this urgency (priority <= value) count as urgent.
pub const URGENT_PRIORITY_MAX: u8 = 2;

// ============================================================================
// Economics
// ============================================================================

/// Hours per day, for pricing downtime hours at a per-day rate.
pub const HOURS_PER_DAY: f64 = 24.0;

// ============================================================================
// Narrative
// ============================================================================

/// Maximum number of critical assets listed verbatim in an executive prompt.
pub const MAX_CRITICAL_ASSETS_IN_PROMPT: usize = 25;

/// Maximum number of history events listed in a single-asset prompt.
pub const MAX_HISTORY_EVENTS_IN_PROMPT: usize = 10;
