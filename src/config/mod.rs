//! Engine Configuration Module
//!
//! Scoring policy, recommendation bands and reference fallbacks loaded from a
//! TOML file, replacing hardcoded constants with operator-tunable values.
//!
//! ## Loading Order
//!
//! 1. `FLEET_HEALTH_CONFIG` environment variable (path to TOML file)
//! 2. `fleet_health.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! The engine itself takes `&EngineConfig` explicitly. Binaries call
//! `config::init()` once at startup and may read it back with `config::get()`:
//!
//! ```ignore
//! config::init(EngineConfig::load());
//! let cap = config::get().scoring.refined.usage_cap;
//! ```

mod engine_config;
pub mod defaults;
pub mod validation;

pub use engine_config::*;

use std::sync::OnceLock;

/// Process-wide engine configuration, initialized once at startup.
static ENGINE_CONFIG: OnceLock<EngineConfig> = OnceLock::new();

/// Initialize the global engine configuration.
///
/// A second call is ignored with a warning.
pub fn init(config: EngineConfig) {
    if ENGINE_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// Get the global engine configuration, or the built-in defaults when
/// `init()` has not been called.
pub fn get() -> &'static EngineConfig {
    ENGINE_CONFIG.get_or_init(EngineConfig::default)
}
