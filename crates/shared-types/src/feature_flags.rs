use serde::{Deserialize, Serialize};

/// Feature flags controlling which optional behaviours are active.
///
/// Loaded from `config.toml` at server startup. Every field defaults to
/// `false` so that a missing or incomplete config file disables all
/// optional features.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct FeatureFlags {
    /// Whether letters are actually submitted to the print channel. When
    /// off, submissions short-circuit to a fixed id without a network call
    /// (used in non-production environments).
    #[serde(default)]
    pub bulk_print: bool,
    /// Whether the reasonable-adjustment diversion path is active.
    #[serde(default)]
    pub reasonable_adjustments: bool,
    #[serde(default)]
    pub telemetry: bool,
}

/// Top-level config file structure matching `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub features: FeatureFlags,
}
