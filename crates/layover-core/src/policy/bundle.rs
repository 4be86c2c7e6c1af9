//! Policy bundle for import/export functionality.
//!
//! A policy bundle captures the tunable half of an engine deployment
//! (urgency thresholds, scoring weights, shelf and window sizes) so it
//! can be exported to JSON, shared between airports, and imported with
//! a semantic versioning compatibility check.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::ScoreWeights;
use crate::storage::EngineConfig;
use crate::urgency::UrgencyThresholds;

/// Current policy format version (semver).
/// Changes when the policy structure is modified in a way that affects compatibility.
pub const POLICY_VERSION: &str = "1.0.0";

/// Metadata describing the origin and intent of a policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyMetadata {
    /// Human-readable name for this policy (e.g., "Tight Connections").
    pub name: String,
    /// Author or source of the policy.
    #[serde(default)]
    pub author: String,
    /// Brief description of the policy's intent.
    #[serde(default)]
    pub intent: String,
    /// Additional notes or usage instructions.
    #[serde(default)]
    pub notes: String,
    /// When this policy was created.
    pub created_at: DateTime<Utc>,
}

impl Default for PolicyMetadata {
    fn default() -> Self {
        Self {
            name: "Unnamed Policy".to_string(),
            author: String::new(),
            intent: String::new(),
            notes: String::new(),
            created_at: Utc::now(),
        }
    }
}

/// Engine tunables extracted from configuration.
///
/// Every field carries a serde default so bundles written by an older
/// engine line still import, with fields added since falling back to
/// current defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyData {
    /// Boarding-deadline bands that drive urgency classification.
    #[serde(default)]
    pub urgency: UrgencyThresholds,
    /// Fallback scoring weights (the active weights when mode
    /// profiles are off).
    #[serde(default)]
    pub weights: ScoreWeights,
    /// Whether scoring weights follow the urgency-derived mode.
    #[serde(default = "default_mode_profiles")]
    pub mode_profiles: bool,
    /// Core slots on each vibe shelf.
    #[serde(default = "default_core_count")]
    pub core_count: usize,
    /// Dynamic slots on each vibe shelf.
    #[serde(default = "default_dynamic_count")]
    pub dynamic_count: usize,
    /// Amenities per rotation window below the hero.
    #[serde(default = "default_window_size")]
    pub window_size: usize,
}

fn default_mode_profiles() -> bool {
    true
}
fn default_core_count() -> usize {
    4
}
fn default_dynamic_count() -> usize {
    2
}
fn default_window_size() -> usize {
    6
}

impl Default for PolicyData {
    fn default() -> Self {
        Self {
            urgency: UrgencyThresholds::default(),
            weights: ScoreWeights::default(),
            mode_profiles: default_mode_profiles(),
            core_count: default_core_count(),
            dynamic_count: default_dynamic_count(),
            window_size: default_window_size(),
        }
    }
}

/// A complete policy bundle ready for export/import.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyBundle {
    /// Policy format version (semver).
    pub version: String,
    /// Metadata about this policy.
    pub metadata: PolicyMetadata,
    /// The actual policy settings.
    pub policy: PolicyData,
}

impl PolicyBundle {
    /// Create a new policy bundle with the given name and settings.
    pub fn new(name: String, policy: PolicyData) -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            metadata: PolicyMetadata {
                name,
                ..Default::default()
            },
            policy,
        }
    }

    /// Create a policy bundle with custom metadata.
    pub fn with_metadata(metadata: PolicyMetadata, policy: PolicyData) -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            metadata,
            policy,
        }
    }

    /// Extract a bundle from a deployment's current configuration.
    pub fn from_config(name: &str, config: &EngineConfig) -> Self {
        Self::new(
            name.to_string(),
            PolicyData {
                urgency: config.urgency.clone(),
                weights: config.scoring.weights,
                mode_profiles: config.scoring.mode_profiles,
                core_count: config.selection.core_count,
                dynamic_count: config.selection.dynamic_count,
                window_size: config.selection.window_size,
            },
        )
    }

    /// Serialize the bundle to a JSON string.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a bundle from a JSON string.
    ///
    /// # Errors
    /// Returns an error if deserialization fails or the JSON is invalid.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Apply this policy to a config, overwriting the engine tunables.
    ///
    /// The airport clock offset and variety seed stay deployment-local
    /// and are never carried by a policy.
    pub fn apply_to_config(&self, config: &mut EngineConfig) {
        config.urgency = self.policy.urgency.clone();
        config.scoring.weights = self.policy.weights;
        config.scoring.mode_profiles = self.policy.mode_profiles;
        config.selection.core_count = self.policy.core_count;
        config.selection.dynamic_count = self.policy.dynamic_count;
        config.selection.window_size = self.policy.window_size;
    }
}

impl Default for PolicyBundle {
    fn default() -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            metadata: PolicyMetadata::default(),
            policy: PolicyData::default(),
        }
    }
}
