//! Built-in policy packs with curated presets.
//!
//! These packs encode deployment archetypes seen across airports, from
//! tight-connection hubs to resort destinations with long dwell times.

use chrono::Utc;

use super::bundle::{PolicyBundle, PolicyData, PolicyMetadata};
use crate::scoring::ScoreWeights;
use crate::urgency::UrgencyThresholds;

/// A named preset wrapping a ready-to-import policy bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyPack {
    /// Stable identifier used on the command line.
    pub id: String,
    /// Display name.
    pub name: String,
    /// One-line summary.
    pub description: String,
    /// Why the preset is tuned the way it is.
    pub rationale: String,
    /// The importable policy.
    pub bundle: PolicyBundle,
}

/// Returns all built-in policy packs.
pub fn builtin_packs() -> Vec<PolicyPack> {
    vec![balanced_hub_pack(), tight_connections_pack(), leisure_destination_pack()]
}

/// Find a built-in pack by ID.
pub fn find_pack(id: &str) -> Option<PolicyPack> {
    builtin_packs().into_iter().find(|p| p.id == id)
}

/// Get pack IDs for listing.
pub fn pack_ids() -> Vec<&'static str> {
    vec!["balanced-hub", "tight-connections", "leisure-destination"]
}

fn pack_bundle(name: &str, intent: &str, policy: PolicyData) -> PolicyBundle {
    PolicyBundle::with_metadata(
        PolicyMetadata {
            name: name.to_string(),
            author: "Layover".to_string(),
            intent: intent.to_string(),
            notes: String::new(),
            created_at: Utc::now(),
        },
        policy,
    )
}

/// Balanced Hub
///
/// The stock tuning for a mixed-traffic terminal.
fn balanced_hub_pack() -> PolicyPack {
    PolicyPack {
        id: "balanced-hub".to_string(),
        name: "Balanced Hub".to_string(),
        description: "Stock tuning for terminals with mixed traffic".to_string(),
        rationale: indoc::indoc! {"
            The default bands and weights. Urgency modes adapt scoring
            per passenger, shelves show four core collections plus two
            dynamic picks, and rotation windows hold six amenities.

            Use this as the baseline and export adjustments from a live
            deployment once real engagement data comes in.

            Best for: General terminals, first-time deployments
        "}
        .to_string(),
        bundle: pack_bundle(
            "Balanced Hub",
            "Baseline tuning for mixed traffic",
            PolicyData::default(),
        ),
    }
}

/// Tight Connections
///
/// For transfer hubs where most passengers are short on time.
fn tight_connections_pack() -> PolicyPack {
    PolicyPack {
        id: "tight-connections".to_string(),
        name: "Tight Connections".to_string(),
        description: "Wider rush bands for transfer hubs with short layovers".to_string(),
        rationale: indoc::indoc! {"
            Transfer hubs see passengers who underestimate how long the
            walk to the gate takes. The rush and imminent bands are
            widened (20 and 50 minutes) so time-crunch scoring kicks in
            earlier, and the normal band ends at 150 minutes because a
            relaxed browse is rare here.

            Shelves carry a single dynamic slot and rotation windows
            shrink to four, keeping the surface small enough to scan
            while walking.

            Best for: Connection banks, domestic-to-international transfers
        "}
        .to_string(),
        bundle: pack_bundle(
            "Tight Connections",
            "Classify passengers as rushed earlier and keep shelves short",
            PolicyData {
                urgency: UrgencyThresholds {
                    rush_max: 20.0,
                    imminent_max: 50.0,
                    soon_max: 90.0,
                    normal_max: 150.0,
                },
                weights: ScoreWeights::time_crunch(),
                mode_profiles: true,
                core_count: 4,
                dynamic_count: 1,
                window_size: 4,
            },
        ),
    }
}

/// Leisure Destination
///
/// For resort airports where dwell times run long.
fn leisure_destination_pack() -> PolicyPack {
    PolicyPack {
        id: "leisure-destination".to_string(),
        name: "Leisure Destination".to_string(),
        description: "Discovery-leaning weights for long-dwell resort airports".to_string(),
        rationale: indoc::indoc! {"
            Resort airports host passengers with hours to spend and a
            holiday mindset. Mode profiles are switched off so the
            leisure weights apply to everyone, favoring popularity and
            personalization over raw proximity.

            The rush band tightens to 10 minutes since genuinely rushed
            passengers are rare, while the normal band stretches to 240
            minutes. Shelves gain a third dynamic slot and windows grow
            to eight amenities to reward browsing.

            Best for: Holiday destinations, terminals with long average dwell
        "}
        .to_string(),
        bundle: pack_bundle(
            "Leisure Destination",
            "Score for discovery instead of speed",
            PolicyData {
                urgency: UrgencyThresholds {
                    rush_max: 10.0,
                    imminent_max: 30.0,
                    soon_max: 75.0,
                    normal_max: 240.0,
                },
                weights: ScoreWeights::leisure(),
                mode_profiles: false,
                core_count: 4,
                dynamic_count: 3,
                window_size: 8,
            },
        ),
    }
}
