//! Collection selection: the "4 core + 2 dynamic" shelf per vibe.
//!
//! Core collections are curated and stable; a time-slot rule table
//! hides and reorders them around the clock. Dynamic collections are
//! gated by time and traveler relevance, ranked by engagement metrics,
//! and nudged by per-slot swap-ins.

use std::cmp::Ordering;

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Collection};
use crate::context::TravelerType;
use crate::metrics::MetricsSnapshot;
use crate::urgency::TimeSlot;
use crate::vibe::Vibe;

/// Default number of core collections on a shelf.
pub const DEFAULT_CORE_COUNT: usize = 4;
/// Default number of dynamic collections on a shelf.
pub const DEFAULT_DYNAMIC_COUNT: usize = 2;

/// Per-(slot, vibe) adjustments to the shelf.
///
/// Slugs in `hide` never appear among the core picks. Slugs in
/// `prioritize` move to the front of the core picks in the listed
/// order. Slugs in `swap_in` jump the dynamic ranking.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwapRule {
    pub hide: &'static [&'static str],
    pub prioritize: &'static [&'static str],
    pub swap_in: &'static [&'static str],
}

impl SwapRule {
    pub fn hides(&self, slug: &str) -> bool {
        self.hide.iter().any(|s| *s == slug)
    }

    pub fn priority_of(&self, slug: &str) -> Option<usize> {
        self.prioritize.iter().position(|s| *s == slug)
    }

    pub fn swaps_in(&self, slug: &str) -> bool {
        self.swap_in.iter().any(|s| *s == slug)
    }
}

fn rule(
    hide: &'static [&'static str],
    prioritize: &'static [&'static str],
    swap_in: &'static [&'static str],
) -> SwapRule {
    SwapRule {
        hide,
        prioritize,
        swap_in,
    }
}

/// The canonical swap-rule table, total over every (slot, vibe) pair.
///
/// Closed enums on both axes mean a missing entry cannot exist, so
/// rule lookup needs no fallible path.
pub fn swap_rule(slot: TimeSlot, vibe: Vibe) -> SwapRule {
    use TimeSlot::*;
    use Vibe::*;
    match (slot, vibe) {
        (EarlyMorning, Refuel) => rule(
            &["fine-dining", "bar-bites"],
            &["breakfast-champions", "grab-go-morning"],
            &["fresh-start", "morning-fuel"],
        ),
        (EarlyMorning, Comfort) => rule(&["spa-wellness"], &["shower-refresh", "quick-rest"], &[]),
        (EarlyMorning, Discover) => {
            rule(&["nightlife-spots"], &["morning-walks", "sunrise-views"], &[])
        }
        (EarlyMorning, Chill) => rule(&["chill-bars"], &["morning-coffee", "quiet-corners"], &[]),
        (EarlyMorning, Shop) => {
            rule(&["luxury-boulevard"], &["travel-essentials", "quick-gifts"], &[])
        }
        (EarlyMorning, Work) => rule(&[], &["quiet-workspaces", "charging-stations"], &[]),
        (EarlyMorning, Quick) => rule(&[], &["grab-and-go", "quick-charge"], &[]),

        (Morning, Refuel) => rule(
            &["fine-dining"],
            &["coffee-chill", "breakfast-champions"],
            &["brunch-spots"],
        ),
        (Morning, Comfort) => {
            rule(&["sleep-solutions"], &["spa-wellness", "premium-lounges"], &[])
        }
        (Morning, Discover) => rule(&[], &["instagram-hotspots", "jewel-wonders"], &[]),
        (Morning, Chill) => rule(&["chill-bars"], &["coffee-casual", "garden-vibes"], &[]),
        (Morning, Shop) => rule(&[], &["duty-free-deals", "singapore-souvenirs"], &[]),
        (Morning, Work) => rule(&[], &["business-lounges", "meeting-rooms"], &[]),
        (Morning, Quick) => rule(&[], &["5-minute-stops", "express-services"], &[]),

        (Afternoon, Refuel) => rule(
            &["breakfast-champions"],
            &["local-eats", "quick-bites"],
            &["lunch-favorites", "afternoon-treats"],
        ),
        (Afternoon, Comfort) => rule(&[], &["spa-wellness", "quiet-sanctuaries"], &[]),
        (Afternoon, Discover) => rule(&[], &["art-culture", "only-at-changi"], &[]),
        (Afternoon, Chill) => rule(&[], &["garden-vibes", "social-lounges"], &[]),
        (Afternoon, Shop) => rule(&[], &["fashion-forward", "tech-gadgets"], &[]),
        (Afternoon, Work) => rule(&[], &["wifi-zones", "quiet-workspaces"], &[]),
        (Afternoon, Quick) => rule(&[], &["gate-essentials", "quick-charge"], &[]),

        (Evening, Refuel) => rule(
            &["breakfast-champions", "morning-fuel"],
            &["fine-dining", "local-eats"],
            &["dinner-delights", "happy-hour"],
        ),
        (Evening, Comfort) => rule(&[], &["premium-lounges", "spa-wellness"], &[]),
        (Evening, Discover) => rule(&[], &["nightlife-spots", "evening-entertainment"], &[]),
        (Evening, Chill) => rule(&["quiet-corners"], &["chill-bars", "social-lounges"], &[]),
        (Evening, Shop) => rule(&[], &["luxury-boulevard", "duty-free-deals"], &[]),
        (Evening, Work) => {
            rule(&["meeting-rooms"], &["quiet-workspaces", "charging-stations"], &[])
        }
        (Evening, Quick) => rule(&[], &["dinner-dash", "evening-essentials"], &[]),

        (LateNight, Refuel) => rule(
            &["fine-dining", "breakfast-champions"],
            &["24-7-eats", "midnight-snacks"],
            &["late-night-comfort"],
        ),
        (LateNight, Comfort) => {
            rule(&["spa-wellness"], &["sleep-solutions", "quiet-sanctuaries"], &[])
        }
        (LateNight, Discover) => rule(
            &["instagram-hotspots", "art-culture"],
            &["24-7-attractions", "quiet-explorations"],
            &[],
        ),
        (LateNight, Chill) => rule(&["garden-vibes"], &["quiet-corners", "24-7-lounges"], &[]),
        (LateNight, Shop) => rule(
            &["fashion-forward", "luxury-boulevard"],
            &["24-7-convenience", "travel-essentials"],
            &[],
        ),
        (LateNight, Work) => {
            rule(&["business-lounges"], &["24-7-workspaces", "charging-stations"], &[])
        }
        (LateNight, Quick) => rule(&[], &["night-essentials", "emergency-services"], &[]),
    }
}

/// Tunables for one selection pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorOptions {
    pub core_count: usize,
    pub dynamic_count: usize,
    /// When set, equal-ranked dynamic candidates are shuffled with this
    /// seed so repeat visitors see some variety; `None` keeps pure
    /// metrics order.
    pub variety_seed: Option<u64>,
}

impl Default for SelectorOptions {
    fn default() -> Self {
        SelectorOptions {
            core_count: DEFAULT_CORE_COUNT,
            dynamic_count: DEFAULT_DYNAMIC_COUNT,
            variety_seed: None,
        }
    }
}

/// Pick the shelf for one vibe: hidden-and-prioritized core picks
/// followed by relevance-gated, engagement-ranked dynamic picks.
///
/// Undersized output is normal when the catalog is thin; core and
/// dynamic never backfill each other.
pub fn select_collections(
    catalog: &Catalog,
    vibe: Vibe,
    slot: TimeSlot,
    traveler: Option<TravelerType>,
    metrics: &MetricsSnapshot,
    options: &SelectorOptions,
) -> Vec<Collection> {
    let rule = swap_rule(slot, vibe);
    let all = catalog.collections_for(vibe);

    let mut core: Vec<&Collection> = all
        .iter()
        .copied()
        .filter(|c| c.is_core && !rule.hides(&c.slug))
        .collect();
    // Stable: slugs outside `prioritize` keep their catalog order.
    core.sort_by_key(|c| rule.priority_of(&c.slug).unwrap_or(usize::MAX));
    core.truncate(options.core_count);

    let mut dynamic: Vec<(&Collection, Option<f64>)> = all
        .iter()
        .copied()
        .filter(|c| !c.is_core && c.relevant_at(slot) && c.relevant_for(traveler))
        .map(|c| {
            let engagement = metrics.get(&c.slug).map(|r| r.engagement_score());
            (c, engagement)
        })
        .collect();
    dynamic.sort_by(|a, b| match (a.1, b.1) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    if let Some(seed) = options.variety_seed {
        shuffle_equal_runs(&mut dynamic, seed);
    }
    let (mut picked, rest): (Vec<_>, Vec<_>) = dynamic
        .into_iter()
        .partition(|(c, _)| rule.swaps_in(&c.slug));
    picked.extend(rest);
    picked.truncate(options.dynamic_count);

    core.into_iter()
        .cloned()
        .chain(picked.into_iter().map(|(c, _)| c.clone()))
        .collect()
}

/// Shuffle runs of equal engagement in place, never across runs, so
/// variety cannot disturb the metrics ranking.
fn shuffle_equal_runs(ranked: &mut [(&Collection, Option<f64>)], seed: u64) {
    let mut rng = Mcg128Xsl64::seed_from_u64(seed);
    let mut start = 0;
    while start < ranked.len() {
        let mut end = start + 1;
        while end < ranked.len() && same_engagement(ranked[start].1, ranked[end].1) {
            end += 1;
        }
        ranked[start..end].shuffle(&mut rng);
        start = end;
    }
}

fn same_engagement(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y) == Ordering::Equal,
        (None, None) => true,
        _ => false,
    }
}

/// Dynamic collections ranked by overlap with the traveler's visit
/// history, for a "picked for you" row.
pub fn personalized_collections(
    catalog: &Catalog,
    vibe: Vibe,
    history: &[String],
    limit: usize,
) -> Vec<Collection> {
    let mut scored: Vec<(&Collection, usize)> = catalog
        .collections_for(vibe)
        .into_iter()
        .filter(|c| !c.is_core)
        .map(|c| {
            let overlap = c
                .amenity_ids
                .iter()
                .filter(|id| history.iter().any(|h| h == *id))
                .count();
            (c, overlap)
        })
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored
        .into_iter()
        .take(limit)
        .map(|(c, _)| c.clone())
        .collect()
}
