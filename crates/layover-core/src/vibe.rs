//! The fixed set of traveler-need categories ("vibes") and their
//! urgency-driven priority tables.
//!
//! The seven vibes never change at runtime. Each urgency state owns a
//! static total ordering over them; lookups are O(1) table reads with a
//! fallback order for the no-deadline case.

use serde::{Deserialize, Serialize};

use crate::urgency::UrgencyState;

/// One of the seven fixed traveler-need categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vibe {
    /// Food and drinks.
    Refuel,
    /// Unique experiences and attractions.
    Discover,
    /// Low-key relaxation.
    Chill,
    /// Rest, showers, lounges.
    Comfort,
    /// Productivity spaces.
    Work,
    /// Retail and duty free.
    Shop,
    /// Fast essentials near the gate.
    Quick,
}

impl Vibe {
    pub const ALL: [Vibe; 7] = [
        Vibe::Refuel,
        Vibe::Discover,
        Vibe::Chill,
        Vibe::Comfort,
        Vibe::Work,
        Vibe::Shop,
        Vibe::Quick,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Vibe::Refuel => "refuel",
            Vibe::Discover => "discover",
            Vibe::Chill => "chill",
            Vibe::Comfort => "comfort",
            Vibe::Work => "work",
            Vibe::Shop => "shop",
            Vibe::Quick => "quick",
        }
    }

    /// Capitalized display name.
    pub fn label(&self) -> &'static str {
        match self {
            Vibe::Refuel => "Refuel",
            Vibe::Discover => "Discover",
            Vibe::Chill => "Chill",
            Vibe::Comfort => "Comfort",
            Vibe::Work => "Work",
            Vibe::Shop => "Shop",
            Vibe::Quick => "Quick",
        }
    }
}

impl std::fmt::Display for Vibe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Vibe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "refuel" => Ok(Vibe::Refuel),
            "discover" => Ok(Vibe::Discover),
            "chill" => Ok(Vibe::Chill),
            "comfort" => Ok(Vibe::Comfort),
            "work" => Ok(Vibe::Work),
            "shop" => Ok(Vibe::Shop),
            "quick" => Ok(Vibe::Quick),
            _ => Err(format!("unknown vibe '{s}'")),
        }
    }
}

/// Priority ordering of all seven vibes for an urgency state.
///
/// Under `Rush` the fast/essential categories dominate; under `Extended`
/// exploration leads. Always a full permutation.
pub fn order_for_urgency(urgency: UrgencyState) -> [Vibe; 7] {
    use Vibe::*;
    match urgency {
        // 0-15 mins: grab essentials only
        UrgencyState::Rush => [Quick, Refuel, Chill, Comfort, Work, Shop, Discover],
        // 16-45 mins: quick bite time
        UrgencyState::Imminent => [Refuel, Quick, Chill, Shop, Comfort, Work, Discover],
        // 46-90 mins: relaxation time
        UrgencyState::Soon => [Comfort, Refuel, Chill, Shop, Work, Quick, Discover],
        // 91-180 mins: productivity/exploration time
        UrgencyState::Normal => [Work, Comfort, Discover, Refuel, Chill, Shop, Quick],
        // 180+ mins: entertainment priority
        UrgencyState::Extended => [Discover, Comfort, Refuel, Work, Shop, Chill, Quick],
    }
}

/// Fallback ordering when no urgency context applies.
pub fn default_order() -> [Vibe; 7] {
    use Vibe::*;
    [Refuel, Discover, Chill, Shop, Comfort, Work, Quick]
}

/// Whether a vibe deserves visual emphasis under the given urgency.
pub fn should_highlight(vibe: Vibe, urgency: UrgencyState) -> bool {
    priority_vibes(urgency).contains(&vibe)
}

fn priority_vibes(urgency: UrgencyState) -> &'static [Vibe] {
    use Vibe::*;
    match urgency {
        UrgencyState::Rush => &[Quick],
        UrgencyState::Imminent => &[Refuel, Quick],
        UrgencyState::Soon => &[Comfort, Refuel],
        UrgencyState::Normal => &[Work, Comfort],
        UrgencyState::Extended => &[Discover, Comfort],
    }
}

/// Presentation hint attached to a ranked vibe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    /// The vibe ranked first for this urgency.
    TopPick,
    /// Highlighted for this urgency, but not ranked first.
    Suggested,
}

impl Badge {
    pub fn label(&self) -> &'static str {
        match self {
            Badge::TopPick => "Top pick",
            Badge::Suggested => "Suggested",
        }
    }
}

/// Badge for a vibe under an urgency state, if it earns one.
///
/// `TopPick` is reserved for the vibe at position 0 of the ordering, so a
/// badge can never contradict the ranking it accompanies.
pub fn badge_for(vibe: Vibe, urgency: UrgencyState) -> Option<Badge> {
    if order_for_urgency(urgency)[0] == vibe {
        Some(Badge::TopPick)
    } else if should_highlight(vibe, urgency) {
        Some(Badge::Suggested)
    } else {
        None
    }
}
