//! Traveler context: the per-request inputs a ranking pass reads from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Amenity;
use crate::ordering::DayPart;
use crate::urgency::{TimeSlot, UrgencyState, UrgencyThresholds};

/// Broad traveler segment used for collection relevance gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TravelerType {
    Business,
    Leisure,
    Family,
    Transit,
}

impl TravelerType {
    pub const ALL: [TravelerType; 4] = [
        TravelerType::Business,
        TravelerType::Leisure,
        TravelerType::Family,
        TravelerType::Transit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TravelerType::Business => "business",
            TravelerType::Leisure => "leisure",
            TravelerType::Family => "family",
            TravelerType::Transit => "transit",
        }
    }
}

impl std::fmt::Display for TravelerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TravelerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "business" => Ok(TravelerType::Business),
            "leisure" => Ok(TravelerType::Leisure),
            "family" => Ok(TravelerType::Family),
            "transit" => Ok(TravelerType::Transit),
            other => Err(format!("unknown traveler type: {other}")),
        }
    }
}

/// Optional preference signals for the personalization score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelerProfile {
    #[serde(default)]
    pub preferred_price: Option<crate::catalog::PriceTier>,
    /// Dietary needs matched against amenity tags ("halal", "vegan", ...).
    #[serde(default)]
    pub dietary: Vec<String>,
    /// Amenity ids already visited this layover.
    #[serde(default)]
    pub visited: Vec<String>,
}

impl TravelerProfile {
    /// Affinity of this profile for an amenity, in [0, 100].
    ///
    /// Starts from a neutral 50. Price match adds 30 for an exact tier,
    /// 10 for an adjacent one. Each satisfied dietary need adds 20. An
    /// already-visited amenity loses 30.
    pub fn affinity_for(&self, amenity: &Amenity) -> f64 {
        let mut score: f64 = 50.0;
        if let (Some(preferred), Some(actual)) = (self.preferred_price, amenity.price_tier) {
            let gap = (preferred.rank() - actual.rank()).abs();
            if gap == 0 {
                score += 30.0;
            } else if gap == 1 {
                score += 10.0;
            }
        }
        for need in &self.dietary {
            if amenity.has_tag(need) {
                score += 20.0;
            }
        }
        if self.visited.iter().any(|id| id == &amenity.id) {
            score -= 30.0;
        }
        score.clamp(0.0, 100.0)
    }
}

/// Everything a ranking pass knows about one traveler at one moment.
///
/// Built with `new` plus `with_*` setters; every field past the clock
/// is optional and absent fields degrade to neutral behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelerContext {
    pub now: DateTime<Utc>,
    /// Offset of the airport's local clock from UTC, in minutes.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(default)]
    pub boarding_deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub traveler_type: Option<TravelerType>,
    #[serde(default)]
    pub profile: Option<TravelerProfile>,
    #[serde(default)]
    pub terminal: Option<String>,
    /// Seed for deterministic tie shuffling; `None` keeps catalog order.
    #[serde(default)]
    pub variety_seed: Option<u64>,
}

impl TravelerContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        TravelerContext {
            now,
            utc_offset_minutes: 0,
            boarding_deadline: None,
            traveler_type: None,
            profile: None,
            terminal: None,
            variety_seed: None,
        }
    }

    pub fn with_utc_offset(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.boarding_deadline = Some(deadline);
        self
    }

    pub fn with_traveler_type(mut self, traveler: TravelerType) -> Self {
        self.traveler_type = Some(traveler);
        self
    }

    pub fn with_profile(mut self, profile: TravelerProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn with_terminal(mut self, terminal: impl Into<String>) -> Self {
        self.terminal = Some(terminal.into());
        self
    }

    pub fn with_variety_seed(mut self, seed: u64) -> Self {
        self.variety_seed = Some(seed);
        self
    }

    /// Minutes until boarding, negative if the deadline has passed.
    pub fn minutes_to_boarding(&self) -> Option<f64> {
        self.boarding_deadline
            .map(|deadline| (deadline - self.now).num_milliseconds() as f64 / 60_000.0)
    }

    pub fn urgency(&self, thresholds: &UrgencyThresholds) -> UrgencyState {
        UrgencyState::from_deadline(self.now, self.boarding_deadline, thresholds)
    }

    /// Hour of day on the airport's local clock.
    pub fn local_hour(&self) -> u32 {
        use chrono::Timelike;
        (self.now + chrono::Duration::minutes(self.utc_offset_minutes as i64)).hour()
    }

    pub fn time_slot(&self) -> TimeSlot {
        TimeSlot::at(self.now, self.utc_offset_minutes)
    }

    pub fn day_part(&self) -> DayPart {
        DayPart::from_hour(self.local_hour())
    }
}
