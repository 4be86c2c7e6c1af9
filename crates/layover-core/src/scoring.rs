//! Multi-factor amenity scoring.
//!
//! Every amenity gets five factor scores in [0, 100]; a weighted sum
//! produces the total used for ranking. Weights come from a named
//! profile chosen by score mode, so a rushed traveler weighs proximity
//! and availability while a long layover weighs personalization.

use serde::{Deserialize, Serialize};

use crate::catalog::{Amenity, OpenState};
use crate::context::TravelerProfile;
use crate::error::ConfigError;
use crate::urgency::UrgencyState;

/// Weights for each scoring factor.
///
/// All five must lie in [0.0, 1.0] and sum to 1.0 so the weighted total
/// stays on the same [0, 100] scale as the factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Weight for walking distance (higher = prefer closer venues).
    pub proximity: f64,
    /// Weight for time-of-day fit (breakfast places in the morning).
    pub temporal: f64,
    /// Weight for stored popularity.
    pub popularity: f64,
    /// Weight for being open and uncrowded right now.
    pub availability: f64,
    /// Weight for traveler profile affinity.
    pub personalization: f64,
}

impl ScoreWeights {
    /// Default balanced profile.
    pub fn balanced() -> Self {
        Self {
            proximity: 0.25,
            temporal: 0.35,
            popularity: 0.15,
            availability: 0.10,
            personalization: 0.15,
        }
    }

    /// Boarding is close: distance and open-now dominate.
    pub fn time_crunch() -> Self {
        Self {
            proximity: 0.45,
            temporal: 0.15,
            popularity: 0.05,
            availability: 0.25,
            personalization: 0.10,
        }
    }

    /// Long layover: quality and personal fit over distance.
    pub fn leisure() -> Self {
        Self {
            proximity: 0.10,
            temporal: 0.25,
            popularity: 0.25,
            availability: 0.10,
            personalization: 0.30,
        }
    }

    /// Normalize weights to sum to 1.0.
    pub fn normalize(&mut self) {
        let sum = self.proximity
            + self.temporal
            + self.popularity
            + self.availability
            + self.personalization;
        if sum > 0.0 {
            self.proximity /= sum;
            self.temporal /= sum;
            self.popularity /= sum;
            self.availability /= sum;
            self.personalization /= sum;
        }
    }

    /// Validate that each weight is in [0.0, 1.0] and they sum to 1.0.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = [
            ("proximity", self.proximity),
            ("temporal", self.temporal),
            ("popularity", self.popularity),
            ("availability", self.availability),
            ("personalization", self.personalization),
        ];
        let mut sum = 0.0;
        for (name, weight) in weights {
            if !(0.0..=1.0).contains(&weight) {
                return Err(ConfigError::InvalidValue {
                    key: format!("scoring.{name}"),
                    message: format!("must be in [0.0, 1.0], got {weight}"),
                });
            }
            sum += weight;
        }
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::InvalidValue {
                key: "scoring".to_string(),
                message: format!("weights must sum to 1.0, got {sum}"),
            });
        }
        Ok(())
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self::balanced()
    }
}

/// How aggressively the scorer trades quality for speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreMode {
    TimeCrunch,
    Explorer,
    Leisure,
}

impl ScoreMode {
    pub fn from_urgency(urgency: UrgencyState) -> Self {
        match urgency {
            UrgencyState::Rush | UrgencyState::Imminent => ScoreMode::TimeCrunch,
            UrgencyState::Extended => ScoreMode::Leisure,
            _ => ScoreMode::Explorer,
        }
    }

    pub fn weights(&self) -> ScoreWeights {
        match self {
            ScoreMode::TimeCrunch => ScoreWeights::time_crunch(),
            ScoreMode::Explorer => ScoreWeights::balanced(),
            ScoreMode::Leisure => ScoreWeights::leisure(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreMode::TimeCrunch => "Time crunch",
            ScoreMode::Explorer => "Explorer",
            ScoreMode::Leisure => "Leisure",
        }
    }

    /// Short display notes explaining what this mode optimizes for.
    pub fn recommendations(&self) -> [&'static str; 3] {
        match self {
            ScoreMode::TimeCrunch => [
                "Showing nearest options first",
                "Filtered for quick service",
                "Currently open venues only",
            ],
            ScoreMode::Explorer => [
                "Balanced distance and quality",
                "Mix of popular and hidden gems",
                "Perfect for your layover time",
            ],
            ScoreMode::Leisure => [
                "Curated for best experiences",
                "Personalized to your preferences",
                "Discover something special",
            ],
        }
    }
}

/// Per-factor scores for one amenity, plus the weighted total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub proximity: f64,
    pub temporal: f64,
    pub popularity: f64,
    pub availability: f64,
    pub personalization: f64,
    pub total: f64,
}

impl ScoreBreakdown {
    pub fn is_open(&self) -> bool {
        self.availability > 50.0
    }

    pub fn matches_preferences(&self) -> bool {
        self.personalization > 70.0
    }

    pub fn peak_time(&self) -> bool {
        self.temporal > 80.0
    }
}

/// Walking-distance factor: tiered, closer is better.
pub fn proximity_score(walking_minutes: u32) -> f64 {
    match walking_minutes {
        0 => 100.0,
        1..=5 => 80.0,
        6..=10 => 50.0,
        11..=15 => 20.0,
        _ => 0.0,
    }
}

/// Time-of-day factor: matches amenity tags against meal and social
/// windows on the local clock. Anything outside a window, or untagged
/// within one, scores a neutral 50.
pub fn temporal_score(hour: u32, amenity: &Amenity) -> f64 {
    if (6..11).contains(&hour) {
        if amenity.has_tag("breakfast") || amenity.has_tag("coffee") {
            return 100.0;
        }
        if amenity.has_tag("bakery") || amenity.has_tag("cafe") {
            return 80.0;
        }
    }
    if (11..14).contains(&hour) {
        if amenity.has_tag("lunch") || amenity.has_tag("hawker") {
            return 100.0;
        }
        if amenity.has_tag("quick") || amenity.has_tag("fast") {
            return 80.0;
        }
    }
    if (17..19).contains(&hour) {
        if amenity.has_tag("bar") || amenity.has_tag("cocktail") {
            return 100.0;
        }
        if amenity.has_tag("wine") || amenity.has_tag("beer") {
            return 80.0;
        }
    }
    if hour >= 22 || hour < 5 {
        if amenity.open_state == OpenState::AlwaysOpen {
            return 100.0;
        }
        if amenity.has_tag("bar") || amenity.has_tag("lounge") {
            return 60.0;
        }
    }
    50.0
}

/// Open-right-now factor. Around-the-clock venues always score full;
/// a venue at capacity is open but barely worth the walk.
pub fn availability_score(amenity: &Amenity) -> f64 {
    match amenity.open_state {
        OpenState::AlwaysOpen => 100.0,
        OpenState::Closed => 0.0,
        OpenState::Open => {
            if amenity.at_capacity {
                20.0
            } else {
                100.0
            }
        }
    }
}

/// Stored popularity, clamped onto the factor scale.
pub fn popularity_score(amenity: &Amenity) -> f64 {
    amenity.popularity.clamp(0.0, 100.0)
}

/// Traveler affinity, neutral 50 when no profile was supplied.
pub fn personalization_score(amenity: &Amenity, profile: Option<&TravelerProfile>) -> f64 {
    match profile {
        Some(p) => p.affinity_for(amenity),
        None => 50.0,
    }
}

/// Scores amenities under one weight profile.
#[derive(Debug, Clone)]
pub struct AmenityScorer {
    weights: ScoreWeights,
}

impl AmenityScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn for_mode(mode: ScoreMode) -> Self {
        Self::new(mode.weights())
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Score one amenity at the given local hour.
    pub fn score(
        &self,
        amenity: &Amenity,
        hour: u32,
        profile: Option<&TravelerProfile>,
    ) -> ScoreBreakdown {
        let proximity = proximity_score(amenity.walking_minutes);
        let temporal = temporal_score(hour, amenity);
        let popularity = popularity_score(amenity);
        let availability = availability_score(amenity);
        let personalization = personalization_score(amenity, profile);
        let total = (proximity * self.weights.proximity
            + temporal * self.weights.temporal
            + popularity * self.weights.popularity
            + availability * self.weights.availability
            + personalization * self.weights.personalization)
            .clamp(0.0, 100.0);
        ScoreBreakdown {
            proximity,
            temporal,
            popularity,
            availability,
            personalization,
            total,
        }
    }
}

impl Default for AmenityScorer {
    fn default() -> Self {
        Self::new(ScoreWeights::default())
    }
}
