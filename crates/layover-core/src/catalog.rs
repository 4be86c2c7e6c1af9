//! Catalog snapshot types: amenities, collections, and lookups.
//!
//! The catalog is read-only input owned by the caller. Shapes serialize
//! with camelCase field names so a service deployment can pass them as
//! JSON unchanged.

use serde::{Deserialize, Serialize};

use crate::context::TravelerType;
use crate::error::ValidationError;
use crate::urgency::TimeSlot;
use crate::vibe::Vibe;

/// Opening status of an amenity at ranking time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OpenState {
    /// Open around the clock.
    AlwaysOpen,
    Open,
    Closed,
}

impl Default for OpenState {
    fn default() -> Self {
        OpenState::Open
    }
}

/// Price tier of an amenity, coarsest useful granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PriceTier {
    Budget,
    Moderate,
    Premium,
    Luxury,
}

impl PriceTier {
    /// Numeric rank used for adjacency comparisons.
    pub fn rank(&self) -> i32 {
        match self {
            PriceTier::Budget => 1,
            PriceTier::Moderate => 2,
            PriceTier::Premium => 3,
            PriceTier::Luxury => 4,
        }
    }
}

/// A single venue or service in the terminal.
///
/// Immutable within a ranking pass. Walking time is already computed by
/// the caller; no geospatial logic lives here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Amenity {
    pub id: String,
    pub name: String,
    /// Non-empty set of vibes this amenity belongs to.
    pub vibes: Vec<Vibe>,
    pub terminal: String,
    #[serde(default)]
    pub zone: Option<String>,
    /// Minutes of walking from the traveler's position.
    pub walking_minutes: u32,
    #[serde(default)]
    pub open_state: OpenState,
    #[serde(default)]
    pub at_capacity: bool,
    /// Stored popularity in [0, 100].
    pub popularity: f64,
    /// Free-form tags matched by the temporal score (e.g. "breakfast",
    /// "bar", "lounge").
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub price_tier: Option<PriceTier>,
}

impl Amenity {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// A named, curated subset of amenities under one vibe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub subtitle: String,
    pub vibe: Vibe,
    /// Core collections are always eligible; dynamic ones are gated by
    /// time and traveler relevance.
    #[serde(default)]
    pub is_core: bool,
    #[serde(default)]
    pub amenity_ids: Vec<String>,
    /// Empty means relevant at any time of day.
    #[serde(default)]
    pub time_relevance: Vec<TimeSlot>,
    /// Empty means relevant to every traveler.
    #[serde(default)]
    pub traveler_relevance: Vec<TravelerType>,
    /// Display cap on member amenities, if any.
    #[serde(default)]
    pub max_amenities: Option<usize>,
}

impl Collection {
    pub fn relevant_at(&self, slot: TimeSlot) -> bool {
        self.time_relevance.is_empty() || self.time_relevance.contains(&slot)
    }

    pub fn relevant_for(&self, traveler: Option<TravelerType>) -> bool {
        match traveler {
            Some(t) => self.traveler_relevance.is_empty() || self.traveler_relevance.contains(&t),
            None => true,
        }
    }

    pub fn size_tier(&self) -> SizeTier {
        SizeTier::for_count(self.amenity_ids.len())
    }
}

/// Curation-level indicator derived from collection size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SizeTier {
    Micro,
    Curated,
    Popular,
    Comprehensive,
    ExploreAll,
}

impl SizeTier {
    pub fn for_count(count: usize) -> Self {
        match count {
            0..=10 => SizeTier::Micro,
            11..=25 => SizeTier::Curated,
            26..=50 => SizeTier::Popular,
            51..=100 => SizeTier::Comprehensive,
            _ => SizeTier::ExploreAll,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SizeTier::Micro => "Micro",
            SizeTier::Curated => "Curated",
            SizeTier::Popular => "Popular",
            SizeTier::Comprehensive => "Comprehensive",
            SizeTier::ExploreAll => "Explore All",
        }
    }
}

/// A catalog snapshot scoped to one terminal or airport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default)]
    pub amenities: Vec<Amenity>,
    #[serde(default)]
    pub collections: Vec<Collection>,
}

impl Catalog {
    /// All collections belonging to a vibe, in catalog order.
    pub fn collections_for(&self, vibe: Vibe) -> Vec<&Collection> {
        self.collections.iter().filter(|c| c.vibe == vibe).collect()
    }

    pub fn amenity(&self, id: &str) -> Option<&Amenity> {
        self.amenities.iter().find(|a| a.id == id)
    }

    /// Resolve a collection's members, honoring its display cap.
    ///
    /// Ids without a catalog entry are skipped rather than erroring; an
    /// empty result is a valid outcome.
    pub fn members_of<'a>(&'a self, collection: &Collection) -> Vec<&'a Amenity> {
        let mut members: Vec<&Amenity> = collection
            .amenity_ids
            .iter()
            .filter_map(|id| self.amenity(id))
            .collect();
        if let Some(cap) = collection.max_amenities {
            members.truncate(cap);
        }
        members
    }

    /// Structural checks run once per snapshot load.
    ///
    /// # Errors
    /// Returns the first violation found: duplicate amenity ids or
    /// collection slugs, an amenity with no vibes, or popularity outside
    /// [0, 100].
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut ids = std::collections::HashSet::new();
        for amenity in &self.amenities {
            if !ids.insert(amenity.id.as_str()) {
                return Err(ValidationError::InvalidValue {
                    field: "amenity.id".to_string(),
                    message: format!("duplicate id '{}'", amenity.id),
                });
            }
            if amenity.vibes.is_empty() {
                return Err(ValidationError::EmptyCollection(format!(
                    "amenity '{}' has no vibes",
                    amenity.id
                )));
            }
            if !(0.0..=100.0).contains(&amenity.popularity) {
                return Err(ValidationError::InvalidValue {
                    field: "amenity.popularity".to_string(),
                    message: format!(
                        "'{}' has popularity {} outside [0, 100]",
                        amenity.id, amenity.popularity
                    ),
                });
            }
        }
        let mut slugs = std::collections::HashSet::new();
        for collection in &self.collections {
            if !slugs.insert(collection.slug.as_str()) {
                return Err(ValidationError::InvalidValue {
                    field: "collection.slug".to_string(),
                    message: format!("duplicate slug '{}'", collection.slug),
                });
            }
        }
        Ok(())
    }

    /// Parse and validate a catalog from its JSON form.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load and validate a catalog snapshot from a JSON file.
    pub fn load(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
