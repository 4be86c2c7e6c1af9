//! The recommendation engine facade.
//!
//! Ties urgency classification, vibe ordering, collection selection,
//! and amenity scoring into one pass over a catalog. The engine owns
//! the validated configuration and a handle to the metrics store; the
//! catalog and traveler context arrive per call.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{Amenity, Catalog, Collection, SizeTier};
use crate::context::TravelerContext;
use crate::error::Result;
use crate::metrics::{Interaction, MetricsStore, MetricsSummary};
use crate::ordering::{self, DayPart};
use crate::rotation::{rank_and_window, RankedAmenities};
use crate::scoring::{AmenityScorer, ScoreMode};
use crate::selector::{select_collections, SelectorOptions};
use crate::storage::EngineConfig;
use crate::urgency::{TimeSlot, UrgencyState};
use crate::vibe::{self, Badge, Vibe};

/// Urgency and clock classification for one traveler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub urgency: UrgencyState,
    pub minutes_to_boarding: Option<f64>,
    pub time_slot: TimeSlot,
    pub day_part: DayPart,
    pub status_message: String,
    pub greeting: String,
}

/// One collection on a shelf, with its ranked members attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelfEntry {
    pub collection: Collection,
    pub size_tier: SizeTier,
    pub amenities: RankedAmenities,
}

/// One vibe row of the final recommendation surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VibeRecommendation {
    pub vibe: Vibe,
    pub label: String,
    pub highlighted: bool,
    pub badge: Option<Badge>,
    /// In the urgency order's top three.
    pub boosted: bool,
    pub boost_factor: f64,
    pub collections: Vec<ShelfEntry>,
}

/// The full recommendation surface for one traveler at one moment.
///
/// Vibe rows come back in blended priority order; each row carries its
/// shelf of collections and each collection its hero plus windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub urgency: UrgencyState,
    pub minutes_to_boarding: Option<f64>,
    pub time_slot: TimeSlot,
    pub day_part: DayPart,
    pub greeting: String,
    pub status_message: String,
    pub mode: ScoreMode,
    pub mode_notes: Vec<String>,
    pub vibes: Vec<VibeRecommendation>,
}

/// Facade over the whole ranking pipeline.
pub struct RecommendationEngine {
    config: EngineConfig,
    metrics: Arc<dyn MetricsStore>,
}

impl RecommendationEngine {
    /// Build an engine over a validated configuration.
    ///
    /// # Errors
    /// Returns the configuration's first invalid value; an engine with
    /// a bad table never constructs.
    pub fn new(config: EngineConfig, metrics: Arc<dyn MetricsStore>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, metrics })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Start a traveler context on this deployment's local clock.
    pub fn context_at(&self, now: DateTime<Utc>) -> TravelerContext {
        TravelerContext::new(now).with_utc_offset(self.config.airport.utc_offset_minutes)
    }

    /// Classify a traveler's urgency and clock position.
    pub fn classify(&self, context: &TravelerContext) -> Classification {
        let urgency = context.urgency(&self.config.urgency);
        let day_part = context.day_part();
        Classification {
            urgency,
            minutes_to_boarding: context.minutes_to_boarding(),
            time_slot: context.time_slot(),
            day_part,
            status_message: urgency.status_message().to_string(),
            greeting: ordering::greeting(day_part, Some(urgency)).to_string(),
        }
    }

    /// The full pass: classify, order vibes, pick shelves, rank members.
    ///
    /// # Errors
    /// Fails only when the metrics snapshot cannot be read; ranking
    /// itself has no failure path.
    pub fn recommend(&self, catalog: &Catalog, context: &TravelerContext) -> Result<Recommendations> {
        let urgency = context.urgency(&self.config.urgency);
        let slot = context.time_slot();
        let hour = context.local_hour();
        let ordering = ordering::unified_order(hour, Some(urgency));
        let boosts = ordering::boost_factors(Some(urgency), Some(hour));
        let (mode, scorer) = self.scorer_for(urgency);

        let snapshot = self.metrics.snapshot()?;
        let options = self.selector_options(context);

        let vibes = ordering
            .order
            .iter()
            .map(|row| {
                let shelf = select_collections(
                    catalog,
                    row.vibe,
                    slot,
                    context.traveler_type,
                    &snapshot,
                    &options,
                );
                let collections = shelf
                    .into_iter()
                    .map(|collection| {
                        let members: Vec<Amenity> = catalog
                            .members_of(&collection)
                            .into_iter()
                            .cloned()
                            .collect();
                        let amenities = rank_and_window(
                            &members,
                            &scorer,
                            hour,
                            context.profile.as_ref(),
                            self.config.selection.window_size,
                        );
                        ShelfEntry {
                            size_tier: collection.size_tier(),
                            collection,
                            amenities,
                        }
                    })
                    .collect();
                VibeRecommendation {
                    vibe: row.vibe,
                    label: row.vibe.label().to_string(),
                    highlighted: vibe::should_highlight(row.vibe, urgency),
                    badge: vibe::badge_for(row.vibe, urgency),
                    boosted: row.boosted,
                    boost_factor: boosts.get(&row.vibe).copied().unwrap_or(1.0),
                    collections,
                }
            })
            .collect();

        Ok(Recommendations {
            urgency,
            minutes_to_boarding: context.minutes_to_boarding(),
            time_slot: slot,
            day_part: ordering.day_part,
            greeting: ordering::greeting(ordering.day_part, Some(urgency)).to_string(),
            status_message: ordering.status_message,
            mode,
            mode_notes: mode
                .recommendations()
                .iter()
                .map(|note| note.to_string())
                .collect(),
            vibes,
        })
    }

    /// The shelf for a single vibe, without member ranking.
    ///
    /// # Errors
    /// Fails only when the metrics snapshot cannot be read.
    pub fn shelf_for(
        &self,
        catalog: &Catalog,
        vibe: Vibe,
        context: &TravelerContext,
    ) -> Result<Vec<Collection>> {
        let snapshot = self.metrics.snapshot()?;
        Ok(select_collections(
            catalog,
            vibe,
            context.time_slot(),
            context.traveler_type,
            &snapshot,
            &self.selector_options(context),
        ))
    }

    /// Rank one collection's members into a hero plus windows.
    pub fn rank_collection(
        &self,
        catalog: &Catalog,
        collection: &Collection,
        context: &TravelerContext,
    ) -> RankedAmenities {
        let urgency = context.urgency(&self.config.urgency);
        let (_, scorer) = self.scorer_for(urgency);
        let members: Vec<Amenity> = catalog.members_of(collection).into_iter().cloned().collect();
        rank_and_window(
            &members,
            &scorer,
            context.local_hour(),
            context.profile.as_ref(),
            self.config.selection.window_size,
        )
    }

    /// Record a traveler interaction against a collection or amenity.
    pub fn track(&self, slug: &str, kind: Interaction, value: Option<f64>) -> Result<()> {
        self.metrics.record(slug, kind, value)
    }

    pub fn metrics_summary(&self) -> Result<MetricsSummary> {
        self.metrics.summary()
    }

    fn scorer_for(&self, urgency: UrgencyState) -> (ScoreMode, AmenityScorer) {
        let mode = ScoreMode::from_urgency(urgency);
        let scorer = if self.config.scoring.mode_profiles {
            AmenityScorer::for_mode(mode)
        } else {
            AmenityScorer::new(self.config.scoring.weights)
        };
        (mode, scorer)
    }

    /// A request-scoped seed beats the deployment-wide one.
    fn selector_options(&self, context: &TravelerContext) -> SelectorOptions {
        SelectorOptions {
            core_count: self.config.selection.core_count,
            dynamic_count: self.config.selection.dynamic_count,
            variety_seed: context.variety_seed.or(self.config.selection.variety_seed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::OpenState;
    use crate::metrics::InMemoryMetricsStore;
    use crate::scoring::ScoreWeights;
    use chrono::{Duration, TimeZone};

    fn make_test_amenity(id: &str, walking_minutes: u32, popularity: f64) -> Amenity {
        Amenity {
            id: id.to_string(),
            name: id.to_string(),
            vibes: vec![Vibe::Refuel],
            terminal: "T1".to_string(),
            zone: None,
            walking_minutes,
            open_state: OpenState::Open,
            at_capacity: false,
            popularity,
            tags: vec![],
            price_tier: None,
        }
    }

    fn make_test_collection(slug: &str, is_core: bool, ids: &[&str]) -> Collection {
        Collection {
            slug: slug.to_string(),
            name: slug.to_string(),
            subtitle: String::new(),
            vibe: Vibe::Refuel,
            is_core,
            amenity_ids: ids.iter().map(|s| s.to_string()).collect(),
            time_relevance: vec![],
            traveler_relevance: vec![],
            max_amenities: None,
        }
    }

    fn make_test_catalog() -> Catalog {
        let breakfast_ids: Vec<String> = (1..=13).map(|i| format!("b{i}")).collect();
        let mut amenities: Vec<Amenity> = breakfast_ids
            .iter()
            .enumerate()
            .map(|(i, id)| make_test_amenity(id, i as u32, 50.0))
            .collect();
        amenities.push(make_test_amenity("f1", 3, 80.0));

        let mut breakfast = make_test_collection("breakfast-champions", true, &[]);
        breakfast.amenity_ids = breakfast_ids;
        let mut fresh_start = make_test_collection("fresh-start", false, &["f1"]);
        fresh_start.time_relevance = vec![TimeSlot::EarlyMorning];
        let mut brunch = make_test_collection("brunch-spots", false, &["f1"]);
        brunch.time_relevance = vec![TimeSlot::Morning];

        Catalog {
            amenities,
            collections: vec![
                make_test_collection("fine-dining", true, &[]),
                make_test_collection("local-eats", true, &[]),
                breakfast,
                make_test_collection("quick-bites", true, &[]),
                make_test_collection("grab-go-morning", true, &[]),
                fresh_start,
                brunch,
            ],
        }
    }

    fn engine_with_defaults() -> (RecommendationEngine, Arc<InMemoryMetricsStore>) {
        let store = Arc::new(InMemoryMetricsStore::new());
        let engine = RecommendationEngine::new(EngineConfig::default(), store.clone()).unwrap();
        (engine, store)
    }

    // 06:00 local, ten minutes to boarding.
    fn early_morning_rush_context() -> TravelerContext {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 6, 0, 0).unwrap();
        TravelerContext::new(now).with_deadline(now + Duration::minutes(10))
    }

    #[test]
    fn construction_rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.selection.core_count = 0;
        let store = Arc::new(InMemoryMetricsStore::new());
        assert!(RecommendationEngine::new(config, store).is_err());
    }

    #[test]
    fn classify_without_deadline_is_extended() {
        let (engine, _) = engine_with_defaults();
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 14, 0, 0).unwrap();
        let report = engine.classify(&TravelerContext::new(now));
        assert_eq!(report.urgency, UrgencyState::Extended);
        assert_eq!(report.minutes_to_boarding, None);
        assert_eq!(report.time_slot, TimeSlot::Afternoon);
        assert_eq!(report.status_message, "Extended wait - explore the terminal");
        assert_eq!(report.greeting, "Flight delayed. Let's make the wait enjoyable.");
    }

    #[test]
    fn rush_context_puts_quick_first_with_top_pick() {
        let (engine, _) = engine_with_defaults();
        let rec = engine
            .recommend(&make_test_catalog(), &early_morning_rush_context())
            .unwrap();

        assert_eq!(rec.urgency, UrgencyState::Rush);
        assert_eq!(rec.mode, ScoreMode::TimeCrunch);
        assert_eq!(rec.status_message, "Boarding soon - essentials only");
        assert_eq!(rec.vibes.len(), 7);

        let first = &rec.vibes[0];
        assert_eq!(first.vibe, Vibe::Quick);
        assert!(first.highlighted);
        assert_eq!(first.badge, Some(Badge::TopPick));
        assert_eq!(first.boost_factor, 2.0);
    }

    #[test]
    fn early_morning_shelf_hides_and_prioritizes() {
        let (engine, _) = engine_with_defaults();
        let rec = engine
            .recommend(&make_test_catalog(), &early_morning_rush_context())
            .unwrap();

        let refuel = rec.vibes.iter().find(|v| v.vibe == Vibe::Refuel).unwrap();
        let slugs: Vec<&str> = refuel
            .collections
            .iter()
            .map(|entry| entry.collection.slug.as_str())
            .collect();

        assert!(!slugs.contains(&"fine-dining"));
        assert!(!slugs.contains(&"brunch-spots"));
        assert_eq!(&slugs[0..2], &["breakfast-champions", "grab-go-morning"]);
        assert!(slugs.contains(&"fresh-start"));
    }

    #[test]
    fn thirteen_members_make_hero_plus_two_windows() {
        let (engine, _) = engine_with_defaults();
        let rec = engine
            .recommend(&make_test_catalog(), &early_morning_rush_context())
            .unwrap();

        let refuel = rec.vibes.iter().find(|v| v.vibe == Vibe::Refuel).unwrap();
        let entry = refuel
            .collections
            .iter()
            .find(|e| e.collection.slug == "breakfast-champions")
            .unwrap();

        assert_eq!(entry.size_tier, SizeTier::Curated);
        assert!(entry.amenities.hero.is_some());
        assert_eq!(entry.amenities.total_windows(), 2);
        assert_eq!(entry.amenities.windows[0].len(), 6);
        assert_eq!(entry.amenities.windows[1].len(), 6);
        // Hero has the shortest walk of thirteen equal-popularity spots.
        assert_eq!(entry.amenities.hero.as_ref().unwrap().amenity.id, "b1");
    }

    #[test]
    fn mode_profiles_off_uses_configured_weights() {
        let near = make_test_amenity("near-quiet", 0, 0.0);
        let far = make_test_amenity("far-famous", 15, 100.0);
        let catalog = Catalog {
            amenities: vec![near, far],
            collections: vec![make_test_collection(
                "local-eats",
                true,
                &["near-quiet", "far-famous"],
            )],
        };
        // 15:00 local, no deadline: leisure mode territory.
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 15, 0, 0).unwrap();
        let ctx = TravelerContext::new(now);

        let (profiled, _) = engine_with_defaults();
        let rec = profiled.recommend(&catalog, &ctx).unwrap();
        let hero = |rec: &Recommendations| {
            rec.vibes
                .iter()
                .find(|v| v.vibe == Vibe::Refuel)
                .unwrap()
                .collections[0]
                .amenities
                .hero
                .as_ref()
                .unwrap()
                .amenity
                .id
                .clone()
        };
        // Leisure weights favor the popular spot.
        assert_eq!(rec.mode, ScoreMode::Leisure);
        assert_eq!(hero(&rec), "far-famous");

        let mut config = EngineConfig::default();
        config.scoring.mode_profiles = false;
        config.scoring.weights = ScoreWeights::balanced();
        let store = Arc::new(InMemoryMetricsStore::new());
        let forced = RecommendationEngine::new(config, store).unwrap();
        let rec = forced.recommend(&catalog, &ctx).unwrap();
        // Balanced weights lean on proximity instead.
        assert_eq!(rec.mode, ScoreMode::Leisure);
        assert_eq!(hero(&rec), "near-quiet");
    }

    #[test]
    fn recommend_is_deterministic() {
        let (engine, _) = engine_with_defaults();
        let catalog = make_test_catalog();
        let ctx = early_morning_rush_context().with_variety_seed(42);
        let first = engine.recommend(&catalog, &ctx).unwrap();
        let second = engine.recommend(&catalog, &ctx).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn shelf_for_matches_recommend_row() {
        let (engine, _) = engine_with_defaults();
        let catalog = make_test_catalog();
        let ctx = early_morning_rush_context();

        let shelf = engine.shelf_for(&catalog, Vibe::Refuel, &ctx).unwrap();
        let rec = engine.recommend(&catalog, &ctx).unwrap();
        let row = rec.vibes.iter().find(|v| v.vibe == Vibe::Refuel).unwrap();

        let direct: Vec<&str> = shelf.iter().map(|c| c.slug.as_str()).collect();
        let via_recommend: Vec<&str> = row
            .collections
            .iter()
            .map(|e| e.collection.slug.as_str())
            .collect();
        assert_eq!(direct, via_recommend);
    }

    #[test]
    fn track_records_through_the_store() {
        let (engine, store) = engine_with_defaults();
        engine
            .track("breakfast-champions", Interaction::Click, None)
            .unwrap();
        let record = store.get("breakfast-champions").unwrap().unwrap();
        assert_eq!(record.click_through, 0.5);
        assert_eq!(engine.metrics_summary().unwrap().total_slugs, 1);
    }

    #[test]
    fn context_at_uses_airport_offset() {
        let mut config = EngineConfig::default();
        config.airport.utc_offset_minutes = 480;
        let store = Arc::new(InMemoryMetricsStore::new());
        let engine = RecommendationEngine::new(config, store).unwrap();

        // 01:30 UTC is 09:30 on a UTC+8 concourse.
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 1, 30, 0).unwrap();
        let ctx = engine.context_at(now);
        assert_eq!(ctx.local_hour(), 9);
        assert_eq!(ctx.time_slot(), TimeSlot::Morning);
    }
}
