//! # Layover Core Library
//!
//! This library provides the core business logic for Layover, a
//! context-adaptive amenity recommendation engine for airport
//! terminals. It implements a CLI-first philosophy where every
//! operation is available via a standalone CLI binary, with any
//! kiosk or companion-app surface being a thin layer over the same
//! core library.
//!
//! ## Architecture
//!
//! - **Classification**: Boarding-deadline urgency bands and local
//!   wall-clock slots, derived on demand and never persisted
//! - **Ordering**: Urgency and time-of-day vibe priority tables
//!   blended into one ranked row of the seven fixed vibes
//! - **Selection**: The per-vibe shelf of curated core collections
//!   plus engagement-ranked dynamic collections
//! - **Scoring**: Multi-factor amenity scoring with a hero pick and
//!   rotating discovery windows
//! - **Storage**: SQLite-backed engagement metrics and TOML-based
//!   configuration
//!
//! ## Key Components
//!
//! - [`RecommendationEngine`]: Facade over the whole ranking pass
//! - [`Catalog`]: Amenity and collection snapshot for one terminal
//! - [`MetricsStore`]: Engagement metrics persistence trait
//! - [`EngineConfig`]: Deployment configuration management

pub mod catalog;
pub mod context;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod ordering;
pub mod policy;
pub mod rotation;
pub mod scoring;
pub mod selector;
pub mod storage;
pub mod urgency;
pub mod vibe;

pub use catalog::{Amenity, Catalog, Collection, OpenState, PriceTier, SizeTier};
pub use context::{TravelerContext, TravelerProfile, TravelerType};
pub use engine::{Classification, RecommendationEngine, Recommendations, ShelfEntry, VibeRecommendation};
pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use metrics::{
    InMemoryMetricsStore, Interaction, MetricsRecord, MetricsSnapshot, MetricsStore, MetricsSummary,
};
pub use ordering::{DayPart, UnifiedOrdering};
pub use policy::{PolicyBundle, PolicyData, PolicyMetadata, POLICY_VERSION};
pub use rotation::{show_next_window, RankedAmenities, ScoredAmenity};
pub use scoring::{AmenityScorer, ScoreBreakdown, ScoreMode, ScoreWeights};
pub use selector::{personalized_collections, select_collections, SelectorOptions};
pub use storage::{EngineConfig, SqliteMetricsStore};
pub use urgency::{TimeSlot, UrgencyState, UrgencyThresholds};
pub use vibe::{Badge, Vibe};
