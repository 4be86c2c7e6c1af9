//! Engagement metrics: feedback recording and the in-memory store.
//!
//! The store is the only shared mutable state in the crate. Everything
//! else takes a snapshot of these records as a plain argument.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Weight of smoothed click-through in the engagement score.
pub const ENGAGEMENT_CLICK_WEIGHT: f64 = 0.3;
/// Weight of smoothed conversion in the engagement score.
pub const ENGAGEMENT_CONVERSION_WEIGHT: f64 = 0.4;
/// Weight of smoothed satisfaction in the engagement score.
pub const ENGAGEMENT_SATISFACTION_WEIGHT: f64 = 0.3;

/// One reported user interaction with a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Interaction {
    /// Collection was shown; refreshes `last_updated` only.
    View,
    Click,
    Conversion,
    /// Explicit rating feedback; the value carries the rating.
    Satisfaction,
    /// Dwell time in minutes; the value carries the duration.
    TimeSpent,
}

impl Interaction {
    pub const ALL: [Interaction; 5] = [
        Interaction::View,
        Interaction::Click,
        Interaction::Conversion,
        Interaction::Satisfaction,
        Interaction::TimeSpent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Interaction::View => "view",
            Interaction::Click => "click",
            Interaction::Conversion => "conversion",
            Interaction::Satisfaction => "satisfaction",
            Interaction::TimeSpent => "timeSpent",
        }
    }
}

impl std::fmt::Display for Interaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Interaction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "view" => Ok(Interaction::View),
            "click" => Ok(Interaction::Click),
            "conversion" => Ok(Interaction::Conversion),
            "satisfaction" => Ok(Interaction::Satisfaction),
            "timespent" => Ok(Interaction::TimeSpent),
            other => Err(format!("unknown interaction type: {other}")),
        }
    }
}

/// Running engagement state for one collection slug.
///
/// Fields move by exponential smoothing, `new = (old + value) / 2`, so
/// the latest interactions dominate without storing history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsRecord {
    pub click_through: f64,
    pub conversion: f64,
    pub satisfaction: f64,
    pub time_spent: f64,
    pub last_updated: DateTime<Utc>,
}

impl MetricsRecord {
    pub fn new(at: DateTime<Utc>) -> Self {
        MetricsRecord {
            click_through: 0.0,
            conversion: 0.0,
            satisfaction: 0.0,
            time_spent: 0.0,
            last_updated: at,
        }
    }

    /// Fold one interaction into the record.
    ///
    /// A missing value counts as 1.0; an explicit 0.0 is applied as
    /// given. Views touch only the timestamp.
    pub fn apply(&mut self, kind: Interaction, value: Option<f64>, at: DateTime<Utc>) {
        let value = value.unwrap_or(1.0);
        match kind {
            Interaction::View => {}
            Interaction::Click => self.click_through = smooth(self.click_through, value),
            Interaction::Conversion => self.conversion = smooth(self.conversion, value),
            Interaction::Satisfaction => self.satisfaction = smooth(self.satisfaction, value),
            Interaction::TimeSpent => self.time_spent = smooth(self.time_spent, value),
        }
        self.last_updated = at;
    }

    /// Weighted engagement score used to rank dynamic collections.
    pub fn engagement_score(&self) -> f64 {
        self.click_through * ENGAGEMENT_CLICK_WEIGHT
            + self.conversion * ENGAGEMENT_CONVERSION_WEIGHT
            + self.satisfaction * ENGAGEMENT_SATISFACTION_WEIGHT
    }
}

fn smooth(old: f64, value: f64) -> f64 {
    (old + value) / 2.0
}

/// Snapshot of every record, keyed by collection slug.
pub type MetricsSnapshot = HashMap<String, MetricsRecord>;

/// One row of the engagement summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummaryRow {
    pub slug: String,
    pub engagement: f64,
    #[serde(flatten)]
    pub record: MetricsRecord,
}

/// Every tracked slug ranked by engagement, for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub total_slugs: usize,
    pub rows: Vec<MetricsSummaryRow>,
}

/// Rank a snapshot by engagement, best first, slug order on ties.
pub fn summarize(snapshot: &MetricsSnapshot) -> MetricsSummary {
    let mut rows: Vec<MetricsSummaryRow> = snapshot
        .iter()
        .map(|(slug, record)| MetricsSummaryRow {
            slug: slug.clone(),
            engagement: record.engagement_score(),
            record: record.clone(),
        })
        .collect();
    rows.sort_by(|a, b| {
        b.engagement
            .total_cmp(&a.engagement)
            .then_with(|| a.slug.cmp(&b.slug))
    });
    MetricsSummary {
        total_slugs: rows.len(),
        rows,
    }
}

/// Storage backend for engagement metrics.
///
/// Unknown slugs are not errors anywhere in this trait: reads return
/// `None` and writes create the record. The `Result` layer only
/// carries backend failures (a poisoned lock, a database error).
pub trait MetricsStore: Send + Sync {
    /// Record an interaction with an explicit timestamp.
    fn record_at(
        &self,
        slug: &str,
        kind: Interaction,
        value: Option<f64>,
        at: DateTime<Utc>,
    ) -> Result<()>;

    /// Record an interaction at the current wall clock.
    fn record(&self, slug: &str, kind: Interaction, value: Option<f64>) -> Result<()> {
        self.record_at(slug, kind, value, Utc::now())
    }

    fn get(&self, slug: &str) -> Result<Option<MetricsRecord>>;

    fn snapshot(&self) -> Result<MetricsSnapshot>;

    /// Drop every record (and any logged events) from the store.
    fn reset(&self) -> Result<()>;

    fn summary(&self) -> Result<MetricsSummary> {
        Ok(summarize(&self.snapshot()?))
    }
}

/// Process-local metrics store with per-slug locking.
///
/// The outer map takes a write lock only when a new slug appears;
/// updates to existing slugs hold a read lock on the map plus the one
/// record's mutex, so unrelated collections never contend.
#[derive(Debug, Default)]
pub struct InMemoryMetricsStore {
    records: RwLock<HashMap<String, Mutex<MetricsRecord>>>,
}

impl InMemoryMetricsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetricsStore for InMemoryMetricsStore {
    fn record_at(
        &self,
        slug: &str,
        kind: Interaction,
        value: Option<f64>,
        at: DateTime<Utc>,
    ) -> Result<()> {
        {
            let map = self
                .records
                .read()
                .map_err(|e| CoreError::Custom(format!("metrics lock failed: {e}")))?;
            if let Some(cell) = map.get(slug) {
                let mut record = cell
                    .lock()
                    .map_err(|e| CoreError::Custom(format!("metrics lock failed: {e}")))?;
                record.apply(kind, value, at);
                return Ok(());
            }
        }
        let mut map = self
            .records
            .write()
            .map_err(|e| CoreError::Custom(format!("metrics lock failed: {e}")))?;
        let cell = map
            .entry(slug.to_string())
            .or_insert_with(|| Mutex::new(MetricsRecord::new(at)));
        let mut record = cell
            .lock()
            .map_err(|e| CoreError::Custom(format!("metrics lock failed: {e}")))?;
        record.apply(kind, value, at);
        Ok(())
    }

    fn get(&self, slug: &str) -> Result<Option<MetricsRecord>> {
        let map = self
            .records
            .read()
            .map_err(|e| CoreError::Custom(format!("metrics lock failed: {e}")))?;
        match map.get(slug) {
            Some(cell) => {
                let record = cell
                    .lock()
                    .map_err(|e| CoreError::Custom(format!("metrics lock failed: {e}")))?;
                Ok(Some(record.clone()))
            }
            None => Ok(None),
        }
    }

    fn snapshot(&self) -> Result<MetricsSnapshot> {
        let map = self
            .records
            .read()
            .map_err(|e| CoreError::Custom(format!("metrics lock failed: {e}")))?;
        let mut out = HashMap::with_capacity(map.len());
        for (slug, cell) in map.iter() {
            let record = cell
                .lock()
                .map_err(|e| CoreError::Custom(format!("metrics lock failed: {e}")))?;
            out.insert(slug.clone(), record.clone());
        }
        Ok(out)
    }

    fn reset(&self) -> Result<()> {
        let mut map = self
            .records
            .write()
            .map_err(|e| CoreError::Custom(format!("metrics lock failed: {e}")))?;
        map.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, minute, 0).unwrap()
    }

    #[test]
    fn first_interaction_starts_from_zeroed_record() {
        let store = InMemoryMetricsStore::new();
        store
            .record_at("quick-bites", Interaction::Click, None, at(0))
            .unwrap();
        let record = store.get("quick-bites").unwrap().unwrap();
        // (0 + 1) / 2
        assert_eq!(record.click_through, 0.5);
        assert_eq!(record.conversion, 0.0);
        assert_eq!(record.satisfaction, 0.0);
        assert_eq!(record.last_updated, at(0));
    }

    #[test]
    fn smoothing_averages_toward_recent_values() {
        let store = InMemoryMetricsStore::new();
        store
            .record_at("local-eats", Interaction::Conversion, Some(4.0), at(0))
            .unwrap();
        store
            .record_at("local-eats", Interaction::Conversion, Some(2.0), at(1))
            .unwrap();
        let record = store.get("local-eats").unwrap().unwrap();
        // (0 + 4) / 2 = 2, (2 + 2) / 2 = 2
        assert_eq!(record.conversion, 2.0);
    }

    #[test]
    fn explicit_zero_value_is_applied() {
        let store = InMemoryMetricsStore::new();
        store
            .record_at("s", Interaction::Click, Some(4.0), at(0))
            .unwrap();
        store
            .record_at("s", Interaction::Click, Some(0.0), at(1))
            .unwrap();
        let record = store.get("s").unwrap().unwrap();
        assert_eq!(record.click_through, 1.0);
    }

    #[test]
    fn view_touches_timestamp_only() {
        let store = InMemoryMetricsStore::new();
        store
            .record_at("s", Interaction::Click, Some(2.0), at(0))
            .unwrap();
        let before = store.get("s").unwrap().unwrap();
        store.record_at("s", Interaction::View, None, at(5)).unwrap();
        let after = store.get("s").unwrap().unwrap();
        assert_eq!(after.click_through, before.click_through);
        assert_eq!(after.conversion, before.conversion);
        assert_eq!(after.last_updated, at(5));
    }

    #[test]
    fn unknown_slug_reads_as_none() {
        let store = InMemoryMetricsStore::new();
        assert_eq!(store.get("nothing-here").unwrap(), None);
    }

    #[test]
    fn engagement_score_weighs_conversion_highest() {
        let mut record = MetricsRecord::new(at(0));
        record.click_through = 1.0;
        record.conversion = 1.0;
        record.satisfaction = 1.0;
        assert!((record.engagement_score() - 1.0).abs() < 1e-9);

        let mut conversion_only = MetricsRecord::new(at(0));
        conversion_only.conversion = 1.0;
        let mut click_only = MetricsRecord::new(at(0));
        click_only.click_through = 1.0;
        assert!(conversion_only.engagement_score() > click_only.engagement_score());
    }

    #[test]
    fn satisfaction_feedback_feeds_engagement() {
        let store = InMemoryMetricsStore::new();
        store
            .record_at("s", Interaction::Satisfaction, Some(5.0), at(0))
            .unwrap();
        let record = store.get("s").unwrap().unwrap();
        assert_eq!(record.satisfaction, 2.5);
        assert!(record.engagement_score() > 0.0);
    }

    #[test]
    fn summary_ranks_by_engagement() {
        let store = InMemoryMetricsStore::new();
        store
            .record_at("quiet", Interaction::Click, Some(0.2), at(0))
            .unwrap();
        store
            .record_at("busy", Interaction::Conversion, Some(2.0), at(0))
            .unwrap();
        let summary = store.summary().unwrap();
        assert_eq!(summary.total_slugs, 2);
        assert_eq!(summary.rows[0].slug, "busy");
        assert_eq!(summary.rows[1].slug, "quiet");
        assert!(summary.rows[0].engagement > summary.rows[1].engagement);
    }

    #[test]
    fn reset_drops_all_records() {
        let store = InMemoryMetricsStore::new();
        store
            .record_at("quiet", Interaction::Click, None, at(0))
            .unwrap();
        store
            .record_at("busy", Interaction::View, None, at(0))
            .unwrap();
        store.reset().unwrap();
        assert!(store.get("quiet").unwrap().is_none());
        assert!(store.snapshot().unwrap().is_empty());
    }

    #[test]
    fn interaction_parses_loose_spellings() {
        assert_eq!("view".parse::<Interaction>().unwrap(), Interaction::View);
        assert_eq!(
            "time-spent".parse::<Interaction>().unwrap(),
            Interaction::TimeSpent
        );
        assert_eq!(
            "timeSpent".parse::<Interaction>().unwrap(),
            Interaction::TimeSpent
        );
        assert!("swipe".parse::<Interaction>().is_err());
    }

    #[test]
    fn concurrent_clicks_both_land() {
        use std::sync::Arc;

        let store = Arc::new(InMemoryMetricsStore::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    store
                        .record("quick-bites", Interaction::Click, Some(1.0))
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        let record = store.get("quick-bites").unwrap().unwrap();
        // 800 smoothing steps toward 1.0 converge to 1.0.
        assert!((record.click_through - 1.0).abs() < 1e-6);
    }
}
