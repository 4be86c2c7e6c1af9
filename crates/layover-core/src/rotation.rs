//! Ranking amenities into a hero plus rotating discovery windows.
//!
//! The output here is pure: the caller owns the rotation cursor and
//! passes it back to advance. Scoring twice on the same inputs always
//! yields the same hero and the same windows.

use serde::{Deserialize, Serialize};

use crate::catalog::Amenity;
use crate::context::TravelerProfile;
use crate::scoring::{AmenityScorer, ScoreBreakdown};

/// Window size used when the configuration does not override it.
pub const DEFAULT_WINDOW_SIZE: usize = 6;

/// One amenity with its full scoring breakdown attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredAmenity {
    pub amenity: Amenity,
    pub score: ScoreBreakdown,
}

/// A ranked amenity list split into a hero and discovery windows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedAmenities {
    /// Highest-scoring amenity, `None` when the input was empty.
    pub hero: Option<ScoredAmenity>,
    /// Everything after the hero, in consecutive windows. The last
    /// window may be short; concatenating them restores ranked order.
    pub windows: Vec<Vec<ScoredAmenity>>,
}

impl RankedAmenities {
    pub fn total_windows(&self) -> usize {
        self.windows.len()
    }

    /// The window at a caller-held cursor, wrapped into range.
    pub fn window_at(&self, cursor: usize) -> &[ScoredAmenity] {
        if self.windows.is_empty() {
            return &[];
        }
        &self.windows[cursor % self.windows.len()]
    }
}

/// Score and sort amenities, best first.
///
/// Ties on total score break toward the shorter walk, then toward the
/// lexically smaller id, so equal inputs always rank identically.
pub fn rank_amenities(
    amenities: &[Amenity],
    scorer: &AmenityScorer,
    hour: u32,
    profile: Option<&TravelerProfile>,
) -> Vec<ScoredAmenity> {
    let mut scored: Vec<ScoredAmenity> = amenities
        .iter()
        .map(|amenity| ScoredAmenity {
            amenity: amenity.clone(),
            score: scorer.score(amenity, hour, profile),
        })
        .collect();
    scored.sort_by(|a, b| {
        b.score
            .total
            .total_cmp(&a.score.total)
            .then_with(|| a.amenity.walking_minutes.cmp(&b.amenity.walking_minutes))
            .then_with(|| a.amenity.id.cmp(&b.amenity.id))
    });
    scored
}

/// Rank amenities and partition them into a hero plus windows.
pub fn rank_and_window(
    amenities: &[Amenity],
    scorer: &AmenityScorer,
    hour: u32,
    profile: Option<&TravelerProfile>,
    window_size: usize,
) -> RankedAmenities {
    let window_size = window_size.max(1);
    let mut ranked = rank_amenities(amenities, scorer, hour, profile);
    if ranked.is_empty() {
        return RankedAmenities::default();
    }
    let hero = ranked.remove(0);
    let windows = ranked
        .chunks(window_size)
        .map(|chunk| chunk.to_vec())
        .collect();
    RankedAmenities {
        hero: Some(hero),
        windows,
    }
}

/// Advance a caller-held window cursor, wrapping at the end.
///
/// With zero or one windows there is nowhere to go; the cursor stays
/// at zero. Callers wanting "no more to show" semantics check
/// `total_windows <= 1` before calling.
pub fn show_next_window(cursor: usize, total_windows: usize) -> usize {
    if total_windows == 0 {
        return 0;
    }
    (cursor + 1) % total_windows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::OpenState;
    use crate::scoring::ScoreWeights;
    use crate::vibe::Vibe;

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

    fn make_test_pool(count: usize) -> Vec<Amenity> {
        (0..count)
            .map(|i| make_test_amenity(&format!("a{i:02}"), (i % 16) as u32, (i * 7 % 101) as f64))
            .collect()
    }

    fn scorer() -> AmenityScorer {
        AmenityScorer::new(ScoreWeights::balanced())
    }

    #[test]
    fn hero_is_highest_scoring() {
        let amenities = vec![
            make_test_amenity("far", 14, 40.0),
            make_test_amenity("near", 0, 90.0),
            make_test_amenity("mid", 8, 60.0),
        ];
        let ranked = rank_and_window(&amenities, &scorer(), 15, None, 6);
        assert_eq!(ranked.hero.as_ref().unwrap().amenity.id, "near");
    }

    #[test]
    fn ties_break_on_walk_then_id() {
        // All three land in the same proximity tier, so totals tie.
        let amenities = vec![
            make_test_amenity("b", 3, 50.0),
            make_test_amenity("a", 3, 50.0),
            make_test_amenity("c", 1, 50.0),
        ];
        let ranked = rank_amenities(&amenities, &scorer(), 15, None);
        // "c" walks less; "a" and "b" tie and fall back to id order.
        assert_eq!(ranked[0].amenity.id, "c");
        assert_eq!(ranked[1].amenity.id, "a");
        assert_eq!(ranked[2].amenity.id, "b");
    }

    #[test]
    fn ranking_is_deterministic() {
        let amenities = make_test_pool(20);
        let first = rank_amenities(&amenities, &scorer(), 9, None);
        let second = rank_amenities(&amenities, &scorer(), 9, None);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_input_yields_no_hero_and_no_windows() {
        let ranked = rank_and_window(&[], &scorer(), 9, None, 6);
        assert_eq!(ranked.hero, None);
        assert!(ranked.windows.is_empty());
    }

    #[test]
    fn single_amenity_is_hero_only() {
        let amenities = vec![make_test_amenity("only", 2, 70.0)];
        let ranked = rank_and_window(&amenities, &scorer(), 9, None, 6);
        assert_eq!(ranked.hero.as_ref().unwrap().amenity.id, "only");
        assert!(ranked.windows.is_empty());
    }

    #[test]
    fn thirteen_amenities_make_two_full_windows() {
        let ranked = rank_and_window(&make_test_pool(13), &scorer(), 9, None, 6);
        assert!(ranked.hero.is_some());
        assert_eq!(ranked.windows.len(), 2);
        assert_eq!(ranked.windows[0].len(), 6);
        assert_eq!(ranked.windows[1].len(), 6);
    }

    #[test]
    fn fourteenth_amenity_starts_a_short_window() {
        let ranked = rank_and_window(&make_test_pool(14), &scorer(), 9, None, 6);
        assert_eq!(ranked.windows.len(), 3);
        assert_eq!(ranked.windows[2].len(), 1);
    }

    #[test]
    fn windows_partition_the_ranked_remainder() {
        for count in [0usize, 1, 6, 7, 18, 19] {
            let amenities = make_test_pool(count);
            let ranked_flat = rank_amenities(&amenities, &scorer(), 9, None);
            let windowed = rank_and_window(&amenities, &scorer(), 9, None, 6);
            let mut rebuilt = Vec::new();
            if let Some(hero) = &windowed.hero {
                rebuilt.push(hero.clone());
            }
            for window in &windowed.windows {
                rebuilt.extend(window.iter().cloned());
            }
            assert_eq!(rebuilt, ranked_flat, "count {count}");
        }
    }

    #[test]
    fn cursor_wraps_instead_of_erroring() {
        assert_eq!(show_next_window(0, 3), 1);
        assert_eq!(show_next_window(2, 3), 0);
        assert_eq!(show_next_window(0, 1), 0);
        assert_eq!(show_next_window(5, 0), 0);
    }

    #[test]
    fn window_at_wraps_cursor() {
        let ranked = rank_and_window(&make_test_pool(13), &scorer(), 9, None, 6);
        assert_eq!(ranked.window_at(0), &ranked.windows[0][..]);
        assert_eq!(ranked.window_at(2), &ranked.windows[0][..]);
        let empty = RankedAmenities::default();
        assert!(empty.window_at(7).is_empty());
    }

    #[test]
    fn zero_window_size_falls_back_to_one() {
        let ranked = rank_and_window(&make_test_pool(4), &scorer(), 9, None, 0);
        assert_eq!(ranked.windows.len(), 3);
        assert!(ranked.windows.iter().all(|w| w.len() == 1));
    }
}
