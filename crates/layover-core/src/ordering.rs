//! Wall-clock vibe preferences and the urgency-blended unified ordering.
//!
//! The urgency tables in [`crate::vibe`] say what matters when time is
//! short; this module says what travelers reach for at different hours of
//! the day, and blends the two into one ordering. The blend weights the
//! urgency order more heavily as the deadline closes in, and under `Rush`
//! the urgency order wins outright.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::urgency::UrgencyState;
use crate::vibe::{self, Vibe};

/// Coarse day-part used for wall-clock vibe preferences and greetings.
///
/// Bands differ from [`crate::urgency::TimeSlot`]: that enum keys the
/// collection swap rules, this one keys traveler mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DayPart {
    /// 5am-11am
    Morning,
    /// 11am-2pm
    Midday,
    /// 2pm-5pm
    Afternoon,
    /// 5pm-11pm
    Evening,
    /// 11pm-5am
    LateNight,
}

impl DayPart {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=10 => DayPart::Morning,
            11..=13 => DayPart::Midday,
            14..=16 => DayPart::Afternoon,
            17..=22 => DayPart::Evening,
            _ => DayPart::LateNight,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DayPart::Morning => "Morning",
            DayPart::Midday => "Midday",
            DayPart::Afternoon => "Afternoon",
            DayPart::Evening => "Evening",
            DayPart::LateNight => "Late Night",
        }
    }

    /// Greeting line for this part of day.
    pub fn greeting(&self) -> &'static str {
        match self {
            DayPart::Morning => "Morning at the terminal. Let's get you sorted.",
            DayPart::Midday => "Peak hours. Navigate like a pro.",
            DayPart::Afternoon => "Afternoon vibes. Time to explore.",
            DayPart::Evening => "Evening at the terminal. Make the most of it.",
            DayPart::LateNight => "After midnight crew - I've got you covered.",
        }
    }

    pub fn tone(&self) -> &'static str {
        match self {
            DayPart::Morning => "Energetic",
            DayPart::Midday => "Confident",
            DayPart::Afternoon => "Adventurous",
            DayPart::Evening => "Confident",
            DayPart::LateNight => "Supportive",
        }
    }
}

/// Vibe preference order for a wall-clock hour.
pub fn time_preference_order(hour: u32) -> [Vibe; 7] {
    use Vibe::*;
    match DayPart::from_hour(hour) {
        DayPart::Morning => [Comfort, Chill, Refuel, Quick, Work, Discover, Shop],
        DayPart::Midday => [Refuel, Quick, Discover, Shop, Chill, Work, Comfort],
        DayPart::Afternoon => [Discover, Refuel, Shop, Chill, Quick, Comfort, Work],
        DayPart::Evening => [Refuel, Shop, Comfort, Discover, Chill, Quick, Work],
        DayPart::LateNight => [Comfort, Quick, Chill, Refuel, Work, Discover, Shop],
    }
}

/// One entry of the unified ordering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedVibe {
    pub vibe: Vibe,
    /// In the top three of the urgency order that produced this blend.
    pub boosted: bool,
}

/// The blended ordering plus the context it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedOrdering {
    pub order: Vec<RankedVibe>,
    pub day_part: DayPart,
    pub urgency: Option<UrgencyState>,
    pub status_message: String,
}

/// Blend the wall-clock preference order with the urgency order.
///
/// With no urgency the time order stands alone. Under `Rush` the urgency
/// order overrides completely. In between, each vibe is scored by its
/// position in both orders, with the urgency position weighted more
/// heavily the less time remains (0.3 extended, 0.5 normal, 0.7 soon,
/// 0.9 imminent); ties keep the time-order position.
pub fn unified_order(hour: u32, urgency: Option<UrgencyState>) -> UnifiedOrdering {
    let day_part = DayPart::from_hour(hour);
    let time_order = time_preference_order(hour);

    let urgency = match urgency {
        None => {
            return UnifiedOrdering {
                order: time_order
                    .iter()
                    .map(|&vibe| RankedVibe { vibe, boosted: false })
                    .collect(),
                day_part,
                urgency: None,
                status_message: format!("{} vibes", day_part.label()),
            }
        }
        Some(u) => u,
    };

    let urgency_order = vibe::order_for_urgency(urgency);
    let order = if urgency == UrgencyState::Rush {
        urgency_order
            .iter()
            .enumerate()
            .map(|(i, &vibe)| RankedVibe {
                vibe,
                boosted: i < 3,
            })
            .collect()
    } else {
        let urgency_weight = match urgency {
            UrgencyState::Extended => 0.3,
            UrgencyState::Normal => 0.5,
            UrgencyState::Soon => 0.7,
            _ => 0.9,
        };
        let time_weight = 1.0 - urgency_weight;

        let position = |order: &[Vibe; 7], vibe: Vibe| {
            order.iter().position(|&v| v == vibe).unwrap_or(7) as f64
        };

        let mut scored: Vec<(RankedVibe, f64)> = time_order
            .iter()
            .map(|&vibe| {
                let urgency_pos = position(&urgency_order, vibe);
                let score = position(&time_order, vibe) * time_weight + urgency_pos * urgency_weight;
                (
                    RankedVibe {
                        vibe,
                        boosted: urgency_pos < 3.0,
                    },
                    score,
                )
            })
            .collect();
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.into_iter().map(|(row, _)| row).collect()
    };

    UnifiedOrdering {
        order,
        day_part,
        urgency: Some(urgency),
        status_message: urgency.status_message().to_string(),
    }
}

/// Greeting for the blended context. Urgency extremes override the
/// day-part line.
pub fn greeting(day_part: DayPart, urgency: Option<UrgencyState>) -> &'static str {
    match urgency {
        Some(UrgencyState::Rush) => "Boarding soon! Here's what's nearby.",
        Some(UrgencyState::Extended) => "Flight delayed. Let's make the wait enjoyable.",
        _ => day_part.greeting(),
    }
}

/// Relevance multipliers per vibe for the given context, base 1.0.
///
/// Urgency extremes reshape the table (a rush doubles `quick` and buries
/// `shop`); morning and late-night hours then scale a few vibes further.
pub fn boost_factors(urgency: Option<UrgencyState>, hour: Option<u32>) -> HashMap<Vibe, f64> {
    let mut boosts: HashMap<Vibe, f64> = Vibe::ALL.iter().map(|&v| (v, 1.0)).collect();

    match urgency {
        Some(UrgencyState::Rush) => {
            boosts.insert(Vibe::Quick, 2.0);
            boosts.insert(Vibe::Refuel, 1.5);
            boosts.insert(Vibe::Discover, 0.5);
            boosts.insert(Vibe::Shop, 0.3);
        }
        Some(UrgencyState::Extended) => {
            boosts.insert(Vibe::Discover, 2.0);
            boosts.insert(Vibe::Comfort, 1.8);
            boosts.insert(Vibe::Work, 1.5);
            boosts.insert(Vibe::Quick, 0.5);
        }
        _ => {}
    }

    if let Some(hour) = hour {
        if (5..11).contains(&hour) {
            scale(&mut boosts, Vibe::Refuel, 1.3);
            scale(&mut boosts, Vibe::Comfort, 1.2);
        } else if !(5..22).contains(&hour) {
            scale(&mut boosts, Vibe::Comfort, 1.5);
            scale(&mut boosts, Vibe::Quick, 1.3);
            scale(&mut boosts, Vibe::Shop, 0.7);
        }
    }

    boosts
}

fn scale(boosts: &mut HashMap<Vibe, f64>, vibe: Vibe, factor: f64) {
    if let Some(v) = boosts.get_mut(&vibe) {
        *v *= factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn vibes(ordering: &UnifiedOrdering) -> Vec<Vibe> {
        ordering.order.iter().map(|r| r.vibe).collect()
    }

    #[test]
    fn unified_order_is_always_a_permutation() {
        for hour in 0..24 {
            for urgency in UrgencyState::ALL.iter().map(Some).chain([None]) {
                let ordering = unified_order(hour, urgency.copied());
                let unique: HashSet<Vibe> = vibes(&ordering).into_iter().collect();
                assert_eq!(unique.len(), 7, "hour {hour}, urgency {urgency:?}");
            }
        }
    }

    #[test]
    fn no_urgency_uses_time_order() {
        let ordering = unified_order(9, None);
        assert_eq!(vibes(&ordering), time_preference_order(9).to_vec());
        assert!(ordering.order.iter().all(|r| !r.boosted));
        assert_eq!(ordering.status_message, "Morning vibes");
    }

    #[test]
    fn rush_overrides_time_order_completely() {
        let ordering = unified_order(9, Some(UrgencyState::Rush));
        assert_eq!(
            vibes(&ordering),
            vibe::order_for_urgency(UrgencyState::Rush).to_vec()
        );
    }

    #[test]
    fn imminent_blend_leans_on_urgency_order() {
        // At 0.9 urgency weight the morning preferences cannot reshuffle
        // the imminent ordering.
        let ordering = unified_order(9, Some(UrgencyState::Imminent));
        assert_eq!(
            vibes(&ordering),
            vibe::order_for_urgency(UrgencyState::Imminent).to_vec()
        );
    }

    #[test]
    fn normal_blend_mixes_both_orders() {
        use Vibe::*;
        let ordering = unified_order(9, Some(UrgencyState::Normal));
        // Equal weights; chill and refuel tie at 2.5 and keep their
        // morning-order relative positions.
        assert_eq!(
            vibes(&ordering),
            vec![Comfort, Work, Chill, Refuel, Discover, Quick, Shop]
        );
    }

    #[test]
    fn boosted_flags_mark_urgency_top_three() {
        let ordering = unified_order(9, Some(UrgencyState::Normal));
        let boosted: HashSet<Vibe> = ordering
            .order
            .iter()
            .filter(|r| r.boosted)
            .map(|r| r.vibe)
            .collect();
        // Normal urgency order starts work, comfort, discover.
        assert_eq!(
            boosted,
            [Vibe::Work, Vibe::Comfort, Vibe::Discover].into_iter().collect()
        );
    }

    #[test]
    fn day_part_bands() {
        assert_eq!(DayPart::from_hour(5), DayPart::Morning);
        assert_eq!(DayPart::from_hour(10), DayPart::Morning);
        assert_eq!(DayPart::from_hour(11), DayPart::Midday);
        assert_eq!(DayPart::from_hour(13), DayPart::Midday);
        assert_eq!(DayPart::from_hour(14), DayPart::Afternoon);
        assert_eq!(DayPart::from_hour(17), DayPart::Evening);
        assert_eq!(DayPart::from_hour(22), DayPart::Evening);
        assert_eq!(DayPart::from_hour(23), DayPart::LateNight);
        assert_eq!(DayPart::from_hour(4), DayPart::LateNight);
    }

    #[test]
    fn greeting_overrides_for_urgency_extremes() {
        assert_eq!(
            greeting(DayPart::Morning, Some(UrgencyState::Rush)),
            "Boarding soon! Here's what's nearby."
        );
        assert_eq!(
            greeting(DayPart::Morning, Some(UrgencyState::Extended)),
            "Flight delayed. Let's make the wait enjoyable."
        );
        assert_eq!(
            greeting(DayPart::Morning, Some(UrgencyState::Soon)),
            DayPart::Morning.greeting()
        );
        assert_eq!(greeting(DayPart::Evening, None), DayPart::Evening.greeting());
    }

    #[test]
    fn rush_boosts_quick_and_buries_shop() {
        let boosts = boost_factors(Some(UrgencyState::Rush), None);
        assert_eq!(boosts[&Vibe::Quick], 2.0);
        assert_eq!(boosts[&Vibe::Refuel], 1.5);
        assert_eq!(boosts[&Vibe::Shop], 0.3);
        assert_eq!(boosts[&Vibe::Work], 1.0);
    }

    #[test]
    fn boosts_compose_multiplicatively() {
        // Rush refuel 1.5 then morning refuel x1.3.
        let boosts = boost_factors(Some(UrgencyState::Rush), Some(6));
        assert!((boosts[&Vibe::Refuel] - 1.95).abs() < 1e-9);
        // Late night comfort on extended: 1.8 x 1.5.
        let boosts = boost_factors(Some(UrgencyState::Extended), Some(23));
        assert!((boosts[&Vibe::Comfort] - 2.7).abs() < 1e-9);
    }

    #[test]
    fn neutral_context_leaves_base_factors() {
        let boosts = boost_factors(Some(UrgencyState::Normal), Some(15));
        assert!(Vibe::ALL.iter().all(|v| boosts[v] == 1.0));
    }
}
