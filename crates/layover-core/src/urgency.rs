//! Deadline urgency classification and wall-clock day-parts.
//!
//! Urgency is derived on demand from minutes-remaining-to-boarding via a
//! fixed ascending threshold table; it is never persisted. The day-part
//! slot uses the same non-overlapping-threshold pattern over the local
//! wall-clock hour and feeds the collection swap rules.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How much time the traveler has before boarding, discretized.
///
/// States are ordered from most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyState {
    /// Boarding within minutes. Essentials only.
    Rush,
    /// Boarding soon, enough time for a quick stop.
    Imminent,
    /// Comfortable margin before heading to the gate.
    Soon,
    /// Plenty of time for focused activities.
    Normal,
    /// Long layover or delay.
    Extended,
}

impl UrgencyState {
    pub const ALL: [UrgencyState; 5] = [
        UrgencyState::Rush,
        UrgencyState::Imminent,
        UrgencyState::Soon,
        UrgencyState::Normal,
        UrgencyState::Extended,
    ];

    /// Classify minutes-remaining through the threshold table.
    ///
    /// `None` (no known deadline) is the most permissive state. Zero or
    /// negative minutes clamp to `Rush` rather than erroring.
    pub fn from_minutes(minutes: Option<f64>, thresholds: &UrgencyThresholds) -> Self {
        let m = match minutes {
            Some(m) => m,
            None => return UrgencyState::Extended,
        };
        if m <= 0.0 {
            return UrgencyState::Rush;
        }
        if m <= thresholds.rush_max {
            UrgencyState::Rush
        } else if m <= thresholds.imminent_max {
            UrgencyState::Imminent
        } else if m <= thresholds.soon_max {
            UrgencyState::Soon
        } else if m <= thresholds.normal_max {
            UrgencyState::Normal
        } else {
            UrgencyState::Extended
        }
    }

    /// Classify from a deadline instant relative to `now`.
    pub fn from_deadline(
        now: DateTime<Utc>,
        deadline: Option<DateTime<Utc>>,
        thresholds: &UrgencyThresholds,
    ) -> Self {
        let minutes = deadline.map(|d| (d - now).num_milliseconds() as f64 / 60_000.0);
        Self::from_minutes(minutes, thresholds)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyState::Rush => "rush",
            UrgencyState::Imminent => "imminent",
            UrgencyState::Soon => "soon",
            UrgencyState::Normal => "normal",
            UrgencyState::Extended => "extended",
        }
    }

    /// Contextual one-liner for display alongside the ordered vibes.
    pub fn status_message(&self) -> &'static str {
        match self {
            UrgencyState::Rush => "Boarding soon - essentials only",
            UrgencyState::Imminent => "Quick bite time before boarding",
            UrgencyState::Soon => "Time to relax before your flight",
            UrgencyState::Normal => "Plenty of time to be productive",
            UrgencyState::Extended => "Extended wait - explore the terminal",
        }
    }
}

impl std::fmt::Display for UrgencyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UrgencyState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rush" => Ok(UrgencyState::Rush),
            "imminent" => Ok(UrgencyState::Imminent),
            "soon" => Ok(UrgencyState::Soon),
            "normal" => Ok(UrgencyState::Normal),
            "extended" => Ok(UrgencyState::Extended),
            _ => Err(format!("unknown urgency state '{s}'")),
        }
    }
}

/// Upper bounds (minutes, inclusive) for each urgency band.
///
/// Anything above `normal_max` is `Extended`. Tunable configuration, kept
/// out of the classification logic itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrgencyThresholds {
    #[serde(default = "default_rush_max")]
    pub rush_max: f64,
    #[serde(default = "default_imminent_max")]
    pub imminent_max: f64,
    #[serde(default = "default_soon_max")]
    pub soon_max: f64,
    #[serde(default = "default_normal_max")]
    pub normal_max: f64,
}

fn default_rush_max() -> f64 {
    15.0
}
fn default_imminent_max() -> f64 {
    45.0
}
fn default_soon_max() -> f64 {
    90.0
}
fn default_normal_max() -> f64 {
    180.0
}

impl Default for UrgencyThresholds {
    fn default() -> Self {
        Self {
            rush_max: default_rush_max(),
            imminent_max: default_imminent_max(),
            soon_max: default_soon_max(),
            normal_max: default_normal_max(),
        }
    }
}

impl UrgencyThresholds {
    /// Check the table is positive and strictly ascending.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rush_max <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "urgency.rush_max".to_string(),
                message: "must be positive".to_string(),
            });
        }
        let bands = [
            ("urgency.imminent_max", self.rush_max, self.imminent_max),
            ("urgency.soon_max", self.imminent_max, self.soon_max),
            ("urgency.normal_max", self.soon_max, self.normal_max),
        ];
        for (key, lower, upper) in bands {
            if upper <= lower {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("must be greater than the previous band ({lower})"),
                });
            }
        }
        Ok(())
    }
}

/// Wall-clock day-part, independent of the boarding deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeSlot {
    /// 5am-8am
    EarlyMorning,
    /// 8am-12pm
    Morning,
    /// 12pm-5pm
    Afternoon,
    /// 5pm-10pm
    Evening,
    /// 10pm-5am
    LateNight,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 5] = [
        TimeSlot::EarlyMorning,
        TimeSlot::Morning,
        TimeSlot::Afternoon,
        TimeSlot::Evening,
        TimeSlot::LateNight,
    ];

    /// Map a local wall-clock hour (0-23) into its slot.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=7 => TimeSlot::EarlyMorning,
            8..=11 => TimeSlot::Morning,
            12..=16 => TimeSlot::Afternoon,
            17..=21 => TimeSlot::Evening,
            _ => TimeSlot::LateNight,
        }
    }

    /// Slot for an instant, shifted to the airport's local clock.
    pub fn at(now: DateTime<Utc>, utc_offset_minutes: i32) -> Self {
        let local = now + Duration::minutes(i64::from(utc_offset_minutes));
        Self::from_hour(local.hour())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::EarlyMorning => "earlyMorning",
            TimeSlot::Morning => "morning",
            TimeSlot::Afternoon => "afternoon",
            TimeSlot::Evening => "evening",
            TimeSlot::LateNight => "lateNight",
        }
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TimeSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "earlyMorning" | "early-morning" => Ok(TimeSlot::EarlyMorning),
            "morning" => Ok(TimeSlot::Morning),
            "afternoon" => Ok(TimeSlot::Afternoon),
            "evening" => Ok(TimeSlot::Evening),
            "lateNight" | "late-night" => Ok(TimeSlot::LateNight),
            _ => Err(format!("unknown time slot '{s}'")),
        }
    }
}
