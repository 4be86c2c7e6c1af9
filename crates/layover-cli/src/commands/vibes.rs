use std::path::PathBuf;

use chrono::Timelike;
use clap::Args;
use layover_core::ordering::{boost_factors, greeting, unified_order, DayPart};
use layover_core::urgency::UrgencyState;
use layover_core::vibe::{badge_for, should_highlight, Badge, Vibe};
use serde::Serialize;

use crate::common::{load_config, CliResult};

#[derive(Args)]
pub struct VibesArgs {
    /// Local hour 0-23 (defaults to the airport's current hour)
    #[arg(long)]
    pub hour: Option<u32>,
    /// Urgency state to blend in (rush, imminent, soon, normal, extended)
    #[arg(long)]
    pub urgency: Option<UrgencyState>,
    /// Minutes until boarding, classified through the configured thresholds
    #[arg(long, conflicts_with = "urgency")]
    pub minutes: Option<f64>,
    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VibeRow {
    vibe: Vibe,
    label: &'static str,
    boosted: bool,
    highlighted: bool,
    badge: Option<Badge>,
    boost_factor: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VibesOutput {
    hour: u32,
    day_part: DayPart,
    urgency: Option<UrgencyState>,
    greeting: &'static str,
    status_message: String,
    order: Vec<VibeRow>,
}

pub fn run(args: VibesArgs) -> CliResult {
    let config = load_config(args.config.as_deref())?;
    let hour = match args.hour {
        Some(hour) if hour < 24 => hour,
        Some(hour) => return Err(format!("hour must be 0-23, got {hour}").into()),
        None => {
            let local = chrono::Utc::now()
                + chrono::Duration::minutes(i64::from(config.airport.utc_offset_minutes));
            local.hour()
        }
    };
    let urgency = args
        .urgency
        .or_else(|| args.minutes.map(|m| UrgencyState::from_minutes(Some(m), &config.urgency)));

    let ordering = unified_order(hour, urgency);
    let boosts = boost_factors(urgency, Some(hour));
    let order = ordering
        .order
        .iter()
        .map(|ranked| VibeRow {
            vibe: ranked.vibe,
            label: ranked.vibe.label(),
            boosted: ranked.boosted,
            highlighted: urgency.is_some_and(|u| should_highlight(ranked.vibe, u)),
            badge: urgency.and_then(|u| badge_for(ranked.vibe, u)),
            boost_factor: boosts.get(&ranked.vibe).copied().unwrap_or(1.0),
        })
        .collect();

    let output = VibesOutput {
        hour,
        day_part: ordering.day_part,
        urgency: ordering.urgency,
        greeting: greeting(ordering.day_part, urgency),
        status_message: ordering.status_message,
        order,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
