//! Value types exchanged between the engine and the presentation layer.

use core::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::EffectId;

// ---------------------------------------------------------------------------
// Rank tiers
// ---------------------------------------------------------------------------

/// A named progression level and the minimum score required to hold it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RankTier {
    /// Display name (e.g. "Bronze").
    pub name: String,
    /// Minimum score for this tier.
    pub threshold: u64,
}

impl RankTier {
    /// Build a tier from a name and a threshold.
    pub fn new(name: impl Into<String>, threshold: u64) -> Self {
        Self {
            name: name.into(),
            threshold,
        }
    }
}

// ---------------------------------------------------------------------------
// Click effects
// ---------------------------------------------------------------------------

/// A transient marker spawned at the pointer position on every click.
///
/// The presentation layer animates it and signals completion back to the
/// engine, which then drops it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ClickEffect {
    /// Unique, time-ordered identifier.
    pub id: EffectId,
    /// Absolute pointer X position.
    pub x: f64,
    /// Absolute pointer Y position.
    pub y: f64,
    /// Points credited by the click this marker represents.
    pub amount: u64,
    /// When the effect was spawned.
    pub spawned_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Countdown
// ---------------------------------------------------------------------------

/// Time left until an event resets, truncated to whole minutes.
///
/// Displays as zero-padded `HH:MM`. Hours never exceed 24.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Countdown {
    /// Whole hours remaining.
    pub hours: u32,
    /// Whole minutes remaining past `hours` (0-59).
    pub minutes: u32,
}

impl Countdown {
    /// Build a countdown from whole hours and minutes.
    pub const fn new(hours: u32, minutes: u32) -> Self {
        Self { hours, minutes }
    }

    /// The countdown as a [`Duration`].
    pub fn as_duration(self) -> Duration {
        let hour_secs = u64::from(self.hours).saturating_mul(3600);
        let minute_secs = u64::from(self.minutes).saturating_mul(60);
        Duration::from_secs(hour_secs.saturating_add(minute_secs))
    }
}

impl core::fmt::Display for Countdown {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Read-only view of the engine state, re-read after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ProgressSnapshot {
    /// Current score.
    pub score: u64,
    /// Zero-based index of the current rank.
    pub rank_index: usize,
    /// Number of tiers in the rank table.
    pub rank_count: usize,
    /// Name of the current rank.
    pub rank_name: String,
    /// Progress toward the next rank, in `[0, 100]`.
    pub rank_progress_percent: f64,
    /// Configured hourly passive yield.
    pub profit_per_hour: u64,
    /// Compact label for the hourly yield (e.g. `+126.42K`).
    pub profit_per_hour_label: String,
    /// Countdown to the daily reward reset.
    pub bonus_timer: String,
    /// Countdown to the daily cipher reset.
    pub challenge_timer: String,
    /// Countdown to the daily combo reset.
    pub combo_timer: String,
    /// Live click effects in spawn order.
    pub active_effects: Vec<ClickEffect>,
}
