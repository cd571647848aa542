//! Countdowns to fixed daily UTC reset hours.
//!
//! The clock is stateless: every call recomputes from the supplied `now`,
//! so callers may refresh at any cadence without accumulating drift.
//!
//! # Boundary rule
//!
//! The target is the next occurrence of `HH:00:00.000` UTC. If the current
//! UTC hour is already at or past the reset hour, the target moves to the
//! next day. At exactly `HH:00:00` the countdown is therefore a full 24
//! hours, never `00:00`.

use chrono::{DateTime, Timelike, Utc};

use ascend_types::Countdown;

const NANOS_PER_SECOND: u64 = 1_000_000_000;
const NANOS_PER_MINUTE: u64 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u64 = 60 * NANOS_PER_MINUTE;
const NANOS_PER_DAY: u64 = 24 * NANOS_PER_HOUR;

/// An hour of the day in UTC, `0..=23`.
///
/// Configuration carries raw hours; [`ResetHour::new`] is the only way in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResetHour(u32);

impl ResetHour {
    /// Midnight UTC.
    pub const MIDNIGHT: Self = Self(0);

    /// Build a reset hour, or `None` if `hour > 23`.
    pub const fn new(hour: u32) -> Option<Self> {
        if hour < 24 { Some(Self(hour)) } else { None }
    }

    /// The hour as a plain integer.
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Countdowns for the three tracked daily events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventTimers {
    /// Daily reward.
    pub bonus: Countdown,
    /// Daily cipher.
    pub challenge: Countdown,
    /// Daily combo.
    pub combo: Countdown,
}

/// Reset anchors for the tracked daily events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerClock {
    bonus: ResetHour,
    challenge: ResetHour,
    combo: ResetHour,
}

impl TimerClock {
    /// Build a clock from the three reset anchors.
    pub const fn new(bonus: ResetHour, challenge: ResetHour, combo: ResetHour) -> Self {
        Self {
            bonus,
            challenge,
            combo,
        }
    }

    /// Reward at 00:00, cipher at 19:00, combo at 12:00 UTC.
    pub const fn standard() -> Self {
        Self::new(ResetHour::MIDNIGHT, ResetHour(19), ResetHour(12))
    }

    /// Time left until the next strictly-future `reset_hour:00` UTC.
    ///
    /// Sub-minute remainders are truncated, not rounded.
    pub fn remaining(reset_hour: ResetHour, now: DateTime<Utc>) -> Countdown {
        // Leap seconds report nanoseconds past 1e9; fold them into the
        // last second of the minute.
        let sub_second = u64::from(now.nanosecond()).min(NANOS_PER_SECOND.saturating_sub(1));
        let elapsed = u64::from(now.num_seconds_from_midnight())
            .saturating_mul(NANOS_PER_SECOND)
            .saturating_add(sub_second);

        let mut target = u64::from(reset_hour.get()).saturating_mul(NANOS_PER_HOUR);
        if now.hour() >= reset_hour.get() {
            target = target.saturating_add(NANOS_PER_DAY);
        }

        let left = target.saturating_sub(elapsed);
        let hours = left.checked_div(NANOS_PER_HOUR).unwrap_or(0);
        let minutes = left
            .checked_rem(NANOS_PER_HOUR)
            .and_then(|rest| rest.checked_div(NANOS_PER_MINUTE))
            .unwrap_or(0);

        Countdown::new(
            u32::try_from(hours).unwrap_or(u32::MAX),
            u32::try_from(minutes).unwrap_or(0),
        )
    }

    /// Recompute all tracked countdowns from `now`.
    pub fn refresh(&self, now: DateTime<Utc>) -> EventTimers {
        EventTimers {
            bonus: Self::remaining(self.bonus, now),
            challenge: Self::remaining(self.challenge, now),
            combo: Self::remaining(self.combo, now),
        }
    }
}

impl Default for TimerClock {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, m, s).unwrap()
    }

    fn hour(h: u32) -> ResetHour {
        ResetHour::new(h).unwrap()
    }

    #[test]
    fn rolls_to_next_midnight() {
        let left = TimerClock::remaining(hour(0), at(23, 30, 0));
        assert_eq!(left.to_string(), "00:30");
    }

    #[test]
    fn exact_reset_hour_is_a_full_day() {
        let left = TimerClock::remaining(hour(19), at(19, 0, 0));
        assert_eq!(left.to_string(), "24:00");
        let left = TimerClock::remaining(hour(0), at(0, 0, 0));
        assert_eq!(left.to_string(), "24:00");
    }

    #[test]
    fn later_the_same_day() {
        assert_eq!(TimerClock::remaining(hour(19), at(18, 0, 0)).to_string(), "01:00");
        assert_eq!(TimerClock::remaining(hour(12), at(3, 15, 0)).to_string(), "08:45");
    }

    #[test]
    fn past_reset_hour_moves_to_tomorrow() {
        // 20:15:45 -> 19:00 tomorrow is 22h 44m 15s.
        assert_eq!(TimerClock::remaining(hour(19), at(20, 15, 45)).to_string(), "22:44");
        // Inside the reset hour itself, still tomorrow.
        assert_eq!(TimerClock::remaining(hour(12), at(12, 59, 0)).to_string(), "23:01");
    }

    #[test]
    fn seconds_are_truncated() {
        // 30 seconds left shows as zero minutes.
        assert_eq!(TimerClock::remaining(hour(12), at(11, 59, 30)).to_string(), "00:00");
        // 1m59s left shows as one minute.
        assert_eq!(TimerClock::remaining(hour(12), at(11, 58, 1)).to_string(), "00:01");
    }

    #[test]
    fn sub_second_remainder_is_truncated() {
        let now = Utc
            .with_ymd_and_hms(2024, 1, 1, 18, 59, 0)
            .unwrap()
            .checked_add_signed(chrono::TimeDelta::microseconds(500))
            .unwrap();
        assert_eq!(TimerClock::remaining(hour(19), now).to_string(), "00:00");
    }

    #[test]
    fn refresh_computes_each_anchor_independently() {
        let timers = TimerClock::standard().refresh(at(10, 0, 0));
        assert_eq!(timers.bonus, Countdown::new(14, 0));
        assert_eq!(timers.challenge, Countdown::new(9, 0));
        assert_eq!(timers.combo, Countdown::new(2, 0));
    }

    #[test]
    fn recompute_is_idempotent() {
        let clock = TimerClock::standard();
        let now = at(7, 42, 13);
        assert_eq!(clock.refresh(now), clock.refresh(now));
    }

    #[test]
    fn reset_hour_bounds() {
        assert!(ResetHour::new(23).is_some());
        assert!(ResetHour::new(24).is_none());
        assert!(ResetHour::new(99).is_none());
    }
}
