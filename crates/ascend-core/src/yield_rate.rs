//! Passive per-tick yield derived from an hourly rate.
//!
//! The per-tick amount is truncated, so over one hour of ticks the total
//! accrued never exceeds the hourly rate.

use core::time::Duration;

const MILLIS_PER_HOUR: u128 = 3_600_000;

/// Whole points credited per tick of `tick_period` for `hourly_rate`.
///
/// With a one second period this is `floor(hourly_rate / 3600)`.
pub fn per_tick(hourly_rate: u64, tick_period: Duration) -> u64 {
    let scaled = u128::from(hourly_rate).saturating_mul(tick_period.as_millis());
    let amount = scaled.checked_div(MILLIS_PER_HOUR).unwrap_or(0);
    u64::try_from(amount).unwrap_or(u64::MAX)
}

/// Fixed passive income applied once per yield tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YieldAccumulator {
    hourly_rate: u64,
    per_tick: u64,
}

impl YieldAccumulator {
    /// Accumulator for `hourly_rate`, ticking every `tick_period`.
    pub fn new(hourly_rate: u64, tick_period: Duration) -> Self {
        Self {
            hourly_rate,
            per_tick: per_tick(hourly_rate, tick_period),
        }
    }

    /// The configured hourly rate.
    pub const fn hourly_rate(&self) -> u64 {
        self.hourly_rate
    }

    /// Points credited on each tick.
    pub const fn per_tick(&self) -> u64 {
        self.per_tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn reference_rate_per_second() {
        assert_eq!(per_tick(126_420, SECOND), 35);
    }

    #[test]
    fn an_hour_of_ticks_never_exceeds_the_rate() {
        let acc = YieldAccumulator::new(126_420, SECOND);
        let total: u64 = (0..3600).map(|_| acc.per_tick()).sum();
        assert_eq!(total, 126_000);
        assert!(total <= acc.hourly_rate());
    }

    #[test]
    fn small_rates_truncate_to_zero() {
        assert_eq!(per_tick(3_599, SECOND), 0);
        assert_eq!(per_tick(3_600, SECOND), 1);
        assert_eq!(per_tick(0, SECOND), 0);
    }

    #[test]
    fn period_scales_the_amount() {
        assert_eq!(per_tick(126_420, Duration::from_secs(10)), 351);
        assert_eq!(per_tick(126_420, Duration::from_millis(500)), 17);
        assert_eq!(per_tick(126_420, Duration::from_secs(3600)), 126_420);
    }

    #[test]
    fn huge_rates_saturate() {
        assert_eq!(per_tick(u64::MAX, Duration::from_secs(7200)), u64::MAX);
    }
}
