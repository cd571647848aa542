//! Compact labels for large yield figures.

use core::cmp::Ordering;

const UNITS: [(u64, char); 3] = [(1_000_000_000, 'B'), (1_000_000, 'M'), (1_000, 'K')];

/// Format an hourly yield as `+126.42K`, `+2.50M`, or `+999`.
///
/// Values of 1000 and up use the largest fitting unit with two decimals.
/// Rounding follows the displayed `f64` quotient: `126_425` is stored as
/// `126.42499...` and shows `+126.42K`, while the exact `1.125` shows
/// `+1.13K`.
pub fn format_yield(amount: u64) -> String {
    for (value, symbol) in UNITS {
        if amount >= value {
            let unit = u128::from(value);
            let scaled = u128::from(amount).saturating_mul(100);
            let mut hundredths = scaled.checked_div(unit).unwrap_or(0);
            let rest = scaled.checked_rem(unit).unwrap_or(0);
            let round_up = match rest.saturating_mul(2).cmp(&unit) {
                Ordering::Greater => true,
                Ordering::Equal => float_tie_rounds_up(amount, value),
                Ordering::Less => false,
            };
            if round_up {
                hundredths = hundredths.saturating_add(1);
            }
            let whole = hundredths.checked_div(100).unwrap_or(0);
            let fraction = hundredths.checked_rem(100).unwrap_or(0);
            return format!("+{whole}.{fraction:02}{symbol}");
        }
    }
    format!("+{amount}")
}

/// Whether `amount / unit` as an `f64` sits at or above its exact value.
///
/// An exact tie rounds up; a quotient that fell short of the tie rounds down.
#[allow(clippy::cast_precision_loss)]
fn float_tie_rounds_up(amount: u64, unit: u64) -> bool {
    let amount = amount as f64;
    let unit = unit as f64;
    let quotient = amount / unit;
    // Exact residual of a correctly rounded division.
    let shortfall = (-quotient).mul_add(unit, amount);
    shortfall <= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_hourly_yield() {
        assert_eq!(format_yield(126_420), "+126.42K");
    }

    #[test]
    fn below_a_thousand_is_plain() {
        assert_eq!(format_yield(0), "+0");
        assert_eq!(format_yield(999), "+999");
    }

    #[test]
    fn picks_the_largest_unit() {
        assert_eq!(format_yield(1_000), "+1.00K");
        assert_eq!(format_yield(2_500_000), "+2.50M");
        assert_eq!(format_yield(1_234_567_890), "+1.23B");
    }

    #[test]
    fn rounds_to_nearest_hundredth() {
        assert_eq!(format_yield(1_236), "+1.24K");
        assert_eq!(format_yield(1_234), "+1.23K");
    }

    #[test]
    fn halves_follow_the_float_quotient() {
        // Stored just below the half.
        assert_eq!(format_yield(126_425), "+126.42K");
        assert_eq!(format_yield(1_005), "+1.00K");
        assert_eq!(format_yield(2_505_000), "+2.50M");
        // Exactly representable, so the half rounds up.
        assert_eq!(format_yield(1_125), "+1.13K");
        assert_eq!(format_yield(2_625_000), "+2.63M");
    }
}
