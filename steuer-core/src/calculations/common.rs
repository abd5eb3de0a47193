//! Rounding and clamping helpers shared by the calculation steps.
//!
//! Intermediate values are carried at full decimal precision; these helpers
//! are applied once, when a figure leaves its calculation step.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a euro amount to cents, half away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use steuer_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(1596.7386)), dec!(1596.74));
/// assert_eq!(round_half_up(dec!(0.005)), dec!(0.01));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a rate to four decimal places, half away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use steuer_core::calculations::common::round_rate;
///
/// assert_eq!(round_rate(dec!(0.22176925)), dec!(0.2218));
/// assert_eq!(round_rate(dec!(0.12345)), dec!(0.1235));
/// ```
pub fn round_rate(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps an amount to zero from below.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn cents_below_midpoint_round_down() {
        // 0.03 * 0.14
        assert_eq!(round_half_up(dec!(0.0042)), dec!(0.00));
    }

    #[test]
    fn cents_at_midpoint_round_up() {
        assert_eq!(round_half_up(dec!(5655.825)), dec!(5655.83));
    }

    #[test]
    fn cents_keep_exact_amounts() {
        assert_eq!(round_half_up(dec!(17741.54)), dec!(17741.54));
        assert_eq!(round_half_up(dec!(0)), dec!(0));
    }

    #[test]
    fn cents_carry_into_euros() {
        assert_eq!(round_half_up(dec!(999999.995)), dec!(1000000.00));
    }

    #[test]
    fn negative_net_income_rounds_away_from_zero() {
        assert_eq!(round_half_up(dec!(-2787.005)), dec!(-2787.01));
    }

    #[test]
    fn rates_keep_four_places() {
        assert_eq!(round_rate(dec!(0.42)), dec!(0.42));
        assert_eq!(round_rate(dec!(0.31668)), dec!(0.3167));
    }

    #[test]
    fn rates_round_up_at_midpoint() {
        assert_eq!(round_rate(dec!(0.00005)), dec!(0.0001));
    }

    #[test]
    fn non_negative_clamps_below_zero() {
        assert_eq!(non_negative(dec!(-12.50)), dec!(0));
        assert_eq!(non_negative(dec!(12.50)), dec!(12.50));
        assert_eq!(non_negative(dec!(0)), dec!(0));
    }
}
