//! Progressive income tax over the bracket schedule.
//!
//! Each bracket taxes the slice of income inside `[lower_bound, upper_bound)`
//! at its own rate and the slices are summed, so the tax is continuous at
//! every bracket seam. Joint filers are assessed with the splitting method
//! (Splittingverfahren): the single schedule is applied to half of the
//! couple's taxable income and the result doubled.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use steuer_core::FilingStatus;
//! use steuer_core::calculations::compute_income_tax;
//! use steuer_core::tables::germany_2024;
//!
//! let constants = germany_2024();
//!
//! let single = compute_income_tax(dec!(78770), &constants, FilingStatus::Single);
//! assert_eq!(single, dec!(17741.54));
//!
//! let joint = compute_income_tax(dec!(160000), &constants, FilingStatus::MarriedJoint);
//! let half = compute_income_tax(dec!(80000), &constants, FilingStatus::Single);
//! assert_eq!(joint, half * dec!(2));
//! ```

use rust_decimal::Decimal;
use tracing::warn;

use crate::calculations::common::round_half_up;
use crate::models::{FilingStatus, TaxBracket, TaxYearConstants};

/// Income tax on `taxable_income`, rounded to cents.
///
/// # Arguments
///
/// * `taxable_income` - Income after deductions and child allowances
/// * `constants` - Tax-year table holding the single-filer schedule
/// * `filing_status` - Joint statuses are assessed with splitting
///
/// # Returns
///
/// The income tax. Non-positive taxable income yields zero. For joint filing
/// statuses the tax on half the income is rounded before it is doubled, so
/// the result is always exactly twice the single-filer tax on half the
/// income.
pub fn compute_income_tax(
    taxable_income: Decimal,
    constants: &TaxYearConstants,
    filing_status: FilingStatus,
) -> Decimal {
    if taxable_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    if filing_status.is_joint() {
        let half = taxable_income / Decimal::TWO;
        round_half_up(schedule_tax(half, &constants.brackets)) * Decimal::TWO
    } else {
        round_half_up(schedule_tax(taxable_income, &constants.brackets))
    }
}

/// Unrounded progressive tax of `income` over `brackets`.
///
/// # Arguments
///
/// * `income` - Amount the schedule is applied to
/// * `brackets` - Ascending, contiguous schedule
///
/// # Returns
///
/// The sum of every bracket's slice of `income` times its rate, at full
/// precision. Zero for non-positive income.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use steuer_core::calculations::income_tax::schedule_tax;
/// use steuer_core::tables::germany_2024;
///
/// let brackets = germany_2024().brackets;
///
/// assert_eq!(schedule_tax(dec!(11604), &brackets), dec!(0));
/// // 5401 * 0.14 + 2995 * 0.24
/// assert_eq!(schedule_tax(dec!(20000), &brackets), dec!(1474.94));
/// ```
pub fn schedule_tax(
    income: Decimal,
    brackets: &[TaxBracket],
) -> Decimal {
    if income <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    brackets
        .iter()
        .take_while(|bracket| income > bracket.lower_bound)
        .map(|bracket| bracket.portion_of(income) * bracket.rate)
        .sum()
}

/// Bracket whose half-open range contains `income`.
///
/// # Returns
///
/// `None` only for negative income or a schedule with a gap.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use steuer_core::calculations::income_tax::find_bracket;
/// use steuer_core::tables::germany_2024;
///
/// let brackets = germany_2024().brackets;
///
/// let seam = find_bracket(dec!(17005), &brackets).map(|bracket| bracket.rate);
/// assert_eq!(seam, Some(dec!(0.24)));
/// assert_eq!(find_bracket(dec!(-1), &brackets), None);
/// ```
pub fn find_bracket(
    income: Decimal,
    brackets: &[TaxBracket],
) -> Option<&TaxBracket> {
    brackets.iter().find(|bracket| bracket.contains(income))
}

/// Rate of the bracket holding the last euro of taxable income.
///
/// Uses the same income the schedule is applied to in
/// [`compute_income_tax`], i.e. half the income for joint filers.
pub fn marginal_rate(
    taxable_income: Decimal,
    constants: &TaxYearConstants,
    filing_status: FilingStatus,
) -> Decimal {
    let assessed = if filing_status.is_joint() {
        taxable_income / Decimal::TWO
    } else {
        taxable_income
    };
    let assessed = assessed.max(Decimal::ZERO);

    match find_bracket(assessed, &constants.brackets) {
        Some(bracket) => bracket.rate,
        None => {
            warn!(
                tax_year = constants.tax_year,
                income = %assessed,
                "no bracket contains income; using top rate"
            );
            constants
                .brackets
                .last()
                .map_or(Decimal::ZERO, |bracket| bracket.rate)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::tables::germany_2024;

    // =========================================================================
    // compute_income_tax tests
    // =========================================================================

    #[test]
    fn zero_income_has_no_tax() {
        let constants = germany_2024();

        assert_eq!(
            compute_income_tax(dec!(0), &constants, FilingStatus::Single),
            dec!(0)
        );
    }

    #[test]
    fn negative_income_has_no_tax() {
        let constants = germany_2024();

        assert_eq!(
            compute_income_tax(dec!(-500), &constants, FilingStatus::Single),
            dec!(0)
        );
    }

    #[test]
    fn income_within_allowance_is_untaxed() {
        let constants = germany_2024();

        assert_eq!(
            compute_income_tax(dec!(11604), &constants, FilingStatus::Single),
            dec!(0)
        );
    }

    #[test]
    fn entry_bracket() {
        let constants = germany_2024();

        let tax = compute_income_tax(dec!(15000), &constants, FilingStatus::Single);

        // (15000 - 11604) * 0.14 = 475.44
        assert_eq!(tax, dec!(475.44));
    }

    #[test]
    fn top_of_entry_bracket() {
        let constants = germany_2024();

        let tax = compute_income_tax(dec!(17005), &constants, FilingStatus::Single);

        // 5401 * 0.14 = 756.14
        assert_eq!(tax, dec!(756.14));
    }

    #[test]
    fn main_bracket_example() {
        let constants = germany_2024();

        let tax = compute_income_tax(dec!(78770), &constants, FilingStatus::Single);

        // 756.14 + 49755 * 0.24 + 12010 * 0.42 = 756.14 + 11941.20 + 5044.20
        assert_eq!(tax, dec!(17741.54));
    }

    #[test]
    fn top_bracket_taxes_only_the_excess_at_top_rate() {
        let constants = germany_2024();

        let tax = compute_income_tax(dec!(300000), &constants, FilingStatus::Single);

        // 756.14 + 11941.20 + 211065 * 0.42 + 22175 * 0.45
        assert_eq!(tax, dec!(111323.39));
    }

    #[test]
    fn rounds_half_up_once_at_the_end() {
        let constants = germany_2024();

        // 0.05 * 0.14 = 0.007 -> 0.01
        assert_eq!(
            compute_income_tax(dec!(11604.05), &constants, FilingStatus::Single),
            dec!(0.01)
        );
        // 0.03 * 0.14 = 0.0042 -> 0.00
        assert_eq!(
            compute_income_tax(dec!(11604.03), &constants, FilingStatus::Single),
            dec!(0.00)
        );
    }

    #[test]
    fn non_joint_statuses_use_schedule_directly() {
        let constants = germany_2024();

        for status in [FilingStatus::MarriedSeparate, FilingStatus::HeadOfHousehold] {
            assert_eq!(
                compute_income_tax(dec!(78770), &constants, status),
                dec!(17741.54)
            );
        }
    }

    #[test]
    fn splitting_doubles_tax_on_half_income() {
        let constants = germany_2024();

        let joint = compute_income_tax(dec!(160000), &constants, FilingStatus::MarriedJoint);

        // single tax on 80000 = 756.14 + 11941.20 + 13240 * 0.42 = 18258.14
        assert_eq!(joint, dec!(36516.28));
    }

    #[test]
    fn splitting_doubles_allowance() {
        let constants = germany_2024();

        let joint = compute_income_tax(dec!(23208), &constants, FilingStatus::MarriedJoint);

        assert_eq!(joint, dec!(0));
    }

    #[test]
    fn splitting_symmetry_with_odd_cents() {
        let constants = germany_2024();

        let joint = compute_income_tax(dec!(100000.01), &constants, FilingStatus::QualifyingWidow);
        let half = compute_income_tax(dec!(50000.005), &constants, FilingStatus::Single);

        assert_eq!(joint, half * dec!(2));
        assert_eq!(joint, dec!(17349.88));
    }

    // =========================================================================
    // schedule_tax / find_bracket tests
    // =========================================================================

    #[test]
    fn schedule_tax_keeps_full_precision() {
        let constants = germany_2024();

        let tax = schedule_tax(dec!(11604.03), &constants.brackets);

        assert_eq!(tax, dec!(0.0042));
    }

    #[test]
    fn find_bracket_at_seam_picks_upper_bracket() {
        let constants = germany_2024();

        let bracket = find_bracket(dec!(66760), &constants.brackets).unwrap();

        assert_eq!(bracket.rate, dec!(0.42));
    }

    #[test]
    fn find_bracket_in_empty_schedule() {
        assert_eq!(find_bracket(dec!(1000), &[]), None);
    }

    // =========================================================================
    // marginal_rate tests
    // =========================================================================

    #[test]
    fn marginal_rate_for_example_income() {
        let constants = germany_2024();

        assert_eq!(
            marginal_rate(dec!(78770), &constants, FilingStatus::Single),
            dec!(0.42)
        );
    }

    #[test]
    fn marginal_rate_for_zero_income_is_allowance_rate() {
        let constants = germany_2024();

        assert_eq!(marginal_rate(dec!(0), &constants, FilingStatus::Single), dec!(0));
    }

    #[test]
    fn marginal_rate_uses_half_income_for_joint_filers() {
        let constants = germany_2024();

        // half of 78770 is 39385, inside the 24% bracket
        assert_eq!(
            marginal_rate(dec!(78770), &constants, FilingStatus::MarriedJoint),
            dec!(0.24)
        );
    }

    #[test]
    fn marginal_rate_in_top_bracket() {
        let constants = germany_2024();

        assert_eq!(
            marginal_rate(dec!(1000000), &constants, FilingStatus::Single),
            dec!(0.45)
        );
    }
}
