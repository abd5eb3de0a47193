//! What an additional work-expense deduction is worth.
//!
//! Savings are measured by running the full pipeline twice, once as filed
//! and once with the extra deduction, and comparing total taxes. The result
//! accounts for the flat allowance, bracket seams and the surcharge
//! threshold, none of which a `deduction × marginal rate` shortcut sees.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use steuer_core::CalculationRequest;
//! use steuer_core::calculations::estimate_deduction_savings;
//! use steuer_core::tables::germany_2024;
//!
//! let constants = germany_2024();
//! let request = CalculationRequest::new(dec!(80000), 2024);
//!
//! // The first 1230 only replace the flat allowance.
//! let small = estimate_deduction_savings(&request, dec!(1000), &constants).unwrap();
//! assert_eq!(small, dec!(0));
//!
//! let large = estimate_deduction_savings(&request, dec!(5000), &constants).unwrap();
//! assert_eq!(large, dec!(1583.40));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{round_half_up, round_rate};
use crate::calculations::engine::calculate;
use crate::error::{CalculationError, InvalidInput};
use crate::models::{CalculationRequest, CalculationResult, TaxYearConstants};

/// Side-by-side view of an extra deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionImpact {
    pub additional_deduction: Decimal,

    /// Reduction in total taxes.
    pub tax_savings: Decimal,

    /// Increase in net income.
    pub net_income_gain: Decimal,

    /// `tax_savings / additional_deduction`, four decimal places.
    pub effective_savings_rate: Decimal,

    /// `additional_deduction × marginal rate` of the baseline, for comparison.
    pub marginal_estimate: Decimal,

    pub baseline: CalculationResult,
    pub with_deduction: CalculationResult,
}

/// Tax saved by adding `additional_deduction` to the itemized deductions.
///
/// # Errors
///
/// - [`InvalidInput::NegativeAdditionalDeduction`] for a negative amount
/// - [`InvalidInput::DeductionOutOfRange`] when the combined deductions
///   overflow a `Decimal`
/// - anything [`calculate`] rejects for the request itself
pub fn estimate_deduction_savings(
    request: &CalculationRequest,
    additional_deduction: Decimal,
    constants: &TaxYearConstants,
) -> Result<Decimal, CalculationError> {
    analyze_deduction_impact(request, additional_deduction, constants)
        .map(|impact| impact.tax_savings)
}

/// Full comparison of a request with and without an extra deduction.
///
/// # Errors
///
/// See [`estimate_deduction_savings`].
pub fn analyze_deduction_impact(
    request: &CalculationRequest,
    additional_deduction: Decimal,
    constants: &TaxYearConstants,
) -> Result<DeductionImpact, CalculationError> {
    if additional_deduction < Decimal::ZERO {
        return Err(InvalidInput::NegativeAdditionalDeduction(additional_deduction).into());
    }

    let combined = request
        .itemized_deductions
        .checked_add(additional_deduction)
        .ok_or(InvalidInput::DeductionOutOfRange {
            itemized: request.itemized_deductions,
            additional: additional_deduction,
        })?;

    let baseline = calculate(request, constants)?;
    let adjusted = request.clone().with_itemized_deductions(combined);
    let with_deduction = calculate(&adjusted, constants)?;

    let tax_savings = baseline.total_taxes - with_deduction.total_taxes;
    let net_income_gain = with_deduction.net_annual_income - baseline.net_annual_income;
    let effective_savings_rate = if additional_deduction.is_zero() {
        Decimal::ZERO
    } else {
        round_rate(tax_savings / additional_deduction)
    };
    let marginal_estimate = round_half_up(additional_deduction * baseline.marginal_rate);

    debug!(
        additional = %additional_deduction,
        savings = %tax_savings,
        marginal_estimate = %marginal_estimate,
        "estimated deduction impact"
    );

    Ok(DeductionImpact {
        additional_deduction,
        tax_savings,
        net_income_gain,
        effective_savings_rate,
        marginal_estimate,
        baseline,
        with_deduction,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::tables::germany_2024;

    #[test]
    fn savings_within_one_bracket() {
        let constants = germany_2024();
        let request = CalculationRequest::new(dec!(80000), 2024);

        let impact = analyze_deduction_impact(&request, dec!(5000), &constants).unwrap();

        // taxable drops from 78770 to 75000, all inside the 42% bracket
        assert_eq!(impact.tax_savings, dec!(1583.40));
        assert_eq!(impact.net_income_gain, dec!(1583.40));
        assert_eq!(impact.effective_savings_rate, dec!(0.3167));
        assert_eq!(impact.marginal_estimate, dec!(2100.00));
        assert_eq!(impact.with_deduction.deduction_applied, dec!(5000));
    }

    #[test]
    fn deduction_below_flat_allowance_saves_nothing() {
        let constants = germany_2024();
        let request = CalculationRequest::new(dec!(80000), 2024);

        let savings = estimate_deduction_savings(&request, dec!(1230), &constants).unwrap();

        assert_eq!(savings, dec!(0));
    }

    #[test]
    fn savings_build_on_existing_itemized_deductions() {
        let constants = germany_2024();
        let request =
            CalculationRequest::new(dec!(80000), 2024).with_itemized_deductions(dec!(2000));

        let savings = estimate_deduction_savings(&request, dec!(1000), &constants).unwrap();

        // full 1000 inside the 42% bracket
        assert_eq!(savings, dec!(420.00));
    }

    #[test]
    fn savings_across_a_bracket_seam_are_not_linear() {
        let constants = germany_2024();
        // taxable 67760, one thousand above the 42% seam
        let request = CalculationRequest::new(dec!(68990), 2024)
            .with_itemized_deductions(dec!(1230));

        let impact = analyze_deduction_impact(&request, dec!(3000), &constants).unwrap();

        // 1000 * 0.42 + 2000 * 0.24
        assert_eq!(impact.tax_savings, dec!(900.00));
        assert_eq!(impact.marginal_estimate, dec!(1260.00));
    }

    #[test]
    fn zero_additional_deduction() {
        let constants = germany_2024();
        let request = CalculationRequest::new(dec!(80000), 2024);

        let impact = analyze_deduction_impact(&request, dec!(0), &constants).unwrap();

        assert_eq!(impact.tax_savings, dec!(0));
        assert_eq!(impact.effective_savings_rate, dec!(0));
    }

    #[test]
    fn rejects_negative_additional_deduction() {
        let constants = germany_2024();
        let request = CalculationRequest::new(dec!(80000), 2024);

        assert_eq!(
            estimate_deduction_savings(&request, dec!(-100), &constants),
            Err(CalculationError::InvalidInput(
                InvalidInput::NegativeAdditionalDeduction(dec!(-100))
            ))
        );
    }

    #[test]
    fn rejects_deductions_beyond_decimal_range() {
        let constants = germany_2024();
        let request =
            CalculationRequest::new(dec!(80000), 2024).with_itemized_deductions(Decimal::MAX);

        assert_eq!(
            estimate_deduction_savings(&request, dec!(1), &constants),
            Err(CalculationError::InvalidInput(InvalidInput::DeductionOutOfRange {
                itemized: Decimal::MAX,
                additional: dec!(1),
            }))
        );
    }

    #[test]
    fn propagates_request_errors() {
        let constants = germany_2024();
        let request = CalculationRequest::new(dec!(80000), 2031);

        assert!(matches!(
            estimate_deduction_savings(&request, dec!(100), &constants),
            Err(CalculationError::UnsupportedTaxYear { requested: 2031, .. })
        ));
    }
}
