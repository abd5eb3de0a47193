//! Full calculation pipeline from request to itemized result.
//!
//! # Pipeline
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Validate the request and match it to the table's year |
//! | 2    | Taxable income (deductions, child allowances) |
//! | 3    | Income tax over the schedule, splitting for joint filers |
//! | 4    | Solidarity surcharge and church tax |
//! | 5    | Social contributions on gross income |
//! | 6    | Totals, net income, marginal and effective rate |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use steuer_core::CalculationRequest;
//! use steuer_core::calculations::calculate;
//! use steuer_core::tables::germany_2024;
//!
//! let constants = germany_2024();
//! let request = CalculationRequest::new(dec!(80000), 2024);
//!
//! let result = calculate(&request, &constants).unwrap();
//!
//! assert_eq!(result.taxable_income, dec!(78770));
//! assert_eq!(result.income_tax, dec!(17741.54));
//! assert_eq!(result.marginal_rate, dec!(0.42));
//! ```

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::common::round_rate;
use crate::calculations::contributions::compute_contributions;
use crate::calculations::income_tax::{compute_income_tax, marginal_rate};
use crate::calculations::surcharges::compute_surcharges;
use crate::calculations::taxable_income::compute_taxable_income;
use crate::error::CalculationError;
use crate::models::{CalculationRequest, CalculationResult, TaxYearConstants};
use crate::tables::TaxYearTable;

/// Calculator bound to one year's constants.
///
/// Holds only a shared reference, so one engine can serve any number of
/// requests, from any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct TaxEngine<'a> {
    constants: &'a TaxYearConstants,
}

impl<'a> TaxEngine<'a> {
    pub fn new(constants: &'a TaxYearConstants) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &'a TaxYearConstants {
        self.constants
    }

    /// Runs the full pipeline for one request.
    ///
    /// # Errors
    ///
    /// - [`CalculationError::InvalidInput`] for a negative income or
    ///   itemized deduction
    /// - [`CalculationError::UnsupportedTaxYear`] when the request's year is
    ///   not the year of the bound constants
    pub fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResult, CalculationError> {
        request.validate()?;
        self.check_year(request.tax_year)?;

        let constants = self.constants;
        let gross = request.gross_annual_income;

        let taxable = compute_taxable_income(request, constants);
        let income_tax =
            compute_income_tax(taxable.taxable_income, constants, request.filing_status);
        let surcharges = compute_surcharges(income_tax, constants, request.church_tax);
        let contributions = compute_contributions(
            gross,
            constants,
            request.insurance_type,
            request.has_children,
        );

        let total_taxes = income_tax + surcharges.total();
        let total_social_contributions = contributions.total();
        let net_annual_income = gross - total_taxes - total_social_contributions;
        let marginal_rate = marginal_rate(taxable.taxable_income, constants, request.filing_status);
        let effective_rate = effective_rate(total_taxes, gross);

        debug!(
            tax_year = request.tax_year,
            filing_status = %request.filing_status,
            gross = %gross,
            taxable = %taxable.taxable_income,
            income_tax = %income_tax,
            total_taxes = %total_taxes,
            contributions = %total_social_contributions,
            net = %net_annual_income,
            "calculated tax breakdown"
        );

        if net_annual_income < Decimal::ZERO {
            warn!(
                gross = %gross,
                net = %net_annual_income,
                "contributions exceed income; net income is negative"
            );
        }

        Ok(CalculationResult {
            tax_year: request.tax_year,
            filing_status: request.filing_status,
            gross_annual_income: gross,
            deduction_applied: taxable.deduction_applied,
            used_itemized_deductions: taxable.used_itemized_deductions,
            child_allowances: taxable.child_allowances,
            taxable_income: taxable.taxable_income,
            income_tax,
            solidarity_surcharge: surcharges.solidarity_surcharge,
            church_tax: surcharges.church_tax,
            health_insurance_contribution: contributions.health_insurance,
            pension_contribution: contributions.pension,
            unemployment_contribution: contributions.unemployment,
            long_term_care_contribution: contributions.long_term_care,
            health_insurance_estimated: contributions.health_insurance_estimated,
            long_term_care_surcharge_applied: contributions.long_term_care_surcharge_applied,
            total_taxes,
            total_social_contributions,
            net_annual_income,
            marginal_rate,
            effective_rate,
        })
    }

    fn check_year(
        &self,
        requested: i32,
    ) -> Result<(), CalculationError> {
        if requested == self.constants.tax_year {
            Ok(())
        } else {
            Err(CalculationError::UnsupportedTaxYear {
                requested,
                available: vec![self.constants.tax_year],
            })
        }
    }
}

/// Calculates a request against one year's constants.
///
/// # Errors
///
/// See [`TaxEngine::calculate`].
pub fn calculate(
    request: &CalculationRequest,
    constants: &TaxYearConstants,
) -> Result<CalculationResult, CalculationError> {
    TaxEngine::new(constants).calculate(request)
}

/// Alias of [`calculate`] under the name of the pipeline's last stage.
pub fn aggregate(
    request: &CalculationRequest,
    constants: &TaxYearConstants,
) -> Result<CalculationResult, CalculationError> {
    calculate(request, constants)
}

/// Calculates a request against whichever table matches its year.
///
/// # Errors
///
/// [`CalculationError::UnsupportedTaxYear`] when `table` has no entry for
/// the request's year, otherwise as [`TaxEngine::calculate`].
pub fn calculate_with_table(
    request: &CalculationRequest,
    table: &TaxYearTable,
) -> Result<CalculationResult, CalculationError> {
    let constants = table.get(request.tax_year)?;
    calculate(request, constants)
}

fn effective_rate(
    total_taxes: Decimal,
    gross: Decimal,
) -> Decimal {
    if gross.is_zero() {
        Decimal::ZERO
    } else {
        round_rate(total_taxes / gross)
    }
}
