use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::FilingStatus;

/// Itemized outcome of a tax calculation.
///
/// Tax and contribution amounts are rounded to cents. Every monetary field
/// except `net_annual_income` is non-negative; net income can drop below zero when
/// contributions exceed a very small income, and that is a valid result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub tax_year: i32,
    pub filing_status: FilingStatus,
    pub gross_annual_income: Decimal,

    /// Work-expense deduction actually subtracted (itemized or flat).
    pub deduction_applied: Decimal,
    pub used_itemized_deductions: bool,

    /// Child allowances subtracted for dependents.
    pub child_allowances: Decimal,

    pub taxable_income: Decimal,
    pub income_tax: Decimal,
    pub solidarity_surcharge: Decimal,
    pub church_tax: Decimal,

    pub health_insurance_contribution: Decimal,
    pub pension_contribution: Decimal,
    pub unemployment_contribution: Decimal,
    pub long_term_care_contribution: Decimal,

    /// Set when the health figure is the flat private-insurance estimate
    /// rather than an income-proportional contribution.
    pub health_insurance_estimated: bool,
    pub long_term_care_surcharge_applied: bool,

    pub total_taxes: Decimal,
    pub total_social_contributions: Decimal,
    pub net_annual_income: Decimal,

    /// Rate of the bracket holding the last euro of taxable income.
    pub marginal_rate: Decimal,

    /// `total_taxes / gross_annual_income`, zero for zero income.
    pub effective_rate: Decimal,
}

impl CalculationResult {
    /// Taxes plus social contributions.
    pub fn total_burden(&self) -> Decimal {
        self.total_taxes + self.total_social_contributions
    }
}
