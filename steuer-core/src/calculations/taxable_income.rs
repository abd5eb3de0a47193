//! Gross income to taxable income (zu versteuerndes Einkommen).
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Work-expense deduction: larger of itemized and flat allowance |
//! | 2    | Child allowances: `child_allowance × dependents` |
//! | 3    | Taxable income: `gross − step 1 − step 2`, minimum 0 |
//!
//! The basic allowance is not subtracted here. It lives in the zero-rate
//! first bracket of the schedule, so [`compute_income_tax`] applies it (twice
//! for joint filers through splitting).
//!
//! [`compute_income_tax`]: crate::calculations::compute_income_tax

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::non_negative;
use crate::models::{CalculationRequest, TaxYearConstants};

/// Taxable income with the deductions that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxableIncome {
    /// Work-expense deduction actually subtracted.
    pub deduction_applied: Decimal,

    /// Whether the itemized amount beat the flat allowance.
    pub used_itemized_deductions: bool,

    pub child_allowances: Decimal,
    pub taxable_income: Decimal,
}

/// Normalizes a request into taxable income.
///
/// # Arguments
///
/// * `request` - A validated request; negative gross or itemized amounts
///   are rejected by [`CalculationRequest::validate`] before this point
/// * `constants` - Supplies the flat work-expense and child allowances
///
/// # Returns
///
/// The deductions applied and the resulting taxable income, floored at 0
/// and left unrounded.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use steuer_core::CalculationRequest;
/// use steuer_core::calculations::compute_taxable_income;
/// use steuer_core::tables::germany_2024;
///
/// let constants = germany_2024();
/// let request = CalculationRequest::new(dec!(80000), 2024).with_dependents(2);
///
/// let taxable = compute_taxable_income(&request, &constants);
///
/// // 80000 - 1230 - 2 * 6384
/// assert_eq!(taxable.taxable_income, dec!(66002));
/// assert!(!taxable.used_itemized_deductions);
/// ```
pub fn compute_taxable_income(
    request: &CalculationRequest,
    constants: &TaxYearConstants,
) -> TaxableIncome {
    let used_itemized_deductions = request.itemized_deductions > constants.work_expense_allowance;
    let deduction_applied = request
        .itemized_deductions
        .max(constants.work_expense_allowance);

    let child_allowances = constants.child_allowance * Decimal::from(request.dependents);

    let taxable_income =
        non_negative(request.gross_annual_income - deduction_applied - child_allowances);

    TaxableIncome {
        deduction_applied,
        used_itemized_deductions,
        child_allowances,
        taxable_income,
    }
}
