//! Employee social-insurance contributions (Sozialversicherungsbeiträge).
//!
//! Every contribution type has its own assessment ceiling; income above the
//! ceiling adds nothing to that contribution.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use steuer_core::InsuranceType;
//! use steuer_core::calculations::compute_contributions;
//! use steuer_core::tables::germany_2024;
//!
//! let constants = germany_2024();
//! let breakdown = compute_contributions(dec!(5000), &constants, InsuranceType::Statutory, true);
//!
//! assert_eq!(breakdown.health_insurance, dec!(407.50));
//! assert_eq!(breakdown.pension, dec!(465.00));
//! assert_eq!(breakdown.total(), dec!(1022.50));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::round_half_up;
use crate::models::{ContributionRate, InsuranceType, TaxYearConstants};

/// Contributions per insurance type, each rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionBreakdown {
    pub health_insurance: Decimal,
    pub pension: Decimal,
    pub unemployment: Decimal,
    pub long_term_care: Decimal,

    /// The health figure is the flat private premium, not a computed share.
    pub health_insurance_estimated: bool,

    /// The childless long-term-care surcharge was added.
    pub long_term_care_surcharge_applied: bool,
}

impl ContributionBreakdown {
    /// Sum of the four contributions.
    ///
    /// # Returns
    ///
    /// The employee's total social-insurance burden in euros.
    pub fn total(&self) -> Decimal {
        self.health_insurance + self.pension + self.unemployment + self.long_term_care
    }
}

/// Computes all four contributions on `gross_income`.
///
/// # Arguments
///
/// * `gross_income` - Annual gross wage; each type assesses at most its own ceiling
/// * `constants` - Rates, ceilings and the private premium for the tax year
/// * `insurance_type` - Statutory health is rate-based, private is the flat premium
/// * `has_children` - Parents skip the long-term-care surcharge
///
/// # Returns
///
/// The breakdown, each figure rounded to cents. Without income nothing is
/// owed, so a privately insured filer with zero gross pays no premium here
/// either.
///
/// The childless surcharge depends only on `has_children`; age is not
/// modelled.
pub fn compute_contributions(
    gross_income: Decimal,
    constants: &TaxYearConstants,
    insurance_type: InsuranceType,
    has_children: bool,
) -> ContributionBreakdown {
    let (health_insurance, health_insurance_estimated) = match insurance_type {
        InsuranceType::Statutory => (capped(gross_income, &constants.health_insurance), false),
        InsuranceType::Private if gross_income.is_zero() => (Decimal::ZERO, false),
        InsuranceType::Private => {
            debug!(
                premium = %constants.private_health_premium,
                "using flat private health premium"
            );
            (round_half_up(constants.private_health_premium), true)
        }
    };

    let long_term_care_surcharge_applied = !has_children;
    let care_rate = if long_term_care_surcharge_applied {
        constants.long_term_care.rate + constants.long_term_care_childless_surcharge
    } else {
        constants.long_term_care.rate
    };
    let care_base = constants.long_term_care.assessment_base(gross_income);

    ContributionBreakdown {
        health_insurance,
        pension: capped(gross_income, &constants.pension),
        unemployment: capped(gross_income, &constants.unemployment),
        long_term_care: round_half_up(care_base * care_rate),
        health_insurance_estimated,
        long_term_care_surcharge_applied,
    }
}

fn capped(
    gross_income: Decimal,
    contribution: &ContributionRate,
) -> Decimal {
    round_half_up(contribution.assessment_base(gross_income) * contribution.rate)
}
