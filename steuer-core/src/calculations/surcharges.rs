//! Add-on taxes levied as a percentage of income tax.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{non_negative, round_half_up};
use crate::models::TaxYearConstants;

/// Solidarity surcharge and church tax on one income-tax amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surcharges {
    pub solidarity_surcharge: Decimal,
    pub church_tax: Decimal,
}

impl Surcharges {
    /// Combined add-on taxes, added to income tax for the total tax burden.
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use steuer_core::calculations::Surcharges;
    ///
    /// let surcharges = Surcharges {
    ///     solidarity_surcharge: dec!(110.00),
    ///     church_tax: dec!(1811.70),
    /// };
    /// assert_eq!(surcharges.total(), dec!(1921.70));
    /// ```
    pub fn total(&self) -> Decimal {
        self.solidarity_surcharge + self.church_tax
    }
}

/// Computes the Solidaritätszuschlag and, when opted in, Kirchensteuer.
///
/// The surcharge is levied only on the part of income tax above the
/// exemption threshold. Church tax is a flat share of the full income tax.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use steuer_core::calculations::compute_surcharges;
/// use steuer_core::tables::germany_2024;
///
/// let constants = germany_2024();
/// let surcharges = compute_surcharges(dec!(20130), &constants, true);
///
/// assert_eq!(surcharges.solidarity_surcharge, dec!(110.00));
/// assert_eq!(surcharges.church_tax, dec!(1811.70));
/// ```
pub fn compute_surcharges(
    income_tax: Decimal,
    constants: &TaxYearConstants,
    church_tax_opt_in: bool,
) -> Surcharges {
    let excess = non_negative(income_tax - constants.solidarity_surcharge_threshold);
    let solidarity_surcharge = round_half_up(excess * constants.solidarity_surcharge_rate);

    let church_tax = if church_tax_opt_in {
        round_half_up(income_tax * constants.church_tax_rate)
    } else {
        Decimal::ZERO
    };

    Surcharges {
        solidarity_surcharge,
        church_tax,
    }
}
