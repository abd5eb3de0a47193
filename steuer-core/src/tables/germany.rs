//! Built-in German tax-year figures.

use rust_decimal_macros::dec;

use crate::models::{ContributionRate, TaxBracket, TaxYearConstants};

/// Figures for the 2024 assessment year.
///
/// The schedule is the simplified linear-bracket form of the 2024 tariff,
/// with the Grundfreibetrag as a zero-rate first bracket. Contribution rates
/// are employee shares; the health rate includes half of the average
/// additional contribution.
pub fn germany_2024() -> TaxYearConstants {
    TaxYearConstants {
        tax_year: 2024,
        basic_allowance: dec!(11604),
        basic_allowance_married: dec!(23208),
        work_expense_allowance: dec!(1230),
        child_allowance: dec!(6384),
        brackets: vec![
            TaxBracket::new(dec!(0), Some(dec!(11604)), dec!(0)),
            TaxBracket::new(dec!(11604), Some(dec!(17005)), dec!(0.14)),
            TaxBracket::new(dec!(17005), Some(dec!(66760)), dec!(0.24)),
            TaxBracket::new(dec!(66760), Some(dec!(277825)), dec!(0.42)),
            TaxBracket::new(dec!(277825), None, dec!(0.45)),
        ],
        solidarity_surcharge_rate: dec!(0.055),
        solidarity_surcharge_threshold: dec!(18130),
        church_tax_rate: dec!(0.09),
        health_insurance: ContributionRate::new(dec!(0.0815), dec!(62100)),
        private_health_premium: dec!(5400),
        pension: ContributionRate::new(dec!(0.093), dec!(90600)),
        unemployment: ContributionRate::new(dec!(0.013), dec!(90600)),
        long_term_care: ContributionRate::new(dec!(0.017), dec!(62100)),
        long_term_care_childless_surcharge: dec!(0.006),
    }
}
