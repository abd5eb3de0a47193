use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One band of the income-tax schedule.
///
/// Covers taxable income in `[lower_bound, upper_bound)`; `upper_bound` is
/// `None` for the open-ended top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower_bound: Decimal,
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        lower_bound: Decimal,
        upper_bound: Option<Decimal>,
        rate: Decimal,
    ) -> Self {
        Self {
            lower_bound,
            upper_bound,
            rate,
        }
    }

    pub fn contains(
        &self,
        income: Decimal,
    ) -> bool {
        income >= self.lower_bound && self.upper_bound.is_none_or(|upper| income < upper)
    }

    /// Portion of `income` that falls inside this bracket.
    pub fn portion_of(
        &self,
        income: Decimal,
    ) -> Decimal {
        if income <= self.lower_bound {
            return Decimal::ZERO;
        }
        let top = match self.upper_bound {
            Some(upper) => income.min(upper),
            None => income,
        };
        top - self.lower_bound
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn contains_is_half_open() {
        let bracket = TaxBracket::new(dec!(11604), Some(dec!(17005)), dec!(0.14));

        assert!(bracket.contains(dec!(11604)));
        assert!(bracket.contains(dec!(17004.99)));
        assert!(!bracket.contains(dec!(17005)));
        assert!(!bracket.contains(dec!(11603.99)));
    }

    #[test]
    fn unbounded_bracket_contains_everything_above_lower_bound() {
        let bracket = TaxBracket::new(dec!(277825), None, dec!(0.45));

        assert!(bracket.contains(dec!(10000000)));
    }

    #[test]
    fn portion_of_income_below_bracket_is_zero() {
        let bracket = TaxBracket::new(dec!(17005), Some(dec!(66760)), dec!(0.24));

        assert_eq!(bracket.portion_of(dec!(12000)), dec!(0));
    }

    #[test]
    fn portion_of_income_inside_bracket() {
        let bracket = TaxBracket::new(dec!(17005), Some(dec!(66760)), dec!(0.24));

        assert_eq!(bracket.portion_of(dec!(20000)), dec!(2995));
    }

    #[test]
    fn portion_of_income_above_bracket_is_full_width() {
        let bracket = TaxBracket::new(dec!(17005), Some(dec!(66760)), dec!(0.24));

        assert_eq!(bracket.portion_of(dec!(80000)), dec!(49755));
    }
}
