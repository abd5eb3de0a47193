use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::models::TaxBracket;

/// The four social-insurance branches an employee contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionKind {
    Health,
    Pension,
    Unemployment,
    LongTermCare,
}

impl ContributionKind {
    pub const ALL: [ContributionKind; 4] = [
        Self::Health,
        Self::Pension,
        Self::Unemployment,
        Self::LongTermCare,
    ];
}

impl fmt::Display for ContributionKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(match self {
            Self::Health => "health insurance",
            Self::Pension => "pension insurance",
            Self::Unemployment => "unemployment insurance",
            Self::LongTermCare => "long-term care insurance",
        })
    }
}

/// Employee contribution rate and the assessment ceiling
/// (Beitragsbemessungsgrenze) above which no further contribution accrues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRate {
    pub rate: Decimal,
    pub ceiling: Decimal,
}

impl ContributionRate {
    pub fn new(
        rate: Decimal,
        ceiling: Decimal,
    ) -> Self {
        Self { rate, ceiling }
    }

    /// Income subject to this contribution.
    pub fn assessment_base(
        &self,
        gross_income: Decimal,
    ) -> Decimal {
        gross_income.min(self.ceiling)
    }
}

/// Statutory figures for one tax year.
///
/// A table is built once (from the built-in data or a constants file),
/// validated, and then only ever read. The engine takes it by shared
/// reference on every call.
///
/// The basic allowance is part of the bracket schedule: the first bracket
/// is the zero-rate band `[0, basic_allowance)`. Joint filers get the
/// doubled allowance through the splitting method, which is why
/// `basic_allowance_married` must equal twice `basic_allowance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearConstants {
    pub tax_year: i32,

    /// Grundfreibetrag for a single filer.
    pub basic_allowance: Decimal,

    /// Grundfreibetrag for a jointly assessed couple.
    pub basic_allowance_married: Decimal,

    /// Werbungskosten-Pauschbetrag, used unless itemized deductions exceed it.
    pub work_expense_allowance: Decimal,

    /// Kinderfreibetrag per dependent. Zero disables the allowance.
    pub child_allowance: Decimal,

    /// Single-filer schedule, ascending.
    pub brackets: Vec<TaxBracket>,

    pub solidarity_surcharge_rate: Decimal,

    /// Income tax up to this amount carries no solidarity surcharge.
    pub solidarity_surcharge_threshold: Decimal,

    pub church_tax_rate: Decimal,

    pub health_insurance: ContributionRate,

    /// Flat annual estimate used instead of a rate for privately insured filers.
    pub private_health_premium: Decimal,

    pub pension: ContributionRate,

    pub unemployment: ContributionRate,

    pub long_term_care: ContributionRate,

    /// Additional long-term care rate for filers without children.
    pub long_term_care_childless_surcharge: Decimal,
}

impl TaxYearConstants {
    pub fn contribution(
        &self,
        kind: ContributionKind,
    ) -> &ContributionRate {
        match kind {
            ContributionKind::Health => &self.health_insurance,
            ContributionKind::Pension => &self.pension,
            ContributionKind::Unemployment => &self.unemployment,
            ContributionKind::LongTermCare => &self.long_term_care,
        }
    }

    /// Checks every structural invariant of the table.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigurationError`] found:
    /// - brackets missing, not starting at 0, leaving gaps or overlapping
    /// - an unbounded bracket before the last one, or a bounded last bracket
    /// - rates outside `[0, 1]` or decreasing from one bracket to the next
    /// - the first bracket not being the zero-rate basic allowance, or the
    ///   married allowance not being twice the single one
    /// - negative allowances, thresholds or premiums, rates outside `[0, 1]`
    /// - non-positive contribution ceilings
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.validate_amounts()?;
        self.validate_brackets()?;
        self.validate_allowances()?;
        self.validate_contributions()
    }

    fn validate_amounts(&self) -> Result<(), ConfigurationError> {
        let year = self.tax_year;
        let amounts = [
            ("basic_allowance", self.basic_allowance),
            ("basic_allowance_married", self.basic_allowance_married),
            ("work_expense_allowance", self.work_expense_allowance),
            ("child_allowance", self.child_allowance),
            ("solidarity_surcharge_threshold", self.solidarity_surcharge_threshold),
            ("private_health_premium", self.private_health_premium),
        ];
        for (field, value) in amounts {
            if value < Decimal::ZERO {
                return Err(ConfigurationError::NegativeAmount { year, field, value });
            }
        }

        let rates = [
            ("solidarity_surcharge_rate", self.solidarity_surcharge_rate),
            ("church_tax_rate", self.church_tax_rate),
            (
                "long_term_care_childless_surcharge",
                self.long_term_care_childless_surcharge,
            ),
        ];
        for (field, value) in rates {
            if !is_fraction(value) {
                return Err(ConfigurationError::InvalidRate { year, field, value });
            }
        }
        Ok(())
    }

    fn validate_brackets(&self) -> Result<(), ConfigurationError> {
        let year = self.tax_year;
        let Some(first) = self.brackets.first() else {
            return Err(ConfigurationError::NoBrackets(year));
        };
        if first.lower_bound != Decimal::ZERO {
            return Err(ConfigurationError::FirstBracketNotAtZero {
                year,
                lower_bound: first.lower_bound,
            });
        }

        let last_index = self.brackets.len() - 1;
        let mut previous: Option<&TaxBracket> = None;
        for (index, bracket) in self.brackets.iter().enumerate() {
            if !is_fraction(bracket.rate) {
                return Err(ConfigurationError::RateOutOfRange {
                    year,
                    index,
                    rate: bracket.rate,
                });
            }

            match bracket.upper_bound {
                Some(upper) if upper <= bracket.lower_bound => {
                    return Err(ConfigurationError::EmptyBracket { year, index });
                }
                Some(_) if index == last_index => {
                    return Err(ConfigurationError::BoundedLastBracket(year));
                }
                None if index != last_index => {
                    return Err(ConfigurationError::UnboundedInnerBracket { year, index });
                }
                _ => {}
            }

            if let Some(prev) = previous {
                if prev.upper_bound != Some(bracket.lower_bound) {
                    return Err(ConfigurationError::BracketGap { year, index });
                }
                if bracket.rate < prev.rate {
                    return Err(ConfigurationError::NonMonotonicRates { year, index });
                }
            }
            previous = Some(bracket);
        }
        Ok(())
    }

    fn validate_allowances(&self) -> Result<(), ConfigurationError> {
        let year = self.tax_year;
        let first = &self.brackets[0];
        if first.rate != Decimal::ZERO || first.upper_bound != Some(self.basic_allowance) {
            return Err(ConfigurationError::AllowanceNotInSchedule {
                year,
                basic_allowance: self.basic_allowance,
            });
        }
        if self.basic_allowance_married != self.basic_allowance * Decimal::TWO {
            return Err(ConfigurationError::MarriedAllowanceMismatch {
                year,
                single: self.basic_allowance,
                married: self.basic_allowance_married,
            });
        }
        Ok(())
    }

    fn validate_contributions(&self) -> Result<(), ConfigurationError> {
        let year = self.tax_year;
        for kind in ContributionKind::ALL {
            let contribution = self.contribution(kind);
            if !is_fraction(contribution.rate) {
                return Err(ConfigurationError::InvalidRate {
                    year,
                    field: rate_field(kind),
                    value: contribution.rate,
                });
            }
            if contribution.ceiling <= Decimal::ZERO {
                return Err(ConfigurationError::InvalidCeiling {
                    year,
                    kind,
                    value: contribution.ceiling,
                });
            }
        }
        Ok(())
    }
}

fn is_fraction(value: Decimal) -> bool {
    value >= Decimal::ZERO && value <= Decimal::ONE
}

fn rate_field(kind: ContributionKind) -> &'static str {
    match kind {
        ContributionKind::Health => "health_insurance.rate",
        ContributionKind::Pension => "pension.rate",
        ContributionKind::Unemployment => "unemployment.rate",
        ContributionKind::LongTermCare => "long_term_care.rate",
    }
}
