//! Error types shared by the calculation engine and the constants table.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::ContributionKind;

/// A request that cannot be evaluated.
///
/// Raised before any arithmetic happens; the engine never produces a partial
/// result and never substitutes a default for an unrecognised value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("gross annual income must be non-negative, got {0}")]
    NegativeIncome(Decimal),

    #[error("itemized deductions must be non-negative, got {0}")]
    NegativeDeductions(Decimal),

    #[error("additional deduction must be non-negative, got {0}")]
    NegativeAdditionalDeduction(Decimal),

    #[error(
        "itemized deductions {itemized} plus {additional} exceed the decimal range"
    )]
    DeductionOutOfRange {
        itemized: Decimal,
        additional: Decimal,
    },

    #[error("number of dependents must be non-negative, got {0}")]
    NegativeDependents(i64),

    #[error("unrecognised filing status '{0}'")]
    UnknownFilingStatus(String),

    #[error("unrecognised insurance type '{0}'")]
    UnknownInsuranceType(String),
}

/// A malformed tax-year table.
///
/// Detected when a table is validated at load time so that a bad table fails
/// at startup instead of in the middle of a request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("tax year {0}: no tax brackets provided")]
    NoBrackets(i32),

    #[error("tax year {year}: first bracket must start at 0, starts at {lower_bound}")]
    FirstBracketNotAtZero { year: i32, lower_bound: Decimal },

    #[error("tax year {year}: bracket {index} does not start where the previous one ends")]
    BracketGap { year: i32, index: usize },

    #[error("tax year {year}: bracket {index} has an upper bound not above its lower bound")]
    EmptyBracket { year: i32, index: usize },

    #[error("tax year {year}: only the last bracket may be unbounded (bracket {index})")]
    UnboundedInnerBracket { year: i32, index: usize },

    #[error("tax year {0}: last bracket must be unbounded")]
    BoundedLastBracket(i32),

    #[error("tax year {year}: bracket {index} rate {rate} must lie between 0 and 1")]
    RateOutOfRange { year: i32, index: usize, rate: Decimal },

    #[error("tax year {year}: bracket {index} rate is lower than the previous bracket's")]
    NonMonotonicRates { year: i32, index: usize },

    #[error("tax year {year}: first bracket must be [0, {basic_allowance}) at a zero rate")]
    AllowanceNotInSchedule { year: i32, basic_allowance: Decimal },

    #[error(
        "tax year {year}: married allowance {married} must be twice the basic allowance {single}"
    )]
    MarriedAllowanceMismatch {
        year: i32,
        single: Decimal,
        married: Decimal,
    },

    #[error("tax year {year}: {field} must be non-negative, got {value}")]
    NegativeAmount {
        year: i32,
        field: &'static str,
        value: Decimal,
    },

    #[error("tax year {year}: {field} must lie between 0 and 1, got {value}")]
    InvalidRate {
        year: i32,
        field: &'static str,
        value: Decimal,
    },

    #[error("tax year {year}: no contribution ceiling configured for {kind}")]
    MissingCeiling { year: i32, kind: ContributionKind },

    #[error("tax year {year}: contribution ceiling for {kind} must be positive, got {value}")]
    InvalidCeiling {
        year: i32,
        kind: ContributionKind,
        value: Decimal,
    },
}

/// Any failure of a calculation entry point.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CalculationError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("no tax-year constants for {requested}{}", available_suffix(.available))]
    UnsupportedTaxYear { requested: i32, available: Vec<i32> },
}

fn available_suffix(available: &[i32]) -> String {
    if available.is_empty() {
        String::new()
    } else {
        format!("; available: {available:?}")
    }
}
