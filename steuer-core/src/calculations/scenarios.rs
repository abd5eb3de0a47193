//! Side-by-side evaluation of alternative requests.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use steuer_core::{CalculationRequest, FilingStatus};
//! use steuer_core::calculations::compare_filing_statuses;
//! use steuer_core::tables::germany_2024;
//!
//! let constants = germany_2024();
//! let request = CalculationRequest::new(dec!(80000), 2024);
//!
//! let comparison =
//!     compare_filing_statuses(&request, &[FilingStatus::MarriedJoint], &constants).unwrap();
//!
//! assert_eq!(comparison.variants[0].net_income_delta, dec!(5486.86));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::engine::calculate;
use crate::error::CalculationError;
use crate::models::{CalculationRequest, CalculationResult, FilingStatus, TaxYearConstants};

/// A labelled request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub label: String,
    pub request: CalculationRequest,
}

impl Scenario {
    pub fn new(
        label: impl Into<String>,
        request: CalculationRequest,
    ) -> Self {
        Self {
            label: label.into(),
            request,
        }
    }
}

/// One evaluated scenario and how it differs from the baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub label: String,
    pub result: CalculationResult,

    /// `net_annual_income − baseline net`; positive is better.
    pub net_income_delta: Decimal,

    /// `total_taxes − baseline total_taxes`; negative is better.
    pub total_taxes_delta: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub baseline: ScenarioOutcome,
    pub variants: Vec<ScenarioOutcome>,
}

impl ScenarioComparison {
    /// Outcome with the highest net income; the baseline wins ties.
    pub fn best(&self) -> &ScenarioOutcome {
        self.variants
            .iter()
            .fold(&self.baseline, |best, outcome| {
                if outcome.result.net_annual_income > best.result.net_annual_income {
                    outcome
                } else {
                    best
                }
            })
    }
}

/// Evaluates `baseline` and each of `variants` against the same constants.
///
/// # Errors
///
/// The first error any scenario raises; no partial comparison is returned.
pub fn compare_scenarios(
    baseline: &Scenario,
    variants: &[Scenario],
    constants: &TaxYearConstants,
) -> Result<ScenarioComparison, CalculationError> {
    let base_result = calculate(&baseline.request, constants)?;

    let variants = variants
        .iter()
        .map(|scenario| {
            let result = calculate(&scenario.request, constants)?;
            Ok(outcome(&scenario.label, result, &base_result))
        })
        .collect::<Result<Vec<_>, CalculationError>>()?;

    Ok(ScenarioComparison {
        baseline: outcome(&baseline.label, base_result.clone(), &base_result),
        variants,
    })
}

/// Compares the request as filed against the same request under other
/// filing statuses.
///
/// # Errors
///
/// See [`compare_scenarios`].
pub fn compare_filing_statuses(
    request: &CalculationRequest,
    statuses: &[FilingStatus],
    constants: &TaxYearConstants,
) -> Result<ScenarioComparison, CalculationError> {
    let baseline = Scenario::new(request.filing_status.label(), request.clone());
    let variants: Vec<Scenario> = statuses
        .iter()
        .map(|status| {
            Scenario::new(
                status.label(),
                request.clone().with_filing_status(*status),
            )
        })
        .collect();

    compare_scenarios(&baseline, &variants, constants)
}

/// Net annual income of a request.
///
/// # Errors
///
/// See [`calculate`].
pub fn net_income(
    request: &CalculationRequest,
    constants: &TaxYearConstants,
) -> Result<Decimal, CalculationError> {
    calculate(request, constants).map(|result| result.net_annual_income)
}

fn outcome(
    label: &str,
    result: CalculationResult,
    baseline: &CalculationResult,
) -> ScenarioOutcome {
    ScenarioOutcome {
        label: label.to_string(),
        net_income_delta: result.net_annual_income - baseline.net_annual_income,
        total_taxes_delta: result.total_taxes - baseline.total_taxes,
        result,
    }
}
