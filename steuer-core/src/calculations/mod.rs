//! German income tax and social contribution calculations.
//!
//! Every stage is a pure function over a request and a borrowed
//! [`TaxYearConstants`](crate::TaxYearConstants); [`TaxEngine`] chains them.

pub mod common;
pub mod contributions;
pub mod deduction_impact;
pub mod engine;
pub mod income_tax;
pub mod scenarios;
pub mod surcharges;
pub mod taxable_income;

pub use contributions::{ContributionBreakdown, compute_contributions};
pub use deduction_impact::{DeductionImpact, analyze_deduction_impact, estimate_deduction_savings};
pub use engine::{TaxEngine, aggregate, calculate, calculate_with_table};
pub use income_tax::{compute_income_tax, find_bracket, marginal_rate, schedule_tax};
pub use scenarios::{
    Scenario, ScenarioComparison, ScenarioOutcome, compare_filing_statuses, compare_scenarios,
    net_income,
};
pub use surcharges::{Surcharges, compute_surcharges};
pub use taxable_income::{TaxableIncome, compute_taxable_income};
