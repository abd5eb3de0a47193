//! Deterministic German income tax and social contribution engine.
//!
//! ```
//! use rust_decimal_macros::dec;
//! use steuer_core::{CalculationRequest, FilingStatus, TaxYearTable, calculate_with_table};
//!
//! let table = TaxYearTable::builtin();
//! let request = CalculationRequest::new(dec!(160000), 2024)
//!     .with_filing_status(FilingStatus::MarriedJoint)
//!     .with_dependents(2);
//!
//! let result = calculate_with_table(&request, &table).unwrap();
//! assert!(result.net_annual_income > dec!(0));
//! ```

pub mod calculations;
pub mod error;
pub mod models;
pub mod tables;

pub use calculations::{
    DeductionImpact, TaxEngine, analyze_deduction_impact, calculate, calculate_with_table,
    estimate_deduction_savings,
};
pub use error::{CalculationError, ConfigurationError, InvalidInput};
pub use models::*;
pub use tables::TaxYearTable;
