//! CSV loader for batches of calculation requests.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter.
//!
//! | Column | Required | Type | Notes |
//! |-----------------------|----------|---------|------------------------------------------|
//! | `gross_annual_income` | yes | decimal | e.g. `80000.00` |
//! | `filing_status` | yes | string | `single`, `married_joint`, ... |
//! | `dependents` | yes | integer | must not be negative |
//! | `insurance_type` | yes | string | `statutory` or `private` |
//! | `has_children` | no | bool | empty: true when `dependents > 0` |
//! | `itemized_deductions` | no | decimal | empty: 0 |
//! | `church_tax` | no | bool | empty: false |
//! | `tax_year` | no | integer | empty: the caller's default year |
//!
//! ### Example
//!
//! ```csv
//! gross_annual_income,filing_status,dependents,insurance_type,has_children,itemized_deductions,church_tax,tax_year
//! 80000,single,0,statutory,,,,2024
//! 160000,married_joint,2,private,true,3500,true,2024
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use steuer_core::{
    CalculationRequest, FilingStatus, InsuranceType, InvalidInput, dependents_from_signed,
};
use thiserror::Error;

#[derive(Debug, Deserialize)]
struct CsvRow {
    gross_annual_income: Decimal,
    filing_status: String,
    dependents: i64,
    insurance_type: String,
    has_children: Option<bool>,
    itemized_deductions: Option<Decimal>,
    church_tax: Option<bool>,
    tax_year: Option<i32>,
}

/// Errors that can occur while loading a request batch.
#[derive(Debug, Error)]
pub enum RequestLoadError {
    #[error("cannot read request file: {0}")]
    Io(#[from] std::io::Error),

    /// Bad structure, missing required column, type mismatch.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A row parsed but describes an invalid request. `row` is 1-based,
    /// not counting the header.
    #[error("row {row}: {source}")]
    InvalidRow { row: usize, source: InvalidInput },
}

fn convert_row(
    row: CsvRow,
    default_year: i32,
) -> Result<CalculationRequest, InvalidInput> {
    let filing_status = row.filing_status.parse::<FilingStatus>()?;
    let insurance_type = row.insurance_type.parse::<InsuranceType>()?;
    let dependents = dependents_from_signed(row.dependents)?;

    let tax_year = row.tax_year.unwrap_or(default_year);
    let request = CalculationRequest::new(row.gross_annual_income, tax_year)
        .with_filing_status(filing_status)
        .with_insurance_type(insurance_type)
        .with_dependents(dependents)
        .with_itemized_deductions(row.itemized_deductions.unwrap_or(Decimal::ZERO))
        .with_church_tax(row.church_tax.unwrap_or(false));
    let request = match row.has_children {
        Some(has_children) => request.with_children(has_children),
        None => request,
    };

    request.validate()?;
    Ok(request)
}

/// Parse CSV text into requests, in file order.
///
/// Rows without a `tax_year` get `default_year`.
///
/// # Errors
///
/// * [`RequestLoadError::Parse`] if the CSV is structurally invalid.
/// * [`RequestLoadError::InvalidRow`] for the first row holding an unknown
///   filing status or insurance type, a negative amount or a negative
///   dependents count.
pub fn load_from_str(
    input: &str,
    default_year: i32,
) -> Result<Vec<CalculationRequest>, RequestLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, default_year)
                .map_err(|source| RequestLoadError::InvalidRow { row: idx + 1, source })
        })
        .collect()
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(
    path: &Path,
    default_year: i32,
) -> Result<Vec<CalculationRequest>, RequestLoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents, default_year)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const MINIMAL_CSV: &str = "\
gross_annual_income,filing_status,dependents,insurance_type
80000,single,0,statutory
";

    const FULL_CSV: &str = "\
gross_annual_income,filing_status,dependents,insurance_type,has_children,itemized_deductions,church_tax,tax_year
160000,married_joint,2,private,true,3500.50,true,2024
42000,head_of_household,0,statutory,true,,,
";

    #[test]
    fn test_minimal_row_uses_defaults() {
        let requests = load_from_str(MINIMAL_CSV, 2024).expect("Failed to load");

        assert_eq!(requests, vec![CalculationRequest::new(dec!(80000), 2024)]);
    }

    #[test]
    fn test_full_rows() {
        let requests = load_from_str(FULL_CSV, 2030).expect("Failed to load");

        assert_eq!(
            requests[0],
            CalculationRequest::new(dec!(160000), 2024)
                .with_filing_status(FilingStatus::MarriedJoint)
                .with_insurance_type(InsuranceType::Private)
                .with_dependents(2)
                .with_itemized_deductions(dec!(3500.50))
                .with_church_tax(true)
        );

        // empty cells fall back to defaults
        assert_eq!(requests[1].tax_year, 2030);
        assert_eq!(requests[1].itemized_deductions, dec!(0));
        assert!(requests[1].has_children);
        assert!(!requests[1].church_tax);
    }

    #[test]
    fn test_dependents_imply_children_when_column_empty() {
        let csv = "\
gross_annual_income,filing_status,dependents,insurance_type,has_children
50000,single,1,statutory,
";

        let requests = load_from_str(csv, 2024).expect("Failed to load");

        assert!(requests[0].has_children);
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let csv = "\
insurance_type,dependents,filing_status,gross_annual_income
statutory,0,single,80000
";

        let requests = load_from_str(csv, 2024).expect("Failed to load");

        assert_eq!(requests, vec![CalculationRequest::new(dec!(80000), 2024)]);
    }

    #[test]
    fn test_unknown_filing_status_reports_row() {
        let csv = "\
gross_annual_income,filing_status,dependents,insurance_type
80000,single,0,statutory
80000,married,0,statutory
";

        let err = load_from_str(csv, 2024).expect_err("Should reject status");

        match err {
            RequestLoadError::InvalidRow { row, source } => {
                assert_eq!(row, 2);
                assert_eq!(source, InvalidInput::UnknownFilingStatus("married".to_string()));
            }
            other => panic!("expected InvalidRow, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_dependents_rejected() {
        let csv = "\
gross_annual_income,filing_status,dependents,insurance_type
80000,single,-1,statutory
";

        let err = load_from_str(csv, 2024).expect_err("Should reject dependents");

        assert!(matches!(
            err,
            RequestLoadError::InvalidRow {
                row: 1,
                source: InvalidInput::NegativeDependents(-1),
            }
        ));
    }

    #[test]
    fn test_negative_income_rejected() {
        let csv = "\
gross_annual_income,filing_status,dependents,insurance_type
-100,single,0,statutory
";

        let err = load_from_str(csv, 2024).expect_err("Should reject income");

        assert!(matches!(
            err,
            RequestLoadError::InvalidRow {
                source: InvalidInput::NegativeIncome(_),
                ..
            }
        ));
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "gross_annual_income,filing_status\n80000,single\n";

        let err = load_from_str(csv, 2024).expect_err("Should fail");

        assert!(matches!(err, RequestLoadError::Parse(_)));
    }

    #[test]
    fn test_empty_file_yields_no_requests() {
        let csv = "gross_annual_income,filing_status,dependents,insurance_type\n";

        assert!(load_from_str(csv, 2024).expect("Failed to load").is_empty());
    }
}
