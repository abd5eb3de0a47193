use std::collections::BTreeMap;
use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use steuer_core::TaxBracket;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading a bracket schedule.
#[derive(Debug, Error)]
pub enum BracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("row {row}: bracket for tax year {tax_year} duplicates lower bound {lower_bound}")]
    DuplicateLowerBound {
        row: usize,
        tax_year: i32,
        lower_bound: Decimal,
    },
}

impl From<csv::Error> for BracketLoaderError {
    fn from(err: csv::Error) -> Self {
        BracketLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from a bracket schedule CSV file.
///
/// - `tax_year`: the assessment year (e.g., 2024)
/// - `lower_bound`: first euro of taxable income in this bracket
/// - `upper_bound`: first euro of the next bracket (empty for unlimited)
/// - `rate`: the marginal rate as a decimal (e.g., 0.42 for 42%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxBracketRecord {
    pub tax_year: i32,
    pub lower_bound: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for bracket schedules from CSV files.
///
/// One file may hold schedules for several years. Rows may appear in any
/// order; [`TaxBracketLoader::group_by_year`] sorts each year's brackets by
/// lower bound. Structural checks (gaps, monotonic rates) are left to
/// [`steuer_core::TaxYearConstants::validate`].
pub struct TaxBracketLoader;

impl TaxBracketLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxBracketRecord>, BracketLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxBracketRecord = result?;
            records.push(record);
        }

        debug!(records = records.len(), "parsed bracket records");
        Ok(records)
    }

    /// Groups records into one ordered schedule per tax year.
    ///
    /// Two rows of the same year with the same lower bound are rejected;
    /// `row` in the error is 1-based, not counting the header.
    pub fn group_by_year(
        records: &[TaxBracketRecord]
    ) -> Result<BTreeMap<i32, Vec<TaxBracket>>, BracketLoaderError> {
        let mut groups: BTreeMap<i32, Vec<TaxBracket>> = BTreeMap::new();

        for (idx, record) in records.iter().enumerate() {
            let schedule = groups.entry(record.tax_year).or_default();
            if schedule
                .iter()
                .any(|bracket| bracket.lower_bound == record.lower_bound)
            {
                return Err(BracketLoaderError::DuplicateLowerBound {
                    row: idx + 1,
                    tax_year: record.tax_year,
                    lower_bound: record.lower_bound,
                });
            }
            schedule.push(TaxBracket::new(
                record.lower_bound,
                record.upper_bound,
                record.rate,
            ));
        }

        for schedule in groups.values_mut() {
            schedule.sort_by(|a, b| a.lower_bound.cmp(&b.lower_bound));
        }

        Ok(groups)
    }

    /// Parse and group in one step.
    pub fn load<R: Read>(reader: R) -> Result<BTreeMap<i32, Vec<TaxBracket>>, BracketLoaderError> {
        let records = Self::parse(reader)?;
        Self::group_by_year(&records)
    }
}
