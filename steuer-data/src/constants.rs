//! Tax-year constants from TOML, with brackets inline or from CSV.
//!
//! ## File format
//!
//! One `[[tax_year]]` table per year. Decimal values may be written as
//! integers or as strings (`"0.0815"`); strings keep the exact digits.
//!
//! ```toml
//! [[tax_year]]
//! year = 2024
//! basic_allowance = 11604
//! work_expense_allowance = 1230
//! child_allowance = 6384
//! solidarity_surcharge_rate = "0.055"
//! solidarity_surcharge_threshold = 18130
//! church_tax_rate = "0.09"
//! private_health_premium = 5400
//! long_term_care_childless_surcharge = "0.006"
//!
//! [tax_year.health_insurance]
//! rate = "0.0815"
//! ceiling = 62100
//!
//! # pension, unemployment and long_term_care follow the same shape
//!
//! [[tax_year.bracket]]
//! lower_bound = 0
//! upper_bound = 11604
//! rate = "0"
//! ```
//!
//! `basic_allowance_married` defaults to twice `basic_allowance`. A year
//! without `[[tax_year.bracket]]` entries takes its schedule from the
//! bracket CSV (see [`crate::brackets`]).

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use steuer_core::{
    ConfigurationError, ContributionKind, ContributionRate, TaxBracket, TaxYearConstants,
    TaxYearTable,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::brackets::{BracketLoaderError, TaxBracketLoader};

/// Errors that can occur when loading tax-year constants.
#[derive(Debug, Error)]
pub enum ConstantsLoaderError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error(transparent)]
    Brackets(#[from] BracketLoaderError),

    #[error("tax year {0} appears more than once")]
    DuplicateYear(i32),

    #[error("tax year {0} has no brackets, inline or from CSV")]
    MissingBrackets(i32),

    #[error("tax year {0} has brackets both inline and in the CSV")]
    ConflictingBrackets(i32),

    #[error("bracket CSV has a schedule for tax year {0}, which the constants file lacks")]
    OrphanBrackets(i32),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConstantsFile {
    #[serde(default)]
    tax_year: Vec<TaxYearEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TaxYearEntry {
    year: i32,
    basic_allowance: Decimal,
    basic_allowance_married: Option<Decimal>,
    work_expense_allowance: Decimal,
    #[serde(default)]
    child_allowance: Decimal,
    solidarity_surcharge_rate: Decimal,
    solidarity_surcharge_threshold: Decimal,
    church_tax_rate: Decimal,
    private_health_premium: Decimal,
    long_term_care_childless_surcharge: Decimal,
    health_insurance: ContributionEntry,
    pension: ContributionEntry,
    unemployment: ContributionEntry,
    long_term_care: ContributionEntry,
    #[serde(default)]
    bracket: Vec<BracketEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ContributionEntry {
    rate: Decimal,
    ceiling: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BracketEntry {
    lower_bound: Decimal,
    upper_bound: Option<Decimal>,
    rate: Decimal,
}

impl ContributionEntry {
    fn into_rate(
        self,
        year: i32,
        kind: ContributionKind,
    ) -> Result<ContributionRate, ConfigurationError> {
        let ceiling = self
            .ceiling
            .ok_or(ConfigurationError::MissingCeiling { year, kind })?;
        Ok(ContributionRate::new(self.rate, ceiling))
    }
}

impl TaxYearEntry {
    fn into_constants(
        self,
        brackets: Vec<TaxBracket>,
    ) -> Result<TaxYearConstants, ConfigurationError> {
        let year = self.year;
        Ok(TaxYearConstants {
            tax_year: year,
            basic_allowance: self.basic_allowance,
            basic_allowance_married: self
                .basic_allowance_married
                .unwrap_or(self.basic_allowance * Decimal::TWO),
            work_expense_allowance: self.work_expense_allowance,
            child_allowance: self.child_allowance,
            brackets,
            solidarity_surcharge_rate: self.solidarity_surcharge_rate,
            solidarity_surcharge_threshold: self.solidarity_surcharge_threshold,
            church_tax_rate: self.church_tax_rate,
            health_insurance: self
                .health_insurance
                .into_rate(year, ContributionKind::Health)?,
            private_health_premium: self.private_health_premium,
            pension: self.pension.into_rate(year, ContributionKind::Pension)?,
            unemployment: self
                .unemployment
                .into_rate(year, ContributionKind::Unemployment)?,
            long_term_care: self
                .long_term_care
                .into_rate(year, ContributionKind::LongTermCare)?,
            long_term_care_childless_surcharge: self.long_term_care_childless_surcharge,
        })
    }
}

/// Loader for [`TaxYearConstants`] files.
pub struct ConstantsLoader;

impl ConstantsLoader {
    /// Parses a constants document.
    ///
    /// `csv_brackets` supplies schedules for years without inline brackets.
    /// Every returned table has passed [`TaxYearConstants::validate`].
    pub fn parse(
        toml_text: &str,
        csv_brackets: &BTreeMap<i32, Vec<TaxBracket>>,
    ) -> Result<Vec<TaxYearConstants>, ConstantsLoaderError> {
        let file: ConstantsFile = toml::from_str(toml_text)?;

        if let Some(year) = csv_brackets
            .keys()
            .find(|year| !file.tax_year.iter().any(|entry| entry.year == **year))
        {
            return Err(ConstantsLoaderError::OrphanBrackets(*year));
        }

        let mut tables: Vec<TaxYearConstants> = Vec::with_capacity(file.tax_year.len());
        for mut entry in file.tax_year {
            let year = entry.year;
            if tables.iter().any(|table| table.tax_year == year) {
                return Err(ConstantsLoaderError::DuplicateYear(year));
            }

            let inline: Vec<TaxBracket> = std::mem::take(&mut entry.bracket)
                .into_iter()
                .map(|b| TaxBracket::new(b.lower_bound, b.upper_bound, b.rate))
                .collect();
            let brackets = match (inline.is_empty(), csv_brackets.get(&year)) {
                (false, None) => inline,
                (true, Some(schedule)) => schedule.clone(),
                (false, Some(_)) => return Err(ConstantsLoaderError::ConflictingBrackets(year)),
                (true, None) => return Err(ConstantsLoaderError::MissingBrackets(year)),
            };

            let constants = entry.into_constants(brackets)?;
            constants.validate()?;
            debug!(tax_year = year, "parsed tax-year constants");
            tables.push(constants);
        }

        Ok(tables)
    }

    /// Reads a constants file and an optional bracket CSV into a table.
    pub fn load_table(
        constants_path: &Path,
        brackets_path: Option<&Path>,
    ) -> Result<TaxYearTable, ConstantsLoaderError> {
        let toml_text =
            std::fs::read_to_string(constants_path).map_err(|source| ConstantsLoaderError::Io {
                path: constants_path.to_path_buf(),
                source,
            })?;

        let csv_brackets = match brackets_path {
            Some(path) => {
                let file = File::open(path).map_err(|source| ConstantsLoaderError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                TaxBracketLoader::load(file)?
            }
            None => BTreeMap::new(),
        };

        let mut table = TaxYearTable::new();
        for constants in Self::parse(&toml_text, &csv_brackets)? {
            table.insert(constants)?;
        }

        info!(
            path = %constants_path.display(),
            years = ?table.years(),
            "loaded tax-year constants"
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use steuer_core::tables::germany_2024;

    use super::*;

    const SCALARS_2024: &str = r#"
[[tax_year]]
year = 2024
basic_allowance = 11604
work_expense_allowance = 1230
child_allowance = 6384
solidarity_surcharge_rate = "0.055"
solidarity_surcharge_threshold = 18130
church_tax_rate = "0.09"
private_health_premium = 5400
long_term_care_childless_surcharge = "0.006"

[tax_year.health_insurance]
rate = "0.0815"
ceiling = 62100

[tax_year.pension]
rate = "0.093"
ceiling = 90600

[tax_year.unemployment]
rate = "0.013"
ceiling = 90600

[tax_year.long_term_care]
rate = "0.017"
ceiling = 62100
"#;

    const INLINE_BRACKETS: &str = r#"
[[tax_year.bracket]]
lower_bound = 0
upper_bound = 11604
rate = "0"

[[tax_year.bracket]]
lower_bound = 11604
upper_bound = 17005
rate = "0.14"

[[tax_year.bracket]]
lower_bound = 17005
upper_bound = 66760
rate = "0.24"

[[tax_year.bracket]]
lower_bound = 66760
upper_bound = 277825
rate = "0.42"

[[tax_year.bracket]]
lower_bound = 277825
rate = "0.45"
"#;

    fn csv_schedule() -> BTreeMap<i32, Vec<TaxBracket>> {
        BTreeMap::from([(2024, germany_2024().brackets)])
    }

    #[test]
    fn test_inline_brackets_match_builtin_table() {
        let text = format!("{SCALARS_2024}{INLINE_BRACKETS}");

        let tables = ConstantsLoader::parse(&text, &BTreeMap::new()).expect("Failed to parse");

        assert_eq!(tables, vec![germany_2024()]);
    }

    #[test]
    fn test_csv_brackets_fill_missing_schedule() {
        let tables =
            ConstantsLoader::parse(SCALARS_2024, &csv_schedule()).expect("Failed to parse");

        assert_eq!(tables[0].brackets.len(), 5);
        assert_eq!(tables[0].basic_allowance_married, dec!(23208));
    }

    #[test]
    fn test_missing_brackets() {
        let err = ConstantsLoader::parse(SCALARS_2024, &BTreeMap::new()).unwrap_err();

        assert!(matches!(err, ConstantsLoaderError::MissingBrackets(2024)));
    }

    #[test]
    fn test_conflicting_brackets() {
        let text = format!("{SCALARS_2024}{INLINE_BRACKETS}");

        let err = ConstantsLoader::parse(&text, &csv_schedule()).unwrap_err();

        assert!(matches!(err, ConstantsLoaderError::ConflictingBrackets(2024)));
    }

    #[test]
    fn test_orphan_csv_schedule() {
        let mut schedules = csv_schedule();
        schedules.insert(2025, germany_2024().brackets);

        let err = ConstantsLoader::parse(SCALARS_2024, &schedules).unwrap_err();

        assert!(matches!(err, ConstantsLoaderError::OrphanBrackets(2025)));
    }

    #[test]
    fn test_missing_ceiling_is_configuration_error() {
        let text = SCALARS_2024.replace("rate = \"0.093\"\nceiling = 90600", "rate = \"0.093\"");

        let err = ConstantsLoader::parse(&text, &csv_schedule()).unwrap_err();

        match err {
            ConstantsLoaderError::Configuration(ConfigurationError::MissingCeiling {
                year,
                kind,
            }) => {
                assert_eq!(year, 2024);
                assert_eq!(kind, ContributionKind::Pension);
            }
            other => panic!("expected MissingCeiling, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_table_is_rejected() {
        let text = SCALARS_2024.replace("basic_allowance = 11604", "basic_allowance = 12000");

        let err = ConstantsLoader::parse(&text, &csv_schedule()).unwrap_err();

        assert!(matches!(
            err,
            ConstantsLoaderError::Configuration(ConfigurationError::AllowanceNotInSchedule { .. })
        ));
    }

    #[test]
    fn test_duplicate_year() {
        let text = format!("{SCALARS_2024}{INLINE_BRACKETS}{SCALARS_2024}{INLINE_BRACKETS}");

        let err = ConstantsLoader::parse(&text, &BTreeMap::new()).unwrap_err();

        assert!(matches!(err, ConstantsLoaderError::DuplicateYear(2024)));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let text = SCALARS_2024.replace("year = 2024", "year = 2024\nsurprise = 1");

        let err = ConstantsLoader::parse(&text, &csv_schedule()).unwrap_err();

        assert!(matches!(err, ConstantsLoaderError::TomlParse(_)));
    }
}
