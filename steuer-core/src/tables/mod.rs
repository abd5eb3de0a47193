//! Registry of validated tax-year tables.

mod germany;

use std::collections::BTreeMap;

use tracing::debug;

pub use germany::germany_2024;

use crate::error::{CalculationError, ConfigurationError};
use crate::models::TaxYearConstants;

/// Validated [`TaxYearConstants`], keyed by tax year.
///
/// Typical lifetime:
/// 1. Build with [`TaxYearTable::builtin`] or [`TaxYearTable::new`].
/// 2. Call `insert` once per year loaded from configuration.
/// 3. Share `&TaxYearTable` with every caller; it is never mutated again.
#[derive(Debug, Clone, Default)]
pub struct TaxYearTable {
    years: BTreeMap<i32, TaxYearConstants>,
}

impl TaxYearTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding the built-in years.
    pub fn builtin() -> Self {
        let mut years = BTreeMap::new();
        let constants = germany_2024();
        years.insert(constants.tax_year, constants);
        Self { years }
    }

    /// Validate and register a year.
    ///
    /// If the year is already present it is replaced and the previous table
    /// returned.
    ///
    /// # Errors
    /// Any [`ConfigurationError`] raised by [`TaxYearConstants::validate`];
    /// the table is left unchanged in that case.
    pub fn insert(
        &mut self,
        constants: TaxYearConstants,
    ) -> Result<Option<TaxYearConstants>, ConfigurationError> {
        constants.validate()?;
        debug!(
            tax_year = constants.tax_year,
            brackets = constants.brackets.len(),
            "registered tax-year constants"
        );
        Ok(self.years.insert(constants.tax_year, constants))
    }

    /// Constants for `year`.
    ///
    /// # Errors
    /// [`CalculationError::UnsupportedTaxYear`] when the year is unknown.
    pub fn get(
        &self,
        year: i32,
    ) -> Result<&TaxYearConstants, CalculationError> {
        self.years
            .get(&year)
            .ok_or_else(|| CalculationError::UnsupportedTaxYear {
                requested: year,
                available: self.years(),
            })
    }

    /// Registered years, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.years.keys().copied().collect()
    }

    /// Most recent registered year.
    pub fn latest(&self) -> Option<&TaxYearConstants> {
        self.years.values().next_back()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaxYearConstants> {
        self.years.values()
    }
}
