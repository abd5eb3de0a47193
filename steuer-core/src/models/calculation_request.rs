use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::InvalidInput;
use crate::models::{FilingStatus, InsuranceType};

/// Structured input to a tax calculation.
///
/// Built by the caller from a user profile; every field is explicit so the
/// whole request can serve as a cache key outside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub gross_annual_income: Decimal,
    pub filing_status: FilingStatus,
    pub dependents: u32,
    pub insurance_type: InsuranceType,
    pub has_children: bool,

    /// Actual work expenses. Zero means the flat allowance applies.
    #[serde(default)]
    pub itemized_deductions: Decimal,

    /// Church member opting in to Kirchensteuer.
    #[serde(default)]
    pub church_tax: bool,

    pub tax_year: i32,
}

impl CalculationRequest {
    /// A single, childless, statutorily insured filer with no itemized
    /// deductions.
    pub fn new(
        gross_annual_income: Decimal,
        tax_year: i32,
    ) -> Self {
        Self {
            gross_annual_income,
            filing_status: FilingStatus::Single,
            dependents: 0,
            insurance_type: InsuranceType::Statutory,
            has_children: false,
            itemized_deductions: Decimal::ZERO,
            church_tax: false,
            tax_year,
        }
    }

    pub fn with_filing_status(
        mut self,
        filing_status: FilingStatus,
    ) -> Self {
        self.filing_status = filing_status;
        self
    }

    /// Sets the number of dependents; any dependent implies `has_children`.
    pub fn with_dependents(
        mut self,
        dependents: u32,
    ) -> Self {
        self.dependents = dependents;
        self.has_children = self.has_children || dependents > 0;
        self
    }

    pub fn with_insurance_type(
        mut self,
        insurance_type: InsuranceType,
    ) -> Self {
        self.insurance_type = insurance_type;
        self
    }

    pub fn with_children(
        mut self,
        has_children: bool,
    ) -> Self {
        self.has_children = has_children;
        self
    }

    pub fn with_itemized_deductions(
        mut self,
        itemized_deductions: Decimal,
    ) -> Self {
        self.itemized_deductions = itemized_deductions;
        self
    }

    pub fn with_church_tax(
        mut self,
        church_tax: bool,
    ) -> Self {
        self.church_tax = church_tax;
        self
    }

    /// Rejects structurally invalid requests before any arithmetic.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        if self.gross_annual_income < Decimal::ZERO {
            return Err(InvalidInput::NegativeIncome(self.gross_annual_income));
        }
        if self.itemized_deductions < Decimal::ZERO {
            return Err(InvalidInput::NegativeDeductions(self.itemized_deductions));
        }
        Ok(())
    }
}

/// Converts a signed dependents count from an external source.
pub fn dependents_from_signed(value: i64) -> Result<u32, InvalidInput> {
    u32::try_from(value).map_err(|_| InvalidInput::NegativeDependents(value))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn new_request_has_defaults() {
        let request = CalculationRequest::new(dec!(50000), 2024);

        assert_eq!(request.filing_status, FilingStatus::Single);
        assert_eq!(request.insurance_type, InsuranceType::Statutory);
        assert_eq!(request.itemized_deductions, Decimal::ZERO);
        assert!(!request.has_children);
        assert!(!request.church_tax);
    }

    #[test]
    fn dependents_imply_children() {
        let request = CalculationRequest::new(dec!(50000), 2024).with_dependents(2);

        assert!(request.has_children);
    }

    #[test]
    fn validate_rejects_negative_income() {
        let request = CalculationRequest::new(dec!(-0.01), 2024);

        assert_eq!(request.validate(), Err(InvalidInput::NegativeIncome(dec!(-0.01))));
    }

    #[test]
    fn validate_rejects_negative_deductions() {
        let request =
            CalculationRequest::new(dec!(50000), 2024).with_itemized_deductions(dec!(-5));

        assert_eq!(request.validate(), Err(InvalidInput::NegativeDeductions(dec!(-5))));
    }

    #[test]
    fn validate_accepts_zero_income() {
        assert_eq!(CalculationRequest::new(Decimal::ZERO, 2024).validate(), Ok(()));
    }

    #[test]
    fn dependents_from_signed_rejects_negative() {
        assert_eq!(dependents_from_signed(3), Ok(3));
        assert_eq!(dependents_from_signed(-1), Err(InvalidInput::NegativeDependents(-1)));
    }

    #[test]
    fn deserializes_without_optional_fields() {
        let json = r#"{
            "gross_annual_income": "80000",
            "filing_status": "married_joint",
            "dependents": 1,
            "insurance_type": "private",
            "has_children": true,
            "tax_year": 2024
        }"#;

        let request: CalculationRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.filing_status, FilingStatus::MarriedJoint);
        assert_eq!(request.insurance_type, InsuranceType::Private);
        assert_eq!(request.itemized_deductions, Decimal::ZERO);
        assert!(!request.church_tax);
    }

    #[test]
    fn deserialize_rejects_unknown_filing_status() {
        let json = r#"{
            "gross_annual_income": "80000",
            "filing_status": "married",
            "dependents": 0,
            "insurance_type": "statutory",
            "has_children": false,
            "tax_year": 2024
        }"#;

        assert!(serde_json::from_str::<CalculationRequest>(json).is_err());
    }
}
