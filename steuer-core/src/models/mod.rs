mod calculation_request;
mod calculation_result;
mod filing_status;
mod insurance_type;
mod tax_bracket;
mod tax_year_constants;

pub use calculation_request::{CalculationRequest, dependents_from_signed};
pub use calculation_result::CalculationResult;
pub use filing_status::FilingStatus;
pub use insurance_type::InsuranceType;
pub use tax_bracket::TaxBracket;
pub use tax_year_constants::{ContributionKind, ContributionRate, TaxYearConstants};
