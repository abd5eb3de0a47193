use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    Single,
    MarriedJoint,
    MarriedSeparate,
    HeadOfHousehold,
    QualifyingWidow,
}

impl FilingStatus {
    pub const ALL: [FilingStatus; 5] = [
        Self::Single,
        Self::MarriedJoint,
        Self::MarriedSeparate,
        Self::HeadOfHousehold,
        Self::QualifyingWidow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::MarriedJoint => "married_joint",
            Self::MarriedSeparate => "married_separate",
            Self::HeadOfHousehold => "head_of_household",
            Self::QualifyingWidow => "qualifying_widow",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::MarriedJoint => "Married filing jointly",
            Self::MarriedSeparate => "Married filing separately",
            Self::HeadOfHousehold => "Head of household",
            Self::QualifyingWidow => "Qualifying widow(er)",
        }
    }

    /// Whether tax is assessed with the splitting method.
    ///
    /// Surviving spouses keep the joint schedule, the same way married couples
    /// filing jointly do.
    pub fn is_joint(&self) -> bool {
        matches!(self, Self::MarriedJoint | Self::QualifyingWidow)
    }

    /// Parses a filing status, tolerating case and space/hyphen separators.
    ///
    /// Unknown values are rejected rather than mapped to a default.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "single" => Some(Self::Single),
            "married_joint" | "married_jointly" => Some(Self::MarriedJoint),
            "married_separate" | "married_separately" => Some(Self::MarriedSeparate),
            "head_of_household" => Some(Self::HeadOfHousehold),
            "qualifying_widow" | "qualifying_widower" => Some(Self::QualifyingWidow),
            _ => None,
        }
    }
}

impl FromStr for FilingStatus {
    type Err = InvalidInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| InvalidInput::UnknownFilingStatus(s.to_string()))
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
