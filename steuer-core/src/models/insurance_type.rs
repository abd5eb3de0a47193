use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidInput;

/// Health insurance membership of the filer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsuranceType {
    /// Gesetzliche Krankenversicherung, contribution proportional to income.
    Statutory,
    /// Private Krankenversicherung, a premium independent of income.
    Private,
}

impl InsuranceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Statutory => "statutory",
            Self::Private => "private",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "statutory" | "gkv" => Some(Self::Statutory),
            "private" | "pkv" => Some(Self::Private),
            _ => None,
        }
    }
}

impl FromStr for InsuranceType {
    type Err = InvalidInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| InvalidInput::UnknownInsuranceType(s.to_string()))
    }
}

impl fmt::Display for InsuranceType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
