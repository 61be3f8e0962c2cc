//! Deduction rule types shared by the store, domain and CLI

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Condition string stored on General rules
pub const GENERAL_CONDITION: &str = "General";

/// Kind of vehicle attribute a deduction rule keys on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleType {
    General,
    Year,
    /// Condition is `"{make}|{model}"`. Older stores spell it "Making Model".
    #[serde(rename = "Make Model", alias = "Making Model")]
    MakeModel,
}

impl RuleType {
    pub fn label(&self) -> &'static str {
        match self {
            RuleType::General => "General",
            RuleType::Year => "Year",
            RuleType::MakeModel => "Make Model",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for RuleType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "general" => Ok(RuleType::General),
            "year" => Ok(RuleType::Year),
            "make model" | "making model" | "makemodel" => Ok(RuleType::MakeModel),
            other => Err(Error::Validation(format!("Unknown rule type: {}", other))),
        }
    }
}

/// A percentage deduction applied when its condition matches the vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeductionRule {
    pub id: u64,
    pub rule_type: RuleType,
    /// "General", a four-digit year, or "Make|Model"
    pub rule_condition: String,
    /// Percentage, 0-100
    pub deduction_rate: f64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Build the condition string for a make/model rule
pub fn make_model_condition(make: &str, model: &str) -> String {
    format!("{}|{}", make, model)
}
