//! Model inference input and output

use serde::{Deserialize, Serialize};

use super::vehicle::VehicleIdentity;

/// Manually entered vehicle attributes fed to the price model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub year: i32,
    pub odometer: f64,
    pub make: String,
    pub model: String,
    pub run_condition: String,
    pub title_type: String,
    pub damage_description: String,
    pub fuel_type: String,
}

impl FeatureVector {
    pub fn identity(&self) -> VehicleIdentity {
        VehicleIdentity::new(self.year, self.make.clone(), self.model.clone())
    }

    /// Categorical features keyed by the dataset column they come from
    pub fn categorical(&self) -> [(&'static str, &str); 6] {
        [
            ("Lot Make", self.make.as_str()),
            ("Lot Model", self.model.as_str()),
            ("Lot Run Condition", self.run_condition.as_str()),
            ("Sale Title Type", self.title_type.as_str()),
            ("Damage Type Description", self.damage_description.as_str()),
            ("Lot Fuel Type", self.fuel_type.as_str()),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    /// One step less confident, saturating at Low
    pub fn lower(self) -> Self {
        match self {
            ConfidenceLevel::High => ConfidenceLevel::Medium,
            _ => ConfidenceLevel::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "High",
            ConfidenceLevel::Medium => "Medium",
            ConfidenceLevel::Low => "Low",
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Successful output of the inference artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub predicted_price: f64,
    pub confidence_level: ConfidenceLevel,
    /// Expected spread of the prediction, in dollars (one standard deviation)
    pub variability: f64,
}
