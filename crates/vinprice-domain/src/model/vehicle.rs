//! Historical sale records

use serde::{Deserialize, Serialize};

/// One row of the historical sales dataset.
///
/// Descriptive text cells may be empty; the odometer is `None` when the
/// dataset left it blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub vin: String,
    pub year: i32,
    pub make: String,
    pub model: String,
    pub sale_price: f64,
    pub run_condition: String,
    pub title_type: String,
    pub damage_description: String,
    pub odometer: Option<f64>,
    pub fuel_type: String,
}

/// The attributes deduction rules are matched against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleIdentity {
    pub year: i32,
    pub make: String,
    pub model: String,
}

impl VehicleIdentity {
    pub fn new(year: i32, make: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            year,
            make: make.into(),
            model: model.into(),
        }
    }
}

impl From<&VehicleRecord> for VehicleIdentity {
    fn from(record: &VehicleRecord) -> Self {
        Self::new(record.year, record.make.clone(), record.model.clone())
    }
}

impl std::fmt::Display for VehicleIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.year, self.make, self.model)
    }
}
