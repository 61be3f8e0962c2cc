//! Price estimates and the final valuation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vinprice_types::DeductionRule;

use super::features::{ConfidenceLevel, Prediction};
use super::vehicle::VehicleIdentity;

/// Where a point estimate came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum PriceSource {
    Comparables {
        vehicle_count: usize,
    },
    Model {
        confidence_level: ConfidenceLevel,
        variability: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEstimate {
    pub price: f64,
    #[serde(flatten)]
    pub source: PriceSource,
}

impl PriceEstimate {
    pub fn from_comparables(price: f64, vehicle_count: usize) -> Self {
        Self {
            price,
            source: PriceSource::Comparables { vehicle_count },
        }
    }
}

impl From<Prediction> for PriceEstimate {
    fn from(prediction: Prediction) -> Self {
        Self {
            price: prediction.predicted_price,
            source: PriceSource::Model {
                confidence_level: prediction.confidence_level,
                variability: prediction.variability,
            },
        }
    }
}

/// Estimate after deduction rules have been applied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Valuation {
    pub vehicle: VehicleIdentity,
    pub estimate: PriceEstimate,
    pub applied_rules: Vec<DeductionRule>,
    /// Sum of applied rates in percent, not capped
    pub total_deduction: f64,
    pub final_price: f64,
    pub generated_at: DateTime<Utc>,
}

impl Valuation {
    pub fn has_deductions(&self) -> bool {
        self.total_deduction > 0.0
    }
}
