//! Pre-built linear price model read from a JSON artifact
//!
//! The artifact is produced offline; this module only evaluates it.
//!
//! ```json
//! {
//!   "name": "price_model_v1",
//!   "intercept": -1450000.0,
//!   "year_coefficient": 730.0,
//!   "odometer_coefficient": -0.04,
//!   "categorical": { "Lot Make": { "Toyota": 1200.0 } },
//!   "residual_std": 1800.0,
//!   "confidence": { "high_max_ratio": 0.10, "medium_max_ratio": 0.25 }
//! }
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use vinprice_domain::model::{ConfidenceLevel, FeatureVector, Prediction};
use vinprice_domain::repository::InferenceArtifact;
use vinprice_types::{Error, Result};

/// Variability-to-price ratios that separate confidence levels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceThresholds {
    #[serde(default = "default_high_max_ratio")]
    pub high_max_ratio: f64,
    #[serde(default = "default_medium_max_ratio")]
    pub medium_max_ratio: f64,
}

fn default_high_max_ratio() -> f64 {
    0.10
}

fn default_medium_max_ratio() -> f64 {
    0.25
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high_max_ratio: default_high_max_ratio(),
            medium_max_ratio: default_medium_max_ratio(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModelArtifact {
    #[serde(default = "default_name")]
    pub name: String,
    pub intercept: f64,
    #[serde(default)]
    pub year_coefficient: f64,
    #[serde(default)]
    pub odometer_coefficient: f64,
    /// Additive weight per category value, keyed by dataset column name
    #[serde(default)]
    pub categorical: HashMap<String, HashMap<String, f64>>,
    pub residual_std: f64,
    #[serde(default)]
    pub confidence: ConfidenceThresholds,
}

fn default_name() -> String {
    "linear".to_string()
}

impl LinearModelArtifact {
    /// Load an artifact file; a missing file is `Error::MissingData`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::MissingData(format!(
                "Model artifact not found: {}",
                path.display()
            )));
        }
        let file = File::open(path)?;
        let artifact: Self = serde_json::from_reader(BufReader::new(file))?;
        debug!(path = %path.display(), name = %artifact.name, "loaded model artifact");
        Ok(artifact)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn confidence_for(&self, price: f64) -> ConfidenceLevel {
        let ratio = self.residual_std / price;
        if ratio <= self.confidence.high_max_ratio {
            ConfidenceLevel::High
        } else if ratio <= self.confidence.medium_max_ratio {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

impl InferenceArtifact for LinearModelArtifact {
    fn predict(&self, features: &FeatureVector) -> Result<Prediction> {
        let mut price = self.intercept
            + self.year_coefficient * features.year as f64
            + self.odometer_coefficient * features.odometer;

        let mut unknown = Vec::new();
        for (column, value) in features.categorical() {
            match self.categorical.get(column).and_then(|weights| weights.get(value)) {
                Some(weight) => price += weight,
                None => unknown.push(column),
            }
        }
        if !unknown.is_empty() {
            debug!(columns = ?unknown, "categories not seen in training");
        }

        if !price.is_finite() || price <= 0.0 {
            return Err(Error::InferenceFailure(format!(
                "Model produced an invalid price ({:.2}) for the given features",
                price
            )));
        }

        let mut confidence_level = self.confidence_for(price);
        if !unknown.is_empty() {
            confidence_level = confidence_level.lower();
        }

        Ok(Prediction {
            predicted_price: price,
            confidence_level,
            variability: self.residual_std,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
