//! Estimation pipeline: comparables or model -> deduction rules -> final price

use std::path::PathBuf;

use tracing::{info, warn};
use vinprice_domain::model::{FeatureVector, PriceEstimate, Valuation, VehicleIdentity, VehicleRecord};
use vinprice_domain::repository::{InferenceArtifact, RuleRepository};
use vinprice_domain::service::{estimate_from_comparables, evaluate, find_comparables, Catalog};
use vinprice_infra::{load_dataset, Dataset};
use vinprice_store::RuleStore;
use vinprice_types::{Error, Result};

/// VIN-based estimation over the historical dataset.
///
/// The dataset is read on first use and kept for the life of the service.
pub struct EstimationService {
    dataset_path: PathBuf,
    dataset: Option<Dataset>,
}

impl EstimationService {
    pub fn new(dataset_path: PathBuf) -> Self {
        Self {
            dataset_path,
            dataset: None,
        }
    }

    /// Service over an already loaded dataset
    pub fn with_dataset(dataset: Dataset) -> Self {
        Self {
            dataset_path: PathBuf::new(),
            dataset: Some(dataset),
        }
    }

    pub fn dataset(&mut self) -> Result<&Dataset> {
        let dataset = match self.dataset.take() {
            Some(dataset) => dataset,
            None => {
                let dataset = load_dataset(&self.dataset_path)?;
                if dataset.skipped_rows > 0 {
                    warn!(
                        skipped = dataset.skipped_rows,
                        "dataset rows with missing required values were ignored"
                    );
                }
                dataset
            }
        };
        Ok(self.dataset.insert(dataset))
    }

    /// Comparable vehicles for a VIN; an empty result is not an error
    pub fn search(&mut self, vin: &str) -> Result<Vec<VehicleRecord>> {
        let vin = require_vin(vin)?;
        let comparables = find_comparables(vin, &self.dataset()?.records);
        if comparables.is_empty() {
            warn!(vin, "no similar vehicles found");
        } else {
            info!(vin, count = comparables.len(), "found similar vehicles");
        }
        Ok(comparables)
    }

    /// Estimate from comparables, then apply the active deduction rules.
    ///
    /// Rules are matched against the first comparable's year, make and model.
    pub fn estimate_by_vin<R: RuleRepository>(
        &mut self,
        vin: &str,
        rules: &mut RuleStore<R>,
    ) -> Result<Valuation> {
        let comparables = self.search(vin)?;
        let estimate = estimate_from_comparables(&comparables).ok_or_else(|| {
            Error::NoMatch(format!("No similar vehicles found for VIN {}", vin.trim()))
        })?;
        let vehicle = VehicleIdentity::from(&comparables[0]);
        apply_rules(estimate, vehicle, rules)
    }

    /// Distinct attribute values in the dataset
    pub fn catalog(&mut self) -> Result<Catalog> {
        Ok(Catalog::from_records(&self.dataset()?.records))
    }
}

/// Predict with the model, then apply the active deduction rules.
///
/// Features are validated before `open_artifact` is called, so invalid
/// input never loads the model. A model error is returned as is; there is
/// no fallback to comparables.
pub fn estimate_by_features<R, A, F>(
    open_artifact: F,
    features: &FeatureVector,
    rules: &mut RuleStore<R>,
) -> Result<Valuation>
where
    R: RuleRepository,
    A: InferenceArtifact,
    F: FnOnce() -> Result<A>,
{
    validate_features(features)?;
    let artifact = open_artifact()?;
    let prediction = artifact.predict(features)?;
    info!(
        model = artifact.name(),
        price = prediction.predicted_price,
        "model prediction"
    );
    apply_rules(PriceEstimate::from(prediction), features.identity(), rules)
}

/// Reject feature vectors the model cannot be asked about
pub fn validate_features(features: &FeatureVector) -> Result<()> {
    if features.year < 1900 {
        return Err(Error::Validation(format!(
            "Lot Year must be 1900 or later (got {})",
            features.year
        )));
    }
    if !features.odometer.is_finite() || features.odometer < 0.0 {
        return Err(Error::Validation(
            "Odometer Reading must be zero or more".to_string(),
        ));
    }
    for (column, value) in features.categorical() {
        if value.trim().is_empty() {
            return Err(Error::Validation(format!("Please fill in {}", column)));
        }
    }
    Ok(())
}

fn apply_rules<R: RuleRepository>(
    estimate: PriceEstimate,
    vehicle: VehicleIdentity,
    rules: &mut RuleStore<R>,
) -> Result<Valuation> {
    rules.reload()?;
    let active = rules.active();
    let valuation = evaluate(estimate, &active, vehicle);
    info!(
        estimate = valuation.estimate.price,
        deduction = valuation.total_deduction,
        final_price = valuation.final_price,
        "valuation complete"
    );
    Ok(valuation)
}

fn require_vin(vin: &str) -> Result<&str> {
    let vin = vin.trim();
    if vin.is_empty() {
        return Err(Error::Validation("Please enter a VIN number".to_string()));
    }
    Ok(vin)
}
