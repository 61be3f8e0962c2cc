//! Collaborator traits for persistence and inference

use vinprice_types::{DeductionRule, Result};

use crate::model::{FeatureVector, Prediction};

/// Backing storage for deduction rules
///
/// Implementations replace the whole collection on save; there is no
/// locking, so concurrent writers race and the last save wins.
pub trait RuleRepository {
    /// Load every stored rule
    fn load(&self) -> Result<Vec<DeductionRule>>;

    /// Persist the full rule collection
    fn save(&self, rules: &[DeductionRule]) -> Result<()>;
}

/// Pre-trained price model consulted for manual input
pub trait InferenceArtifact {
    /// Predict a sale price, or return `Error::InferenceFailure` with the
    /// model's own message
    fn predict(&self, features: &FeatureVector) -> Result<Prediction>;

    /// Model name/version for display
    fn name(&self) -> &str;
}

impl<T: RuleRepository + ?Sized> RuleRepository for Box<T> {
    fn load(&self) -> Result<Vec<DeductionRule>> {
        (**self).load()
    }

    fn save(&self, rules: &[DeductionRule]) -> Result<()> {
        (**self).save(rules)
    }
}

impl<T: InferenceArtifact + ?Sized> InferenceArtifact for Box<T> {
    fn predict(&self, features: &FeatureVector) -> Result<Prediction> {
        (**self).predict(features)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
