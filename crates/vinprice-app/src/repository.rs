//! Repository adapters for persistence layer

use std::path::PathBuf;

use vinprice_infra::persistence::FileRuleRepository;
use vinprice_infra::LinearModelArtifact;
use vinprice_store::RuleStore;
use vinprice_types::Result;

use crate::app::EstimationService;
use crate::config::Config;

/// Open file-based deduction rule repository
pub fn open_rule_repo(config: &Config) -> Result<FileRuleRepository> {
    Ok(FileRuleRepository::new(config.rules_path()?))
}

/// Open the deduction rule store
pub fn open_rule_store(config: &Config) -> Result<RuleStore<FileRuleRepository>> {
    RuleStore::open(open_rule_repo(config)?)
}

/// Open the deduction rule store at a custom file
pub fn open_rule_store_at(rules_path: PathBuf) -> Result<RuleStore<FileRuleRepository>> {
    RuleStore::open(FileRuleRepository::new(rules_path))
}

/// Load the price model artifact
pub fn open_model_artifact(config: &Config) -> Result<LinearModelArtifact> {
    LinearModelArtifact::load(&config.model_path)
}

/// Estimation service over the configured dataset
pub fn open_estimation_service(config: &Config) -> EstimationService {
    EstimationService::new(config.dataset_path.clone())
}
