//! Use cases

pub mod estimation_service;
pub mod rule_service;

pub use estimation_service::{estimate_by_features, validate_features, EstimationService};
pub use rule_service::{add_rule, validate_rate, AddOutcome, RuleRequest};
