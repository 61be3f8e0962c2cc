//! Domain services

pub mod catalog;
pub mod deduction;
pub mod estimator;
pub mod lookup;

pub use catalog::Catalog;
pub use deduction::{apply_deduction, evaluate, matching_rules, rule_applies, total_deduction};
pub use estimator::{estimate_from_comparables, estimate_from_prices};
pub use lookup::find_comparables;
