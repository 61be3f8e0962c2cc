//! Persistence implementations
//!
//! File-based implementations of the domain repository traits.

mod file_rule_repo;

pub use file_rule_repo::FileRuleRepository;
