//! In-memory rule repository

use std::cell::RefCell;

use vinprice_domain::repository::RuleRepository;
use vinprice_types::{DeductionRule, Result};

/// Keeps rules in memory; nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryRuleRepository {
    rules: RefCell<Vec<DeductionRule>>,
}

impl MemoryRuleRepository {
    pub fn with_rules(rules: Vec<DeductionRule>) -> Self {
        Self {
            rules: RefCell::new(rules),
        }
    }

    /// Copy of what was last saved
    pub fn snapshot(&self) -> Vec<DeductionRule> {
        self.rules.borrow().clone()
    }
}

impl RuleRepository for MemoryRuleRepository {
    fn load(&self) -> Result<Vec<DeductionRule>> {
        Ok(self.rules.borrow().clone())
    }

    fn save(&self, rules: &[DeductionRule]) -> Result<()> {
        *self.rules.borrow_mut() = rules.to_vec();
        Ok(())
    }
}
