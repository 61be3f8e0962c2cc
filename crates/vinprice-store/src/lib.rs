//! Deduction rule store
//!
//! `RuleStore` is an explicitly opened handle over a `RuleRepository`.
//! Rules are held in memory in id order; every mutation writes the whole
//! collection back through the repository.

mod memory;

pub use memory::MemoryRuleRepository;

use tracing::{debug, info};
use vinprice_domain::repository::RuleRepository;
use vinprice_types::{DeductionRule, Error, Result, RuleType, GENERAL_CONDITION};

pub struct RuleStore<R: RuleRepository> {
    repo: R,
    rules: Vec<DeductionRule>,
}

impl<R: RuleRepository> RuleStore<R> {
    /// Load rules from the repository
    pub fn open(repo: R) -> Result<Self> {
        let mut store = Self {
            repo,
            rules: Vec::new(),
        };
        store.reload()?;
        Ok(store)
    }

    /// Discard the in-memory copy and load again from the repository
    pub fn reload(&mut self) -> Result<()> {
        let mut rules = self.repo.load()?;
        rules.sort_by_key(|rule| rule.id);
        debug!(count = rules.len(), "loaded deduction rules");
        self.rules = rules;
        Ok(())
    }

    /// Save `rules` and adopt them only once the repository accepts them
    fn commit(&mut self, rules: Vec<DeductionRule>) -> Result<()> {
        self.repo.save(&rules)?;
        self.rules = rules;
        Ok(())
    }

    /// Next id: highest existing id plus one, starting at 1
    pub fn next_id(&self) -> u64 {
        self.rules.iter().map(|rule| rule.id).max().unwrap_or(0) + 1
    }

    /// Add an active rule with a freshly allocated id.
    ///
    /// Does not reject duplicates; see `find_duplicate`.
    pub fn add(
        &mut self,
        rule_type: RuleType,
        deduction_rate: f64,
        condition: Option<String>,
    ) -> Result<DeductionRule> {
        let rule_condition = match rule_type {
            RuleType::General => GENERAL_CONDITION.to_string(),
            _ => condition.ok_or_else(|| {
                Error::Validation(format!("{} rule needs a condition", rule_type))
            })?,
        };

        let rule = DeductionRule {
            id: self.next_id(),
            rule_type,
            rule_condition,
            deduction_rate,
            is_active: true,
        };
        let mut rules = self.rules.clone();
        rules.push(rule.clone());
        self.commit(rules)?;
        info!(id = rule.id, rule_type = %rule.rule_type, condition = %rule.rule_condition, rate = rule.deduction_rate, "added deduction rule");
        Ok(rule)
    }

    /// All rules in id order
    pub fn list(&self) -> &[DeductionRule] {
        &self.rules
    }

    /// Active rules in id order
    pub fn active(&self) -> Vec<DeductionRule> {
        self.rules.iter().filter(|rule| rule.is_active).cloned().collect()
    }

    pub fn get(&self, id: u64) -> Option<&DeductionRule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    pub fn count(&self) -> usize {
        self.rules.len()
    }

    pub fn set_active(&mut self, id: u64, is_active: bool) -> Result<DeductionRule> {
        let mut rules = self.rules.clone();
        let rule = rules
            .iter_mut()
            .find(|rule| rule.id == id)
            .ok_or(Error::RuleNotFound(id))?;
        rule.is_active = is_active;
        let updated = rule.clone();
        self.commit(rules)?;
        info!(id, is_active, "updated deduction rule status");
        Ok(updated)
    }

    /// Flip a rule's active flag
    pub fn toggle(&mut self, id: u64) -> Result<DeductionRule> {
        let current = self.get(id).ok_or(Error::RuleNotFound(id))?.is_active;
        self.set_active(id, !current)
    }

    pub fn delete(&mut self, id: u64) -> Result<DeductionRule> {
        let idx = self
            .rules
            .iter()
            .position(|rule| rule.id == id)
            .ok_or(Error::RuleNotFound(id))?;
        let mut rules = self.rules.clone();
        let removed = rules.remove(idx);
        self.commit(rules)?;
        info!(id, "deleted deduction rule");
        Ok(removed)
    }

    /// Existing active rule with the same type and condition.
    ///
    /// Advisory only: callers decide whether to add anyway.
    pub fn find_duplicate(&self, rule_type: RuleType, condition: &str) -> Option<&DeductionRule> {
        let condition = match rule_type {
            RuleType::General => GENERAL_CONDITION,
            _ => condition,
        };
        self.rules.iter().find(|rule| {
            rule.is_active && rule.rule_type == rule_type && rule.rule_condition == condition
        })
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RuleStore<MemoryRuleRepository> {
        RuleStore::open(MemoryRuleRepository::default()).unwrap()
    }

    #[test]
    fn test_first_id_is_one() {
        let mut store = store();
        let rule = store.add(RuleType::General, 5.0, None).unwrap();
        assert_eq!(rule.id, 1);
        assert!(rule.is_active);
        assert_eq!(rule.rule_condition, "General");
    }

    #[test]
    fn test_ids_follow_max_plus_one() {
        let mut store = store();
        store.add(RuleType::General, 5.0, None).unwrap();
        store.add(RuleType::Year, 2.0, Some("2018".to_string())).unwrap();
        store.add(RuleType::Year, 3.0, Some("2019".to_string())).unwrap();

        // deleting a middle rule keeps max at 3
        store.delete(2).unwrap();
        assert_eq!(store.add(RuleType::Year, 1.0, Some("2020".to_string())).unwrap().id, 4);

        // deleting the max lets its id come back
        store.delete(4).unwrap();
        assert_eq!(store.next_id(), 4);
    }

    #[test]
    fn test_ids_continue_from_loaded_rules() {
        let repo = MemoryRuleRepository::with_rules(vec![DeductionRule {
            id: 41,
            rule_type: RuleType::General,
            rule_condition: "General".to_string(),
            deduction_rate: 5.0,
            is_active: true,
        }]);
        let mut store = RuleStore::open(repo).unwrap();
        assert_eq!(store.add(RuleType::Year, 2.0, Some("2018".to_string())).unwrap().id, 42);
    }

    #[test]
    fn test_non_general_rule_requires_condition() {
        let mut store = store();
        let err = store.add(RuleType::Year, 2.0, None).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_double_toggle_is_identity() {
        let mut store = store();
        store.add(RuleType::General, 5.0, None).unwrap();
        store.add(RuleType::MakeModel, 3.0, Some("Toyota|Camry".to_string())).unwrap();
        let before = store.list().to_vec();

        assert!(!store.toggle(2).unwrap().is_active);
        assert!(store.toggle(2).unwrap().is_active);
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn test_set_active_filters_active_list() {
        let mut store = store();
        store.add(RuleType::General, 5.0, None).unwrap();
        store.add(RuleType::Year, 2.0, Some("2018".to_string())).unwrap();
        store.set_active(1, false).unwrap();

        let active: Vec<u64> = store.active().iter().map(|r| r.id).collect();
        assert_eq!(active, vec![2]);
    }

    #[test]
    fn test_unknown_id_is_reported() {
        let mut store = store();
        assert!(matches!(store.set_active(9, true), Err(Error::RuleNotFound(9))));
        assert!(matches!(store.toggle(9), Err(Error::RuleNotFound(9))));
        assert!(matches!(store.delete(9), Err(Error::RuleNotFound(9))));
    }

    #[test]
    fn test_mutations_are_saved_and_reloadable() {
        let mut store = store();
        store.add(RuleType::General, 5.0, None).unwrap();
        store.add(RuleType::Year, 2.0, Some("2018".to_string())).unwrap();
        store.set_active(2, false).unwrap();

        let saved = store.repository().snapshot();
        assert_eq!(saved.len(), 2);
        assert!(!saved[1].is_active);

        store.reload().unwrap();
        assert_eq!(store.list(), saved.as_slice());
    }

    #[test]
    fn test_duplicate_check_is_advisory() {
        let mut store = store();
        store.add(RuleType::General, 5.0, None).unwrap();
        assert!(store.find_duplicate(RuleType::General, "anything").is_some());
        assert!(store.find_duplicate(RuleType::Year, "2018").is_none());

        // the store itself still accepts the second General rule
        store.add(RuleType::General, 5.0, None).unwrap();
        assert_eq!(store.count(), 2);

        store.set_active(1, false).unwrap();
        store.set_active(2, false).unwrap();
        assert!(store.find_duplicate(RuleType::General, "General").is_none());
    }

    #[test]
    fn test_loaded_rules_are_sorted_by_id() {
        let rule = |id: u64| DeductionRule {
            id,
            rule_type: RuleType::Year,
            rule_condition: "2018".to_string(),
            deduction_rate: 1.0,
            is_active: true,
        };
        let store = RuleStore::open(MemoryRuleRepository::with_rules(vec![rule(3), rule(1), rule(2)])).unwrap();
        let ids: Vec<u64> = store.list().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    struct ReadOnlyRepository(Vec<DeductionRule>);

    impl RuleRepository for ReadOnlyRepository {
        fn load(&self) -> Result<Vec<DeductionRule>> {
            Ok(self.0.clone())
        }

        fn save(&self, _rules: &[DeductionRule]) -> Result<()> {
            Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only rules file",
            )))
        }
    }

    #[test]
    fn test_failed_save_leaves_rules_unchanged() {
        let existing = DeductionRule {
            id: 1,
            rule_type: RuleType::General,
            rule_condition: "General".to_string(),
            deduction_rate: 5.0,
            is_active: true,
        };
        let mut store = RuleStore::open(ReadOnlyRepository(vec![existing.clone()])).unwrap();

        assert!(store.add(RuleType::Year, 2.0, Some("2018".to_string())).is_err());
        assert_eq!(store.count(), 1);
        assert_eq!(store.next_id(), 2);

        assert!(store.set_active(1, false).is_err());
        assert!(store.toggle(1).is_err());
        assert!(store.get(1).unwrap().is_active);

        assert!(store.delete(1).is_err());
        assert_eq!(store.list(), &[existing]);
    }
}
