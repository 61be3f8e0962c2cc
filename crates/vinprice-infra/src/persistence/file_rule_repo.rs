//! File-based deduction rule repository

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use vinprice_domain::repository::RuleRepository;
use vinprice_types::{DeductionRule, Result};

/// Stores rules as a pretty-printed JSON array
pub struct FileRuleRepository {
    store_path: PathBuf,
}

impl FileRuleRepository {
    pub fn new(store_path: PathBuf) -> Self {
        Self { store_path }
    }

    /// Repository at `<store_dir>/deduction_rules.json`
    pub fn in_dir(store_dir: &Path) -> Self {
        Self::new(store_dir.join("deduction_rules.json"))
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }
}

impl RuleRepository for FileRuleRepository {
    /// A missing file is an empty rule set; a corrupt one is an error
    fn load(&self) -> Result<Vec<DeductionRule>> {
        if !self.store_path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(&self.store_path)?;
        let reader = BufReader::new(file);
        let rules = serde_json::from_reader(reader)?;
        Ok(rules)
    }

    fn save(&self, rules: &[DeductionRule]) -> Result<()> {
        if let Some(parent) = self.store_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(&self.store_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, rules)?;
        Ok(())
    }
}
