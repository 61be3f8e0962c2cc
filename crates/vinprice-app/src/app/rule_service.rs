//! Deduction rule management use cases

use tracing::warn;
use vinprice_domain::repository::RuleRepository;
use vinprice_domain::service::Catalog;
use vinprice_store::RuleStore;
use vinprice_types::{make_model_condition, DeductionRule, Error, Result, RuleType, GENERAL_CONDITION};

/// A rule as entered by the user
#[derive(Debug, Clone, PartialEq)]
pub enum RuleRequest {
    General { rate: f64 },
    Year { year: i32, rate: f64 },
    MakeModel { make: String, model: String, rate: f64 },
}

impl RuleRequest {
    pub fn rule_type(&self) -> RuleType {
        match self {
            RuleRequest::General { .. } => RuleType::General,
            RuleRequest::Year { .. } => RuleType::Year,
            RuleRequest::MakeModel { .. } => RuleType::MakeModel,
        }
    }

    pub fn condition(&self) -> String {
        match self {
            RuleRequest::General { .. } => GENERAL_CONDITION.to_string(),
            RuleRequest::Year { year, .. } => year.to_string(),
            RuleRequest::MakeModel { make, model, .. } => make_model_condition(make, model),
        }
    }

    pub fn rate(&self) -> f64 {
        match self {
            RuleRequest::General { rate }
            | RuleRequest::Year { rate, .. }
            | RuleRequest::MakeModel { rate, .. } => *rate,
        }
    }

    /// Warning text when the condition names a year or make/model that is
    /// not in the dataset. Such rules can still be added.
    pub fn unknown_in(&self, catalog: &Catalog) -> Option<String> {
        match self {
            RuleRequest::General { .. } => None,
            RuleRequest::Year { year, .. } => (!catalog.years.contains(year))
                .then(|| format!("Year {} does not appear in the dataset", year)),
            RuleRequest::MakeModel { make, model, .. } => (!catalog
                .models_for(make)
                .iter()
                .any(|m| m == model))
            .then(|| format!("{} {} does not appear in the dataset", make, model)),
        }
    }
}

/// Deduction rates are percentages between 0 and 100
pub fn validate_rate(rate: f64) -> Result<()> {
    if !rate.is_finite() || !(0.0..=100.0).contains(&rate) {
        return Err(Error::Validation(format!(
            "Deduction must be between 0 and 100 percent (got {})",
            rate
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Added(DeductionRule),
    /// An active rule with the same type and condition already exists;
    /// nothing was written
    Duplicate(DeductionRule),
}

/// Add a rule unless an active rule with the same condition exists.
///
/// `force` skips the duplicate check, so rates stack.
pub fn add_rule<R: RuleRepository>(
    store: &mut RuleStore<R>,
    request: &RuleRequest,
    force: bool,
) -> Result<AddOutcome> {
    validate_rate(request.rate())?;
    let rule_type = request.rule_type();
    let condition = request.condition();

    if !force {
        if let Some(existing) = store.find_duplicate(rule_type, &condition) {
            warn!(id = existing.id, %rule_type, %condition, "duplicate deduction rule");
            return Ok(AddOutcome::Duplicate(existing.clone()));
        }
    }

    let rule = store.add(rule_type, request.rate(), Some(condition))?;
    Ok(AddOutcome::Added(rule))
}
