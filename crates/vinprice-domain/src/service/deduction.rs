//! Deduction rule matching and application

use chrono::Utc;
use vinprice_types::{make_model_condition, DeductionRule, RuleType};

use crate::model::{PriceEstimate, Valuation, VehicleIdentity};

/// Whether a rule's condition matches the vehicle, ignoring its active flag.
///
/// Year conditions compare against the year as an integer string and
/// make/model conditions compare exactly, case included.
pub fn rule_applies(rule: &DeductionRule, vehicle: &VehicleIdentity) -> bool {
    match rule.rule_type {
        RuleType::General => true,
        RuleType::Year => rule.rule_condition == vehicle.year.to_string(),
        RuleType::MakeModel => {
            rule.rule_condition == make_model_condition(&vehicle.make, &vehicle.model)
        }
    }
}

/// Active rules that apply to the vehicle, in the order given
pub fn matching_rules<'a>(
    rules: &'a [DeductionRule],
    vehicle: &VehicleIdentity,
) -> Vec<&'a DeductionRule> {
    rules
        .iter()
        .filter(|rule| rule.is_active && rule_applies(rule, vehicle))
        .collect()
}

/// Sum of the rates of every matching rule. Not capped at 100.
pub fn total_deduction(rules: &[DeductionRule], vehicle: &VehicleIdentity) -> f64 {
    matching_rules(rules, vehicle)
        .iter()
        .map(|rule| rule.deduction_rate)
        .sum()
}

/// `price * (1 - total / 100)`; totals of 100 or more give a non-positive price
pub fn apply_deduction(price: f64, total_deduction: f64) -> f64 {
    price * (1.0 - total_deduction / 100.0)
}

/// Apply every matching rule to an estimate
pub fn evaluate(
    estimate: PriceEstimate,
    rules: &[DeductionRule],
    vehicle: VehicleIdentity,
) -> Valuation {
    let applied: Vec<DeductionRule> = matching_rules(rules, &vehicle).into_iter().cloned().collect();
    let total: f64 = applied.iter().map(|rule| rule.deduction_rate).sum();
    let final_price = apply_deduction(estimate.price, total);

    Valuation {
        vehicle,
        estimate,
        applied_rules: applied,
        total_deduction: total,
        final_price,
        generated_at: Utc::now(),
    }
}
