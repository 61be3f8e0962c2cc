//! Output formatting module

use vinprice_domain::model::{PriceSource, Valuation, VehicleRecord};
use vinprice_domain::service::estimator::{iqr_bounds, median};
use vinprice_domain::service::Catalog;
use vinprice_types::{DeductionRule, OutputFormat, Result};

/// Format a price as `$12,345.67`
pub fn format_money(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let cents = format!("{:.2}", value.abs());
    let (whole, frac) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}${}.{}", sign, grouped, frac)
}

pub fn output_comparables(output_format: OutputFormat, vin: &str, records: &[VehicleRecord]) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No similar vehicles found for VIN {}.", vin.trim());
        return Ok(());
    }

    println!("\nFound {} similar vehicles", records.len());
    println!("{}", "=".repeat(100));
    println!(
        "{:<18} {:>4} {:<12} {:<14} {:>12} {:>10} {:<14} {:<14}",
        "VIN", "Year", "Make", "Model", "Sale Price", "Odometer", "Title", "Damage"
    );
    println!("{}", "-".repeat(100));
    for r in records {
        println!(
            "{:<18} {:>4} {:<12} {:<14} {:>12} {:>10} {:<14} {:<14}",
            truncate(&r.vin, 18),
            r.year,
            truncate(&r.make, 12),
            truncate(&r.model, 14),
            format_money(r.sale_price),
            r.odometer.map(|o| format!("{:.0}", o)).unwrap_or_else(|| "-".to_string()),
            truncate(&r.title_type, 14),
            truncate(&r.damage_description, 14),
        );
    }
    println!("{}", "-".repeat(100));

    let prices: Vec<f64> = records.iter().map(|r| r.sale_price).collect();
    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    println!("Price range:     {} - {}", format_money(min), format_money(max));
    if let Some(mid) = median(&prices) {
        println!("Median:          {}", format_money(mid));
    }
    if let Some((lower, upper)) = iqr_bounds(&prices) {
        let outliers = prices.iter().filter(|p| **p < lower || **p > upper).count();
        if outliers > 0 {
            println!("Outliers:        {} (outside {} - {})", outliers, format_money(lower), format_money(upper));
        }
    }

    Ok(())
}

pub fn output_valuation(output_format: OutputFormat, valuation: &Valuation) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(valuation)?);
        return Ok(());
    }

    println!("\nPrice Prediction");
    println!("================");
    println!("Vehicle:         {}", valuation.vehicle);
    println!("Final price:     {}", format_money(valuation.final_price));
    if valuation.has_deductions() {
        println!("Deduction:       -{:.2}%", valuation.total_deduction);
    } else {
        println!("Deduction:       No deductions applied");
    }
    println!("Estimated price: {}", format_money(valuation.estimate.price));

    match &valuation.estimate.source {
        PriceSource::Comparables { vehicle_count } => {
            println!("Matches used:    {}", vehicle_count);
        }
        PriceSource::Model {
            confidence_level,
            variability,
        } => {
            println!("Confidence:      {}", confidence_level);
            println!("Variability:     ±{}", format_money(*variability));
        }
    }

    if !valuation.applied_rules.is_empty() {
        println!("\nApplied rules:");
        for rule in &valuation.applied_rules {
            println!(
                "  #{:<4} {:<11} {:<24} {:>6.2}%",
                rule.id, rule.rule_type, rule.rule_condition, rule.deduction_rate
            );
        }
    }

    Ok(())
}

pub fn output_rules(output_format: OutputFormat, rules: &[DeductionRule]) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(rules)?);
        return Ok(());
    }

    if rules.is_empty() {
        println!("There are no existing rules.");
        return Ok(());
    }

    println!("\nDeduction Rules");
    println!("{}", "=".repeat(60));
    println!("{:<5} {:<11} {:<24} {:>8} {:<8}", "ID", "Type", "Condition", "Rate", "Active");
    println!("{}", "-".repeat(60));
    for rule in rules {
        println!(
            "{:<5} {:<11} {:<24} {:>7.2}% {:<8}",
            rule.id,
            rule.rule_type,
            truncate(&rule.rule_condition, 24),
            rule.deduction_rate,
            if rule.is_active { "yes" } else { "no" }
        );
    }
    Ok(())
}

pub fn output_rule(output_format: OutputFormat, action: &str, rule: &DeductionRule) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(rule)?);
    } else {
        println!(
            "{} rule #{}: {} {} ({:.2}%, {})",
            action,
            rule.id,
            rule.rule_type,
            rule.rule_condition,
            rule.deduction_rate,
            if rule.is_active { "active" } else { "inactive" }
        );
    }
    Ok(())
}

pub fn output_catalog(output_format: OutputFormat, catalog: &Catalog, make: Option<&str>) -> Result<()> {
    if let Some(make) = make {
        let models = catalog.models_for(make);
        if output_format == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(models)?);
        } else {
            print_list(&format!("Models for {}", make), models);
        }
        return Ok(());
    }

    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(catalog)?);
        return Ok(());
    }

    let years: Vec<String> = catalog.years.iter().map(|y| y.to_string()).collect();
    print_list("Years", &years);
    print_list("Makes", &catalog.makes);
    print_list("Run conditions", &catalog.run_conditions);
    print_list("Title types", &catalog.title_types);
    print_list("Damage descriptions", &catalog.damage_descriptions);
    print_list("Fuel types", &catalog.fuel_types);
    Ok(())
}

fn print_list(title: &str, values: &[String]) {
    println!("\n{} ({})", title, values.len());
    println!("{}", "-".repeat(title.len() + 4));
    for value in values {
        println!("  {}", value);
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(999.5), "$999.50");
        assert_eq!(format_money(1234.5), "$1,234.50");
        assert_eq!(format_money(9660.0), "$9,660.00");
        assert_eq!(format_money(1234567.891), "$1,234,567.89");
        assert_eq!(format_money(-1000.0), "-$1,000.00");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Camry", 10), "Camry");
        assert_eq!(truncate("Run & Drive Verified", 8), "Run & D…");
    }
}
