//! Command handlers

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::cli::{Cli, Commands, OutputFormat, RuleCommands, RuleKind};
use crate::output::{output_catalog, output_comparables, output_rule, output_rules, output_valuation};
use vinprice_app::app::{self, AddOutcome, RuleRequest};
use vinprice_app::config::Config;
use vinprice_app::repository::{open_estimation_service, open_model_artifact, open_rule_store};
use vinprice_domain::model::FeatureVector;
use vinprice_types::{Error, Result};

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref dataset) = cli.dataset {
        config.dataset_path = dataset.clone();
    }
    if cli.rules.is_some() {
        config.rules_path = cli.rules.clone();
    }
    if let Some(ref model) = cli.model_artifact {
        config.model_path = model.clone();
    }
    let output_format = cli.format.unwrap_or(config.output_format);

    match cli.command {
        Commands::Search { vin } => cmd_search(&config, &vin, output_format),

        Commands::Estimate { vin } => cmd_estimate(&config, &vin, output_format),

        Commands::Predict {
            year,
            odometer,
            make,
            model,
            run_condition,
            title_type,
            damage,
            fuel,
        } => {
            let features = FeatureVector {
                year,
                odometer,
                make,
                model,
                run_condition,
                title_type,
                damage_description: damage,
                fuel_type: fuel,
            };
            cmd_predict(&config, &features, output_format)
        }

        Commands::Rules { action } => cmd_rules(&config, action, output_format),

        Commands::Catalog { make } => cmd_catalog(&config, make.as_deref(), output_format),

        Commands::Config {
            show,
            set_dataset,
            set_rules,
            set_model,
            set_output,
            reset,
        } => cmd_config(show, set_dataset, set_rules, set_model, set_output, reset),
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn cmd_search(config: &Config, vin: &str, output_format: OutputFormat) -> Result<()> {
    let mut service = open_estimation_service(config);

    let pb = spinner("Searching for similar vehicles...");
    let result = service.search(vin);
    pb.finish_and_clear();

    let comparables = result?;
    output_comparables(output_format, vin, &comparables)
}

fn cmd_estimate(config: &Config, vin: &str, output_format: OutputFormat) -> Result<()> {
    let mut service = open_estimation_service(config);
    let mut rules = open_rule_store(config)?;

    let pb = spinner("Calculating price prediction...");
    let result = service.estimate_by_vin(vin, &mut rules);
    pb.finish_and_clear();

    match result {
        Ok(valuation) => output_valuation(output_format, &valuation),
        Err(e) if e.is_no_match() => {
            eprintln!("Warning: No similar vehicles found for this VIN.");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn cmd_predict(config: &Config, features: &FeatureVector, output_format: OutputFormat) -> Result<()> {
    let mut rules = open_rule_store(config)?;

    let pb = spinner("Making prediction...");
    let result = app::estimate_by_features(|| open_model_artifact(config), features, &mut rules);
    pb.finish_and_clear();

    output_valuation(output_format, &result?)
}

fn cmd_rules(config: &Config, action: RuleCommands, output_format: OutputFormat) -> Result<()> {
    let mut store = open_rule_store(config)?;

    match action {
        RuleCommands::List => output_rules(output_format, store.list()),

        RuleCommands::Add {
            kind,
            rate,
            year,
            make,
            model,
            force,
        } => {
            let request = build_rule_request(kind, rate, year, make, model)?;
            warn_if_unknown(config, &request);

            match app::add_rule(&mut store, &request, force)? {
                AddOutcome::Added(rule) => output_rule(output_format, "Added", &rule),
                AddOutcome::Duplicate(existing) => {
                    eprintln!(
                        "Warning: An active {} rule for '{}' already exists (#{}, {:.2}%). \
                         Use --force to add it anyway; rates of matching rules are summed.",
                        existing.rule_type, existing.rule_condition, existing.id, existing.deduction_rate
                    );
                    Ok(())
                }
            }
        }

        RuleCommands::Enable { id } => {
            let rule = store.set_active(id, true)?;
            output_rule(output_format, "Enabled", &rule)
        }

        RuleCommands::Disable { id } => {
            let rule = store.set_active(id, false)?;
            output_rule(output_format, "Disabled", &rule)
        }

        RuleCommands::Toggle { id } => {
            let rule = store.toggle(id)?;
            output_rule(output_format, "Toggled", &rule)
        }

        RuleCommands::Delete { id } => {
            let rule = store.delete(id)?;
            output_rule(output_format, "Deleted", &rule)
        }
    }
}

fn build_rule_request(
    kind: RuleKind,
    rate: f64,
    year: Option<i32>,
    make: Option<String>,
    model: Option<String>,
) -> Result<RuleRequest> {
    match kind {
        RuleKind::General => Ok(RuleRequest::General { rate }),
        RuleKind::Year => {
            let year = year.ok_or_else(|| {
                Error::Validation("--year is required for year rules".to_string())
            })?;
            Ok(RuleRequest::Year { year, rate })
        }
        RuleKind::MakeModel => match (make, model) {
            (Some(make), Some(model)) if !make.trim().is_empty() && !model.trim().is_empty() => {
                Ok(RuleRequest::MakeModel {
                    make: make.trim().to_string(),
                    model: model.trim().to_string(),
                    rate,
                })
            }
            _ => Err(Error::Validation(
                "--make and --model are required for make-model rules".to_string(),
            )),
        },
    }
}

/// Rule conditions are normally picked from dataset values; warn when they
/// are not, but do not block the add
fn warn_if_unknown(config: &Config, request: &RuleRequest) {
    if matches!(request, RuleRequest::General { .. }) {
        return;
    }
    let mut service = open_estimation_service(config);
    match service.catalog() {
        Ok(catalog) => {
            if let Some(message) = request.unknown_in(&catalog) {
                eprintln!("Warning: {}", message);
            }
        }
        Err(e) => debug!(error = %e, "dataset unavailable, skipping condition check"),
    }
}

fn cmd_catalog(config: &Config, make: Option<&str>, output_format: OutputFormat) -> Result<()> {
    let mut service = open_estimation_service(config);
    let catalog = service.catalog()?;
    if catalog.is_empty() {
        return Err(Error::MissingData(format!(
            "Unable to load data for dropdowns from {}",
            config.dataset_path.display()
        )));
    }
    output_catalog(output_format, &catalog, make)
}

fn cmd_config(
    show: bool,
    set_dataset: Option<std::path::PathBuf>,
    set_rules: Option<std::path::PathBuf>,
    set_model: Option<std::path::PathBuf>,
    set_output: Option<OutputFormat>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults.");
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(path) = set_dataset {
        config.dataset_path = path;
        modified = true;
    }

    if let Some(path) = set_rules {
        config.rules_path = Some(path);
        modified = true;
    }

    if let Some(path) = set_model {
        config.model_path = path;
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration saved.");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_rule_needs_year() {
        assert!(build_rule_request(RuleKind::Year, 2.0, None, None, None).is_err());
        assert_eq!(
            build_rule_request(RuleKind::Year, 2.0, Some(2018), None, None).unwrap(),
            RuleRequest::Year { year: 2018, rate: 2.0 }
        );
    }

    #[test]
    fn test_make_model_rule_needs_both() {
        assert!(build_rule_request(RuleKind::MakeModel, 3.0, None, Some("Toyota".into()), None).is_err());
        assert!(build_rule_request(RuleKind::MakeModel, 3.0, None, Some(" ".into()), Some("Camry".into())).is_err());
        let request = build_rule_request(
            RuleKind::MakeModel,
            3.0,
            None,
            Some(" Toyota ".into()),
            Some("Camry".into()),
        )
        .unwrap();
        assert_eq!(request.condition(), "Toyota|Camry");
    }

    #[test]
    fn test_general_rule_ignores_extra_args() {
        let request = build_rule_request(RuleKind::General, 5.0, Some(2018), None, None).unwrap();
        assert_eq!(request, RuleRequest::General { rate: 5.0 });
    }
}
