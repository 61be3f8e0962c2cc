//! CLI definition using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub use vinprice_types::OutputFormat;

#[derive(Parser)]
#[command(name = "vinprice")]
#[command(version)]
#[command(about = "Vehicle price estimation from comparable sales or a price model")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Historical sales CSV. Uses config value if not specified.
    #[arg(long, global = true)]
    pub dataset: Option<PathBuf>,

    /// Deduction rules JSON file. Uses config value if not specified.
    #[arg(long, global = true)]
    pub rules: Option<PathBuf>,

    /// Price model artifact. Uses config value if not specified.
    #[arg(long, global = true)]
    pub model_artifact: Option<PathBuf>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List similar vehicles sharing the first 8 VIN characters
    Search {
        /// VIN (e.g., 1HGBH41JXMN109186)
        vin: String,
    },

    /// Estimate a price from similar vehicles and apply deduction rules
    Estimate {
        /// VIN (e.g., 1HGBH41JXMN109186)
        vin: String,
    },

    /// Predict a price from vehicle details using the price model
    Predict {
        #[arg(long)]
        year: i32,

        #[arg(long)]
        odometer: f64,

        #[arg(long)]
        make: String,

        #[arg(long)]
        model: String,

        /// e.g., "Run & Drive"
        #[arg(long)]
        run_condition: String,

        /// e.g., "Clean"
        #[arg(long)]
        title_type: String,

        /// Damage type description (e.g., "Front End")
        #[arg(long)]
        damage: String,

        #[arg(long)]
        fuel: String,
    },

    /// Manage deduction rules
    Rules {
        #[command(subcommand)]
        action: RuleCommands,
    },

    /// Show makes, models, years and other values found in the dataset
    Catalog {
        /// Only list models for this make
        #[arg(long)]
        make: Option<String>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set dataset path
        #[arg(long)]
        set_dataset: Option<PathBuf>,

        /// Set deduction rules file
        #[arg(long)]
        set_rules: Option<PathBuf>,

        /// Set model artifact path
        #[arg(long)]
        set_model: Option<PathBuf>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RuleKind {
    General,
    Year,
    MakeModel,
}

#[derive(Subcommand)]
pub enum RuleCommands {
    /// List all rules
    List,

    /// Add a deduction rule
    Add {
        /// Rule type
        kind: RuleKind,

        /// Deduction in percent (0-100)
        #[arg(long)]
        rate: f64,

        /// Year for year rules
        #[arg(long)]
        year: Option<i32>,

        /// Make for make-model rules
        #[arg(long)]
        make: Option<String>,

        /// Model for make-model rules
        #[arg(long)]
        model: Option<String>,

        /// Add even if an active rule with the same condition exists
        #[arg(long)]
        force: bool,
    },

    /// Activate a rule
    Enable { id: u64 },

    /// Deactivate a rule
    Disable { id: u64 },

    /// Flip a rule between active and inactive
    Toggle { id: u64 },

    /// Delete a rule
    Delete { id: u64 },
}
