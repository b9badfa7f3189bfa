//! Command-line parsing for the child-raising cost calculator.
//!
//! Parsing only; dispatch lives in `app`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_EQUIVALENCE_ADULT, DEFAULT_PRICE_MULTIPLIER};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "crianza",
    version,
    about = "Monthly cost of raising children (basic food basket + care-worker wages)"
)]
pub struct Cli {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides this.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Cost a household and compare it with the external childcare-cost series.
    Calc(CalcArgs),
    /// Print the reference data currently published (or read from local files).
    Sources(SourceArgs),
    /// Re-render an evaluation saved with `calc --export-json`.
    Show(ShowArgs),
    /// Launch the interactive form.
    Tui(SourceArgs),
}

/// Where reference data comes from and the model's policy constants.
#[derive(Debug, Args, Clone, Default)]
pub struct SourceArgs {
    /// Read the basic-food-basket series from a local .xls/.xlsx/.ods/.csv file.
    #[arg(long, value_name = "FILE")]
    pub cba_file: Option<PathBuf>,

    /// Read the childcare-cost series from a local .xls/.xlsx/.ods/.csv file.
    #[arg(long, value_name = "FILE")]
    pub canasta_file: Option<PathBuf>,

    /// Read the wage scale page from a local HTML file.
    #[arg(long, value_name = "FILE")]
    pub wage_file: Option<PathBuf>,

    /// Basic-food-basket value per adult equivalent (skips that feed).
    #[arg(long, value_name = "PESOS")]
    pub cba: Option<f64>,

    /// Hourly care wage (requires --monthly; skips the wage feed).
    #[arg(long, value_name = "PESOS", requires = "monthly")]
    pub hourly: Option<f64>,

    /// Monthly care wage (requires --hourly; skips the wage feed).
    #[arg(long, value_name = "PESOS", requires = "hourly")]
    pub monthly: Option<f64>,

    /// Basic-basket to full-consumption multiplier.
    #[arg(long, default_value_t = DEFAULT_PRICE_MULTIPLIER)]
    pub price_multiplier: f64,

    /// Adult-equivalence scale.
    #[arg(long, default_value_t = DEFAULT_EQUIVALENCE_ADULT)]
    pub equivalence: f64,
}

/// Options for costing a household.
#[derive(Debug, Args, Clone)]
pub struct CalcArgs {
    /// Child ages in years (0-17), comma separated or repeated: -a 0,5 or -a 0 -a 5.
    #[arg(short = 'a', long = "age", value_name = "YEARS", value_delimiter = ',')]
    pub ages: Vec<f64>,

    /// Skip the comparison with the external series.
    #[arg(long)]
    pub no_compare: bool,

    /// Also show the goods and care-time comparison tables.
    #[arg(long)]
    pub breakdown: bool,

    /// Export the per-child detail to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the whole evaluation to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Options for re-rendering a saved evaluation.
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Evaluation JSON produced by `crianza calc --export-json`.
    #[arg(value_name = "JSON")]
    pub file: PathBuf,

    /// Also show the goods and care-time comparison tables.
    #[arg(long)]
    pub breakdown: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ages_accept_commas_and_repeats() {
        let cli = Cli::try_parse_from(["crianza", "calc", "-a", "0,5", "--age", "12.5"]).unwrap();
        let Command::Calc(args) = cli.command else {
            panic!("expected calc");
        };
        assert_eq!(args.ages, vec![0.0, 5.0, 12.5]);
        assert!(!args.no_compare);
        assert_eq!(args.source.price_multiplier, DEFAULT_PRICE_MULTIPLIER);
    }

    #[test]
    fn wage_overrides_come_in_pairs() {
        assert!(Cli::try_parse_from(["crianza", "calc", "--hourly", "3000"]).is_err());
        let cli =
            Cli::try_parse_from(["crianza", "calc", "--hourly", "3000", "--monthly", "366000", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn show_takes_a_path() {
        let cli = Cli::try_parse_from(["crianza", "show", "eval.json", "--breakdown"]).unwrap();
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.file, PathBuf::from("eval.json"));
        assert!(args.breakdown);
    }
}
