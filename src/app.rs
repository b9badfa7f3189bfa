//! Top-level application orchestration.
//!
//! `src/main.rs` only maps errors to exit codes; this module parses arguments,
//! sets up logging and reference sources, and dispatches to the commands.

use clap::Parser;
use tracing::warn;

use crate::cli::{CalcArgs, Command, ShowArgs, SourceArgs};
use crate::data::{FileSource, HttpSource, LayeredSource, ReferenceStore, SourceConfig, SourceId};
use crate::domain::{CostParams, WagePair};
use crate::error::AppError;
use crate::logging::LogTarget;
use crate::report::NO_CHILDREN_WARNING;

pub mod pipeline;

use pipeline::EvaluationRequest;

/// Entry point for the `crianza` binary.
pub fn run() -> Result<(), AppError> {
    // `crianza` opens the form and `crianza -a 3,7` means `crianza calc -a 3,7`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let target = match cli.command {
        Command::Tui(_) => LogTarget::Silent,
        _ => LogTarget::Stderr,
    };
    crate::logging::init(cli.verbose, target);

    match cli.command {
        Command::Calc(args) => handle_calc(args),
        Command::Sources(args) => handle_sources(args),
        Command::Show(args) => handle_show(args),
        Command::Tui(args) => crate::tui::run(args),
    }
}

fn handle_calc(args: CalcArgs) -> Result<(), AppError> {
    let mut store = build_store(&args.source)?;
    let request = EvaluationRequest {
        compare: !args.no_compare,
        ..request_from(&args.source, args.ages.clone())?
    };

    let eval = pipeline::evaluate(&mut store, &request)?;
    if eval.household.is_empty() {
        warn!("{NO_CHILDREN_WARNING}");
    }

    println!("{}", crate::report::format_evaluation(&eval, args.breakdown));

    if let Some(path) = &args.export {
        crate::io::write_household_csv(path, &eval.household)?;
    }
    if let Some(path) = &args.export_json {
        crate::io::write_evaluation_json(path, &eval)?;
    }

    Ok(())
}

fn handle_sources(args: SourceArgs) -> Result<(), AppError> {
    let mut store = build_store(&args)?;

    let (price_level, price_period) = match args.cba {
        Some(value) => (value, None),
        None => {
            let level = store.price_level()?;
            (level.value, Some(level.period))
        }
    };
    let wages = match wage_override(&args)? {
        Some(wages) => wages,
        None => store.wage()?,
    };
    let canasta = store.canasta()?;

    println!(
        "{}",
        crate::report::format_reference_data(price_level, price_period, &wages, Some(canasta.period))
    );
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let eval = crate::io::read_evaluation_json(&args.file)?;
    println!("{}", crate::report::format_evaluation(&eval, args.breakdown));
    Ok(())
}

/// Reference store over local files where given and the configured URLs otherwise.
pub fn build_store(args: &SourceArgs) -> Result<ReferenceStore<LayeredSource>, AppError> {
    let config = SourceConfig::from_env()?;

    let mut files = FileSource::new();
    for (id, path) in [
        (SourceId::PriceLevel, &args.cba_file),
        (SourceId::Canasta, &args.canasta_file),
        (SourceId::Wage, &args.wage_file),
    ] {
        if let Some(path) = path {
            files = files.with_path(id, path);
        }
    }

    let http = HttpSource::new(&config)?;
    Ok(ReferenceStore::new(LayeredSource::new(files, http)).with_ttl(config.cache_ttl))
}

/// Evaluation request for `ages` with the overrides and constants in `args`.
pub fn request_from(args: &SourceArgs, ages: Vec<f64>) -> Result<EvaluationRequest, AppError> {
    let params = CostParams {
        price_multiplier: positive("--price-multiplier", args.price_multiplier)?,
        equivalence_adult: positive("--equivalence", args.equivalence)?,
    };
    let price_level_override = args.cba.map(|v| positive("--cba", v)).transpose()?;

    Ok(EvaluationRequest {
        ages,
        params,
        price_level_override,
        wage_override: wage_override(args)?,
        compare: true,
    })
}

fn wage_override(args: &SourceArgs) -> Result<Option<WagePair>, AppError> {
    match (args.hourly, args.monthly) {
        (Some(hourly), Some(monthly)) => Ok(Some(WagePair {
            hourly: positive("--hourly", hourly)?,
            monthly: positive("--monthly", monthly)?,
        })),
        (None, None) => Ok(None),
        _ => Err(AppError::usage("--hourly and --monthly must be given together.")),
    }
}

fn positive(flag: &str, value: f64) -> Result<f64, AppError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(AppError::usage(format!("{flag} must be a positive number, got {value}.")))
    }
}

/// Rewrite argv so `crianza` defaults to the form and bare flags mean `calc`.
///
/// Rules:
/// - `crianza`                      -> `crianza tui`
/// - `crianza -a 3,7 ...`           -> `crianza calc -a 3,7 ...`
/// - `crianza --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "calc" | "sources" | "show" | "tui");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "calc".to_string());
        return argv;
    }

    argv
}
