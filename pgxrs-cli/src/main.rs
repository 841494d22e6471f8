mod analyze;
mod catalog;
mod schema;

use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgMatches, Command, arg};
use tracing_subscriber::EnvFilter;

use pgxrs_pipeline::{AnalysisError, ErrorClass};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "pgxrs";
    pub const DEFAULT_LOG_FILTER: &str = "pgxrs=info";
    pub const VERBOSE_LOG_FILTER: &str = "pgxrs=debug";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Pharmacogenomic drug-gene risk reports from VCF files.")
        .subcommand_required(true)
        .arg(arg!(-v --verbose "Log debug output to stderr").global(true))
        .subcommand(analyze::cli::create_analyze_cli())
        .subcommand(catalog::cli::create_catalog_cli())
        .subcommand(schema::cli::create_schema_cli())
}

/// Logs go to stderr; stdout only ever carries the report.
fn init_logging(matches: &ArgMatches) {
    let default = if matches.get_flag("verbose") {
        consts::VERBOSE_LOG_FILTER
    } else {
        consts::DEFAULT_LOG_FILTER
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        //
        // ANALYZE
        //
        Some((analyze::cli::ANALYZE_CMD, matches)) => {
            analyze::handlers::run_analyze(matches)?;
        }

        //
        // CATALOG
        //
        Some((catalog::cli::CATALOG_CMD, matches)) => {
            catalog::handlers::run_catalog(matches)?;
        }

        //
        // SCHEMA
        //
        Some((schema::cli::SCHEMA_CMD, matches)) => {
            schema::handlers::run_schema(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

/// 2: the VCF could not be read, 3: bad catalog or config, 4: internal error.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<AnalysisError>().map(AnalysisError::class) {
        Some(ErrorClass::InputUnavailable) => 2,
        Some(ErrorClass::Configuration) => 3,
        Some(ErrorClass::Internal) => 4,
        None => 1,
    }
}

fn main() -> ExitCode {
    let matches = build_parser().get_matches();
    init_logging(&matches);

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}
