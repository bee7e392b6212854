use std::process::ExitCode;

use clap::Parser;
use csvlocale_cli::{args::Args, config, logging, report, watch};

/// The input or output directory is not usable.
const EXIT_FATAL: u8 = 1;
/// Bad flags or config file.
const EXIT_USAGE: u8 = 2;

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(logging::Verbosity::from_flags(args.verbose, args.quiet));

    let settings = match config::load_settings(&args) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("{:#}", e);
            return ExitCode::from(EXIT_USAGE);
        }
    };

    if settings.watch {
        return match watch::watch(&settings) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!("{:#}", e);
                ExitCode::from(EXIT_FATAL)
            }
        };
    }

    match csvlocale::run(&settings.run) {
        Ok(run_report) => {
            report::report_diagnostics(&run_report.diagnostics);
            tracing::info!("{}", report::summary(&run_report));
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}
