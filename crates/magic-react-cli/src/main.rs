//! magic-react - scaffold a React project from a route specification
//!
//! Main entry point for the `magic-react` binary.

use std::process::ExitCode;

use clap::Parser;
use magic_react_cli::cli::Cli;
use magic_react_cli::error::{handle_result, setup_panic_handler};
use magic_react_cli::output::Printer;
use magic_react_cli::pipeline::{ScaffoldSummary, Scaffolder};
use magic_react_cli::tools::ProcessRunner;
use magic_react_cli::CliError;

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_panic_handler();

    let color = cli.color_mode();
    let verbose = cli.verbose > 0;
    handle_result(run(cli), color, verbose)
}

fn run(cli: Cli) -> Result<ScaffoldSummary, CliError> {
    let printer = Printer::new(cli.color_mode(), cli.quiet);
    printer.banner();

    let workdir = std::env::current_dir()?;
    let config = cli.load_config(&workdir)?;
    magic_react_common_log::init(cli.log_config())?;

    // Tools run one at a time and file writes interleave on one thread.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let runner = ProcessRunner::new(printer);
    let options = cli.scaffold_options(workdir);
    let summary = runtime.block_on(Scaffolder::new(&config, &runner, printer).run(&options))?;

    printer.summary(&summary);
    Ok(summary)
}
