//! yang's main application entry point.
//! Parses the invocation, loads the manifest and runs the pipeline, exiting
//! with the first failing stage's code.

use yang::{
    cli::{get_args, Args},
    config::seed_variables,
    error::{default_error_handler, YangResult},
    exec::ShellExecutor,
    fetch::HttpFetcher,
    logger::init_logger,
    manifest::Loader,
    pipeline::{Pipeline, RunSummary},
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    match run(args) {
        Ok(summary) => println!("* {} tasks done", summary.total()),
        Err(err) => default_error_handler(err),
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Seeds built-in and invocation variables
/// 2. Loads the manifest, applying immediate directives
/// 3. Runs commands, dependency and main compilation, then checks
fn run(args: Args) -> YangResult<RunSummary> {
    let settings = args.settings();
    let vars = seed_variables(args.vars.as_slice())?;

    let fetcher = HttpFetcher::new().with_timeout(settings.timeout);
    let executor = ShellExecutor::new()
        .with_shell(settings.shell.clone())
        .with_timeout(settings.timeout);

    let spec = Loader::new(&fetcher)
        .with_max_passes(settings.max_passes)
        .load(&args.manifest, vars)?;

    Pipeline::new(&spec, &executor).run()
}
