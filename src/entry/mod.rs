//! Process entry: argument parsing, config merge, runtime and report.
use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::debug;

use crate::args::{DEFAULT_CONFIG_FILES, OutputFormat, TesterArgs};
use crate::config::{apply_config, load_config};
use crate::domain::RunConfig;
use crate::engine::run_load_test;
use crate::error::AppResult;
use crate::http::{HttpTransport, Transport};
use crate::report::{render, render_run_header};
use crate::shutdown::{request_shutdown, shutdown_channel};
use crate::shutdown_handlers::setup_signal_shutdown_handler;

/// Runs the CLI to completion.
///
/// # Errors
///
/// Returns an error for invalid arguments or configuration, or when the
/// runtime or HTTP client cannot be set up. Failed requests are part of the
/// report, not errors.
pub fn run() -> AppResult<()> {
    let Some((mut args, matches)) = parse_args()? else {
        return Ok(());
    };

    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, &matches, &config)?;
    }

    crate::system::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(&args))
}

fn parse_args() -> AppResult<Option<(TesterArgs, ArgMatches)>> {
    let mut cmd = TesterArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = TesterArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !has_default_config()
}

fn has_default_config() -> bool {
    DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

async fn run_async(args: &TesterArgs) -> AppResult<()> {
    let config = RunConfig::from_args(args)?;
    config.validate()?;

    if matches!(args.output_format, OutputFormat::Text) {
        println!("{}", render_run_header(&config));
    }

    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config)?);
    let (shutdown_tx, _) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let result = run_load_test(config, transport, &shutdown_tx).await;

    // Releases the signal handler when the run ended on its own.
    request_shutdown(&shutdown_tx);
    signal_handle.await?;
    debug!("Signal handler stopped");

    let summary = result?;
    println!("{}", render(&summary, args.output_format)?);
    Ok(())
}
