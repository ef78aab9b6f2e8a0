//! termvid binary entry point

use std::fs::OpenOptions;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use termvid::cli::{Cli, LogLevel};
use termvid::player::play_session;
use termvid::Config;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout and are not failures
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(path) = &cli.log_file {
        init_logging(path, cli.log_level)?;
    }

    let config = Config::load(cli.config.as_deref())?;
    let options = cli.session_options(config);
    tracing::debug!(?options, "starting playback");

    let summary = play_session(&cli.video, &options)?;
    println!("Average FPS: {:.2}", summary.average_fps);
    Ok(())
}

/// Send logs to `path`; the terminal itself is busy drawing video.
#[cfg(not(tarpaulin_include))]
fn init_logging(path: &Path, level: LogLevel) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::from(level))
        .with_writer(file)
        .with_ansi(false)
        .init();

    Ok(())
}
