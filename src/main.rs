pub mod config;
pub mod entry;
pub mod error;
pub mod filter;
pub mod output;

use clap::error::ErrorKind;
use config::{LogSource, Options, help_text};
use error::{LogKickerError, Result};
use filter::{FilterMode, TimeRange};
use rootcause::prelude::ResultExt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

fn main() -> Result<()> {
    let options = match Options::try_parse_from(std::env::args_os()) {
        Ok(options) => options,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            // Usage errors exit with 1 and show the timestamp format.
            let _ = e.print();
            eprintln!("\n{}", help_text());
            std::process::exit(1);
        }
    };

    init_logging(options.verbosity);
    tracing::info!(source = %options.source, "Starting logkicker");

    let range = match options.mode {
        FilterMode::Strict => TimeRange::strict(&options.start, &options.end)
            .attach("Strict mode requires a well-formed, ordered range")?,
        FilterMode::Lexical => TimeRange::new(&options.start, &options.end),
    };

    if !range.is_ordered() {
        tracing::warn!(%range, "Start time is after end time, no line can match");
    }

    let reader = open_source(&options.source)?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());

    let stats = output::copy_matching(reader, &mut writer, range, options.mode, options.format)
        .attach_with(|| format!("Failed to filter {}", options.source))?;

    tracing::info!(
        scanned = stats.scanned,
        selected = stats.selected,
        output_closed = stats.output_closed,
        "Finished filtering"
    );
    if stats.malformed > 0 {
        tracing::warn!(count = stats.malformed, "Skipped lines with malformed timestamps");
    }
    if stats.unparsed > 0 {
        tracing::warn!(count = stats.unparsed, "Skipped lines that are not log entries");
    }

    Ok(())
}

fn open_source(source: &LogSource) -> Result<Box<dyn BufRead>> {
    match source {
        LogSource::Stdin => Ok(Box::new(io::stdin().lock())),
        LogSource::File(path) => {
            let file = File::open(path)
                .map_err(LogKickerError::FileRead)
                .attach_with(|| format!("Failed to open log file: {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
    }
}

/// Diagnostics go to stderr so stdout carries only selected lines.
fn init_logging(verbosity: u8) {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::new(log_directive(verbosity)));

    tracing_subscriber::registry().with(fmt_layer).init();
}

fn log_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
