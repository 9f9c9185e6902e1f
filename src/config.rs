use crate::filter::FilterMode;
use crate::output::OutputFormat;
use clap::CommandFactory as _;
use std::ffi::OsString;
use std::path::PathBuf;

const AFTER_HELP: &str = "\
Timestamp format: {YYYY}-{MM}-{DD}T{HH}:{mm}:{ss}.{ssssss}Z
Example: logkicker debug.log 2025-06-21T03:00:00.000000Z 2025-07-11T03:00:00.000000Z";

/// Print the lines of a log whose leading timestamp lies in [start_time, end_time].
#[derive(Debug, Clone, clap::Parser)]
#[clap(name = "logkicker", version, after_help = AFTER_HELP)]
pub struct Args {
    /// Log file to read, or `-` for standard input.
    logfile: PathBuf,

    /// First timestamp to keep (inclusive).
    start_time: String,

    /// Last timestamp to keep (inclusive).
    end_time: String,

    /// Reject malformed or inverted ranges and skip lines with malformed timestamps.
    #[clap(long)]
    strict: bool,

    /// Print selected lines as JSON objects with their metadata.
    #[clap(long)]
    json: bool,

    /// Log progress to stderr. Repeat for more detail (e.g. -vv).
    #[clap(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSource {
    Stdin,
    File(PathBuf),
}

impl From<PathBuf> for LogSource {
    fn from(path: PathBuf) -> Self {
        if path.as_os_str() == "-" {
            LogSource::Stdin
        } else {
            LogSource::File(path)
        }
    }
}

impl std::fmt::Display for LogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogSource::Stdin => write!(f, "<stdin>"),
            LogSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub source: LogSource,
    pub start: String,
    pub end: String,
    pub mode: FilterMode,
    pub format: OutputFormat,
    pub verbosity: u8,
}

impl Options {
    /// Parse a full argument list, program name first.
    ///
    /// Help and version requests come back as errors too; see
    /// [`clap::Error::kind`].
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args = <Args as clap::Parser>::try_parse_from(args)?;
        Ok(Self::from(args))
    }
}

impl From<Args> for Options {
    fn from(args: Args) -> Self {
        Self {
            source: LogSource::from(args.logfile),
            start: args.start_time,
            end: args.end_time,
            mode: if args.strict {
                FilterMode::Strict
            } else {
                FilterMode::Lexical
            },
            format: if args.json {
                OutputFormat::Json
            } else {
                OutputFormat::Raw
            },
            verbosity: args.verbose,
        }
    }
}

/// Full help text, including the timestamp format and an example.
pub fn help_text() -> String {
    Args::command().render_help().to_string()
}
