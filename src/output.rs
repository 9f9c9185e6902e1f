use crate::entry::parse_log_entry;
use crate::error::{LogKickerError, Result};
use crate::filter::{FilterMode, FilterStats, LogLine, RangeFilter, TimeRange};
use rootcause::prelude::ResultExt;
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Selected lines exactly as read.
    #[default]
    Raw,
    /// One JSON object per selected line, with its metadata split out.
    Json,
}

/// Stream the lines of `reader` that fall in `range` to `writer`.
///
/// A reader on the other end of `writer` going away (`BrokenPipe`) ends the
/// run without error; `FilterStats::output_closed` records it.
pub fn copy_matching<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    range: TimeRange,
    mode: FilterMode,
    format: OutputFormat,
) -> Result<FilterStats> {
    tracing::debug!(%range, ?mode, ?format, "Filtering log lines");

    let mut lines = RangeFilter::new(reader, range, mode);
    let mut unparsed = 0;
    let mut output_closed = false;

    for line in lines.by_ref() {
        let line = line.attach("Failed to read log line")?;
        let written = match format {
            OutputFormat::Raw => write_raw(writer, &line).map(|()| true),
            OutputFormat::Json => write_json(writer, &line),
        };

        match written {
            Ok(true) => {}
            Ok(false) => unparsed += 1,
            Err(e) if is_broken_pipe(&e) => {
                tracing::debug!(line = line.number(), "Output closed, stopping");
                output_closed = true;
                break;
            }
            Err(e) => {
                return Err(e).attach_with(|| format!("Failed to write line {}", line.number()));
            }
        }
    }

    if !output_closed {
        match writer.flush() {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => output_closed = true,
            Err(e) => return Err(LogKickerError::Write(e)).attach("Failed to flush output"),
        }
    }

    let mut stats = lines.stats();
    stats.unparsed = unparsed;
    stats.output_closed = output_closed;
    Ok(stats)
}

fn is_broken_pipe(err: &LogKickerError) -> bool {
    matches!(err, LogKickerError::Write(e) if e.kind() == io::ErrorKind::BrokenPipe)
}

fn write_raw<W: Write>(writer: &mut W, line: &LogLine) -> std::result::Result<(), LogKickerError> {
    writer
        .write_all(line.as_bytes())
        .map_err(LogKickerError::Write)?;

    // Keep output newline-terminated even when the input's last line is not.
    if !line.has_terminator() {
        writer.write_all(b"\n").map_err(LogKickerError::Write)?;
    }
    Ok(())
}

/// Returns `false` when the line is not a recognisable log entry.
fn write_json<W: Write>(writer: &mut W, line: &LogLine) -> std::result::Result<bool, LogKickerError> {
    let content = String::from_utf8_lossy(line.content());
    let entry = match parse_log_entry(&content) {
        Ok(entry) => entry,
        Err(report) => {
            tracing::warn!(line = line.number(), error = ?report, "Skipping unparseable log line");
            return Ok(false);
        }
    };

    serde_json::to_writer(&mut *writer, &entry).map_err(|e| {
        if e.is_io() {
            LogKickerError::Write(e.into())
        } else {
            LogKickerError::JsonEncode(e)
        }
    })?;
    writer.write_all(b"\n").map_err(LogKickerError::Write)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::testing::SyntheticLog;
    use std::io::{self, BufReader};

    fn run(input: &[u8], range: TimeRange, mode: FilterMode, format: OutputFormat) -> (String, FilterStats) {
        let mut out = Vec::new();
        let stats = copy_matching(input, &mut out, range, mode, format).unwrap();
        (String::from_utf8(out).unwrap(), stats)
    }

    fn range() -> TimeRange {
        TimeRange::new("2025-06-21T03:00:00.000000Z", "2025-07-11T03:00:00.000000Z")
    }

    const LOG: &str = "\
2025-06-20T00:00:00.000000Z [msghand] [net] a
2025-06-21T03:00:00.000000Z [msghand] [cmpctblock:debug] b
2025-07-01T00:00:00.000000Z [init] [all:info] [Waleto] c
2025-07-11T03:00:00.000000Z d
2025-07-12T00:00:00.000000Z [msghand] [net] e
";

    #[test]
    fn test_raw_output_matches_selected_lines() {
        let (out, stats) = run(LOG.as_bytes(), range(), FilterMode::Lexical, OutputFormat::Raw);
        assert_eq!(
            out,
            "2025-06-21T03:00:00.000000Z [msghand] [cmpctblock:debug] b\n\
             2025-07-01T00:00:00.000000Z [init] [all:info] [Waleto] c\n\
             2025-07-11T03:00:00.000000Z d\n"
        );
        assert_eq!(stats.scanned, 5);
        assert_eq!(stats.selected, 3);
    }

    #[test]
    fn test_raw_output_terminates_last_line() {
        let input = b"2025-07-11T03:00:00.000000Z last";
        let (out, _) = run(input, range(), FilterMode::Lexical, OutputFormat::Raw);
        assert_eq!(out, "2025-07-11T03:00:00.000000Z last\n");
    }

    #[test]
    fn test_raw_output_keeps_crlf() {
        let input = b"2025-07-01T00:00:00.000000Z windows\r\n";
        let (out, _) = run(input, range(), FilterMode::Lexical, OutputFormat::Raw);
        assert_eq!(out, "2025-07-01T00:00:00.000000Z windows\r\n");
    }

    #[test]
    fn test_no_matches_is_success() {
        let range = TimeRange::new("2030-01-01T00:00:00.000000Z", "2030-01-02T00:00:00.000000Z");
        let (out, stats) = run(LOG.as_bytes(), range, FilterMode::Lexical, OutputFormat::Raw);
        assert!(out.is_empty());
        assert_eq!(stats.selected, 0);
    }

    #[test]
    fn test_json_output() {
        let (out, stats) = run(LOG.as_bytes(), range(), FilterMode::Lexical, OutputFormat::Json);
        insta::assert_snapshot!(out, @r#"
        {"time":"2025-06-21T03:00:00.000000Z","thread":"msghand","category":"cmpctblock","level":"debug","body":"b"}
        {"time":"2025-07-01T00:00:00.000000Z","thread":"init","category":"all","level":"info","wallet":"Waleto","body":"c"}
        {"time":"2025-07-11T03:00:00.000000Z","body":"d"}
        "#);
        assert_eq!(stats.unparsed, 0);
    }

    #[test]
    fn test_json_output_skips_unparseable_lines() {
        let input = "2025-07-01T00:00:00.000000Z [bogus group] x\n2025-07-02T00:00:00.000000Z\n";
        let (out, stats) = run(input.as_bytes(), range(), FilterMode::Lexical, OutputFormat::Json);
        assert!(out.is_empty());
        assert_eq!(stats.selected, 2);
        assert_eq!(stats.unparsed, 2);
    }

    #[test]
    fn test_streams_large_input() {
        let range = TimeRange::new("2025-01-01T01:00:00.000000Z", "2025-01-01T01:59:59.000000Z");
        let stats = copy_matching(
            BufReader::new(SyntheticLog::new()),
            &mut io::sink(),
            range,
            FilterMode::Strict,
            OutputFormat::Raw,
        )
        .unwrap();

        assert_eq!(stats.scanned, SyntheticLog::SECONDS as usize);
        assert_eq!(stats.selected, 3_600);
        assert_eq!(stats.malformed, 0);
    }

    struct FailingWriter(io::ErrorKind);

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(self.0))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(self.0))
        }
    }

    #[test]
    fn test_write_error_is_fatal() {
        let result = copy_matching(
            LOG.as_bytes(),
            &mut FailingWriter(io::ErrorKind::PermissionDenied),
            range(),
            FilterMode::Lexical,
            OutputFormat::Raw,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_closed_output_ends_quietly() {
        for format in [OutputFormat::Raw, OutputFormat::Json] {
            let stats = copy_matching(
                LOG.as_bytes(),
                &mut FailingWriter(io::ErrorKind::BrokenPipe),
                range(),
                FilterMode::Lexical,
                format,
            )
            .unwrap();

            assert!(stats.output_closed);
            // Reading stops at the first line that could not be written.
            assert_eq!(stats.selected, 1);
            assert_eq!(stats.scanned, 2);
        }
    }

    /// Accepts `limit` bytes, then reports the reader as gone.
    struct HeadPipe {
        taken: Vec<u8>,
        limit: usize,
    }

    impl Write for HeadPipe {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let room = self.limit - self.taken.len();
            if room == 0 {
                return Err(io::Error::from(io::ErrorKind::BrokenPipe));
            }
            let n = buf.len().min(room);
            self.taken.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_closed_output_during_flush() {
        let mut pipe = HeadPipe {
            taken: Vec::new(),
            limit: 10,
        };
        let mut writer = io::BufWriter::new(&mut pipe);
        let stats = copy_matching(
            LOG.as_bytes(),
            &mut writer,
            range(),
            FilterMode::Lexical,
            OutputFormat::Raw,
        )
        .unwrap();
        drop(writer);

        assert!(stats.output_closed);
        assert_eq!(stats.selected, 3);
        assert_eq!(pipe.taken, b"2025-06-21");
    }
}
