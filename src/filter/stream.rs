use crate::error::{LogKickerError, Result};
use crate::filter::range::TimeRange;
use crate::filter::token::{is_fixed_format, leading_token};
use rootcause::prelude::Report;
use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Compare every token as an opaque string.
    #[default]
    Lexical,
    /// Drop lines whose token is not in the fixed timestamp layout before
    /// comparing.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterStats {
    pub scanned: usize,
    pub selected: usize,
    /// Lines dropped in strict mode because of their token shape.
    pub malformed: usize,
    /// Selected lines that could not be rendered as JSON entries.
    pub unparsed: usize,
    /// The output was closed before the input was exhausted.
    pub output_closed: bool,
}

/// A selected input line, kept exactly as read (terminator included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    number: usize,
    bytes: Vec<u8>,
}

impl LogLine {
    pub fn new(number: usize, bytes: Vec<u8>) -> Self {
        Self { number, bytes }
    }

    /// 1-based position of the line in the input.
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn token(&self) -> &[u8] {
        leading_token(&self.bytes)
    }

    pub fn has_terminator(&self) -> bool {
        self.bytes.ends_with(b"\n")
    }

    /// Line content without its `\n` or `\r\n` terminator.
    pub fn content(&self) -> &[u8] {
        let line = self.bytes.strip_suffix(b"\n").unwrap_or(&self.bytes);
        line.strip_suffix(b"\r").unwrap_or(line)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Single-pass iterator over the lines of `reader` whose leading token lies
/// in the range.
///
/// Only the current line is held in memory. A read error is yielded once and
/// ends the iteration.
pub struct RangeFilter<R> {
    reader: R,
    range: TimeRange,
    mode: FilterMode,
    buf: Vec<u8>,
    stats: FilterStats,
    done: bool,
}

impl<R: BufRead> RangeFilter<R> {
    pub fn new(reader: R, range: TimeRange, mode: FilterMode) -> Self {
        Self {
            reader,
            range,
            mode,
            buf: Vec::new(),
            stats: FilterStats::default(),
            done: false,
        }
    }

    /// Counts so far; final once the iterator returned `None`.
    pub fn stats(&self) -> FilterStats {
        self.stats
    }

    fn accepts(&mut self) -> bool {
        let token = leading_token(&self.buf);
        if self.mode == FilterMode::Strict && !is_fixed_format(token) {
            self.stats.malformed += 1;
            tracing::trace!(line = self.stats.scanned, "Skipping line with malformed timestamp");
            return false;
        }
        self.range.contains(token)
    }
}

impl<R: BufRead> Iterator for RangeFilter<R> {
    type Item = Result<LogLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    self.done = true;
                    return None;
                }
                Ok(_) => {
                    self.stats.scanned += 1;
                    if self.accepts() {
                        self.stats.selected += 1;
                        let bytes = std::mem::take(&mut self.buf);
                        return Some(Ok(LogLine::new(self.stats.scanned, bytes)));
                    }
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(Report::new(LogKickerError::FileRead(e))));
                }
            }
        }
    }
}

/// Select the lines of an in-memory sequence whose leading token lies in
/// `range`, preserving their order.
pub fn filter<'a, I>(lines: I, range: &'a TimeRange) -> impl Iterator<Item = &'a str>
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: 'a,
{
    lines
        .into_iter()
        .filter(move |line| range.contains(leading_token(line.as_bytes())))
}
