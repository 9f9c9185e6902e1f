use crate::error::{LogKickerError, Result};
use crate::filter::token::{TIMESTAMP_FORMAT, is_fixed_format};
use rootcause::prelude::{Report, ResultExt};

/// Inclusive `[start, end]` range of timestamp tokens.
///
/// Membership is decided by byte-wise comparison only. That matches
/// chronological order as long as every token uses the same fixed-width
/// layout; nothing here checks that unless the range was built with
/// [`TimeRange::strict`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    start: String,
    end: String,
}

impl TimeRange {
    /// Build a range without any validation. An inverted range is accepted
    /// and simply matches nothing.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Build a range whose endpoints must be real instants in the fixed
    /// timestamp layout, with `start <= end`.
    pub fn strict(start: impl Into<String>, end: impl Into<String>) -> Result<Self> {
        let range = Self::new(start, end);
        validate_endpoint(&range.start).attach("Invalid start time")?;
        validate_endpoint(&range.end).attach("Invalid end time")?;

        if range.start > range.end {
            return Err(Report::new(LogKickerError::InvertedRange {
                start: range.start,
                end: range.end,
            }));
        }

        Ok(range)
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    /// Whether `start <= end`, i.e. whether any token can match at all.
    pub fn is_ordered(&self) -> bool {
        self.start <= self.end
    }

    #[inline]
    pub fn contains(&self, token: &[u8]) -> bool {
        self.start.as_bytes() <= token && token <= self.end.as_bytes()
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

fn validate_endpoint(value: &str) -> Result<()> {
    if !is_fixed_format(value.as_bytes()) {
        return Err(Report::new(LogKickerError::InvalidTimestamp(format!(
            "'{}' does not match {}",
            value, TIMESTAMP_FORMAT
        ))));
    }

    // The shape check lets through things like month 13.
    value.parse::<jiff::Timestamp>().map_err(|e| {
        Report::new(LogKickerError::InvalidTimestamp(format!("'{}': {}", value, e)))
    })?;

    Ok(())
}
