use crate::entry::names::{is_digits, is_log_category, is_thread_name};
use crate::error::{LogKickerError, Result};
use rootcause::prelude::Report;
use serde::Serialize;

/// A Bitcoin Core `debug.log` line split into its metadata and body.
///
/// Only `time` and `body` are always present:
///
/// ```text
/// {time} [{thread}] [{file:line}] [{function}] [{category:level}] [{wallet}] {body}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry<'a> {
    pub time: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet: Option<&'a str>,
    pub body: &'a str,
}

impl<'a> LogEntry<'a> {
    fn bare(time: &'a str, body: &'a str) -> Self {
        Self {
            time,
            thread: None,
            file: None,
            line: None,
            function: None,
            category: None,
            level: None,
            wallet: None,
            body,
        }
    }
}

/// Parse one log line (without its terminator).
pub fn parse_log_entry(line: &str) -> Result<LogEntry<'_>> {
    let Some((time, rest)) = line.split_once(' ') else {
        return Err(malformed("no message after timestamp", line));
    };

    let (mut groups, body) = split_metadata(rest);
    let mut entry = LogEntry::bare(time, body);

    // Some lines carry no metadata at all.
    let Some(last) = groups.pop() else {
        return Ok(entry);
    };

    // The rightmost group is the category, unless a wallet name follows it.
    let (category, level) = match parse_category(last) {
        Some(category) => category,
        None => {
            entry.wallet = Some(last);
            groups
                .pop()
                .and_then(parse_category)
                .ok_or_else(|| malformed("missing log category", line))?
        }
    };
    entry.category = Some(category);
    entry.level = level;

    for group in groups {
        if is_thread_name(group) {
            entry.thread = Some(group);
        } else if let Some((file, line_num)) = parse_source_location(group) {
            entry.file = Some(file);
            entry.line = Some(line_num);
        } else if is_function_name(group) {
            entry.function = Some(group);
        } else {
            return Err(malformed(&format!("unknown metadata [{}]", group), line));
        }
    }

    Ok(entry)
}

/// Split the leading run of `[...]` groups from the message body.
fn split_metadata(rest: &str) -> (Vec<&str>, &str) {
    let mut groups = Vec::new();
    let mut cursor = rest.trim_start();

    while let Some(inner) = cursor.strip_prefix('[') {
        match inner.find(']') {
            Some(close) if close > 0 => {
                groups.push(&inner[..close]);
                cursor = inner[close + 1..].trim_start();
            }
            _ => break,
        }
    }

    (groups, cursor)
}

fn parse_category(group: &str) -> Option<(&str, Option<&str>)> {
    let (category, level) = match group.split_once(':') {
        Some((category, level)) => (category, Some(level)),
        None => (group, None),
    };

    if !is_log_category(category) {
        return None;
    }
    let level_ok = level.is_none_or(|level| {
        !level.is_empty() && level.chars().all(|c| c.is_alphanumeric() || c == '_')
    });
    if !level_ok {
        return None;
    }

    Some((category, level))
}

/// `src/net_processing.cpp:1154` style locations.
fn parse_source_location(group: &str) -> Option<(&str, u32)> {
    let (file, line) = group.split_once(':')?;
    if !(file.ends_with(".cpp") || file.ends_with(".h")) || !is_digits(line) {
        return None;
    }
    Some((file, line.parse().ok()?))
}

fn is_function_name(group: &str) -> bool {
    if let Some(op) = group.strip_prefix("operator") {
        if !op.is_empty() {
            return true;
        }
    }

    let mut chars = group.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn malformed(reason: &str, line: &str) -> Report<LogKickerError> {
    Report::new(LogKickerError::InvalidLogFormat(format!("{}: {}", reason, line)))
}
