pub mod names;
pub mod parser;

pub use parser::{LogEntry, parse_log_entry};
