pub mod range;
pub mod stream;
pub mod token;

#[cfg(test)]
pub(crate) mod testing;

pub use range::TimeRange;
pub use stream::{FilterMode, FilterStats, LogLine, RangeFilter, filter};
pub use token::{TIMESTAMP_FORMAT, is_fixed_format, leading_token};
