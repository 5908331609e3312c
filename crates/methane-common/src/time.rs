//! Calendar date helpers.
//!
//! The API only ever exchanges dates as `YYYY-MM-DD`.

use chrono::NaiveDate;

use crate::{MapperError, MapperResult};

/// Wire format for dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format a date for query strings and request bodies.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> MapperResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| MapperError::InvalidDate(s.to_string()))
}
