//! Conversion of predicate literals into the textual form values are stored
//! under in a dictionary.

use arrow::compute::kernels::cast_utils::string_to_datetime;
use chrono::Utc;

use crate::{
    data_type::DataType,
    error::{Error, Result},
};

/// Converts a predicate literal into its stored textual form.
///
/// Booleans become `"1"` / `"0"` and timestamps become epoch milliseconds;
/// every other type is stored exactly as written.
pub fn stored_value(value: &str, data_type: DataType) -> Result<String> {
    match data_type {
        DataType::Boolean => stored_boolean_value(value),
        DataType::Timestamp => stored_timestamp_value(value),
        DataType::Int
        | DataType::Long
        | DataType::Float
        | DataType::Double
        | DataType::BigDecimal
        | DataType::String
        | DataType::Bytes => Ok(value.to_owned()),
    }
}

/// Converts a boolean literal into its stored int form.
pub fn stored_boolean_value(value: &str) -> Result<String> {
    parse_boolean(value).map(|v| v.to_string())
}

/// Converts a timestamp literal into epoch milliseconds.
pub fn stored_timestamp_value(value: &str) -> Result<String> {
    parse_timestamp_millis(value).map(|v| v.to_string())
}

/// Parses a boolean literal into `1` (true) or `0` (false).
///
/// Accepts `true` / `false` in any case as well as `1` / `0`.
pub fn parse_boolean(value: &str) -> Result<i32> {
    if value.eq_ignore_ascii_case("true") || value == "1" {
        Ok(1)
    } else if value.eq_ignore_ascii_case("false") || value == "0" {
        Ok(0)
    } else {
        Err(Error::value_format(
            DataType::Boolean,
            value,
            "expected true, false, 1 or 0",
        ))
    }
}

/// Parses a timestamp literal into milliseconds since the epoch.
///
/// Integer literals are taken as epoch milliseconds already. Anything else
/// must be an RFC 3339 / SQL style timestamp; values without an offset are
/// read as UTC.
pub fn parse_timestamp_millis(value: &str) -> Result<i64> {
    if let Ok(millis) = value.parse::<i64>() {
        return Ok(millis);
    }
    string_to_datetime(&Utc, value)
        .map(|datetime| datetime.timestamp_millis())
        .map_err(|err| Error::value_format(DataType::Timestamp, value, err))
}
