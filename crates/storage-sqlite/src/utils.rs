//! Shared parsing and formatting helpers for TEXT-backed columns.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Formats a timestamp as fixed-width UTC RFC 3339.
///
/// The fixed width keeps lexicographic ordering of the TEXT column equal to
/// chronological ordering, which the FIFO queries depend on.
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parses a stored timestamp, falling back to the Unix epoch on bad data so
/// a corrupt row surfaces at the start of any date-ordered scan instead of
/// aborting it.
pub fn parse_datetime_string_tolerant(value_str: &str, field_name: &str) -> DateTime<Utc> {
    match DateTime::parse_from_rfc3339(value_str) {
        Ok(parsed) => parsed.with_timezone(&Utc),
        Err(err) => {
            log::error!(
                "Failed to parse {} '{}' as RFC 3339 (err: {}). Falling back to epoch.",
                field_name,
                value_str,
                err
            );
            Utc.timestamp_opt(0, 0).unwrap()
        }
    }
}

/// Parses a stored decimal, with a fallback for scientific notation.
pub fn parse_decimal_string_tolerant(value_str: &str, field_name: &str) -> Decimal {
    match Decimal::from_str(value_str) {
        Ok(d) => d,
        Err(e_decimal) => match Decimal::from_scientific(value_str) {
            Ok(d) => d,
            Err(e_scientific) => {
                log::error!(
                    "Failed to parse {} '{}': as Decimal (err: {}), and as scientific (err: {}). Falling back to ZERO.",
                    field_name, value_str, e_decimal, e_scientific
                );
                Decimal::ZERO
            }
        },
    }
}
