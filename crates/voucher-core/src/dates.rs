//! Date handling for the `Redeemed Date` column.
//!
//! Vouchers carry timestamps as ISO-8601 strings on the wire. The sheet
//! stores them as a human-readable locale string (`2/14/2026, 7:05:09 PM`)
//! in UTC, and loading turns that cell back into ISO-8601 with millisecond
//! precision. Sub-second precision does not survive the sheet.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::error::{Error, Result};

/// Display format written to the sheet.
const LOCALE_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Naive layouts accepted on input, all read as UTC.
const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%m/%d/%Y, %I:%M:%S %p",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parse a timestamp in any of the accepted layouts.
///
/// Accepts RFC 3339 (`2026-02-14T19:05:09.123Z`), naive ISO date-times,
/// bare dates (`2026-02-14`, midnight UTC), and the sheet's own locale
/// format.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(Error::InvalidDate("empty timestamp".to_string()));
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(Error::InvalidDate(format!("unrecognized timestamp `{value}`")))
}

/// Render a timestamp the way the sheet displays it.
pub fn format_locale(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(LOCALE_FORMAT).to_string()
}

/// Render a timestamp as ISO-8601 UTC with milliseconds.
pub fn format_iso(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Convert a wire timestamp into its sheet cell text.
pub fn to_sheet_text(raw: &str) -> Result<String> {
    parse_timestamp(raw).map(|timestamp| format_locale(&timestamp))
}

/// Convert a sheet cell back into a wire timestamp.
pub fn to_wire_text(cell: &str) -> Result<String> {
    parse_timestamp(cell).map(|timestamp| format_iso(&timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_rfc3339_with_offset() {
        let parsed = parse_timestamp("2026-02-14T20:05:09+01:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 2, 14, 19, 5, 9).unwrap());
    }

    #[test]
    fn parses_bare_date_as_midnight() {
        let parsed = parse_timestamp("2026-02-14").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 2, 14, 0, 0, 0).unwrap());
    }

    #[test]
    fn locale_format_is_unpadded_twelve_hour() {
        let timestamp = Utc.with_ymd_and_hms(2026, 2, 4, 19, 5, 9).unwrap();
        assert_eq!(format_locale(&timestamp), "2/4/2026, 7:05:09 PM");

        let midnight = Utc.with_ymd_and_hms(2026, 12, 25, 0, 0, 0).unwrap();
        assert_eq!(format_locale(&midnight), "12/25/2026, 12:00:00 AM");
    }

    #[test]
    fn locale_text_parses_back_to_same_instant() {
        let timestamp = Utc.with_ymd_and_hms(2026, 2, 4, 19, 5, 9).unwrap();
        let parsed = parse_timestamp(&format_locale(&timestamp)).unwrap();
        assert_eq!(parsed, timestamp);
    }

    #[test]
    fn sheet_round_trip_drops_milliseconds() {
        let cell = to_sheet_text("2026-02-14T19:05:09.734Z").unwrap();
        assert_eq!(cell, "2/14/2026, 7:05:09 PM");
        assert_eq!(to_wire_text(&cell).unwrap(), "2026-02-14T19:05:09.000Z");
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_timestamp("next tuesday").unwrap_err();
        assert!(matches!(err, Error::InvalidDate(_)));
        assert!(parse_timestamp("   ").is_err());
    }
}
