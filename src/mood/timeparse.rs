use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

// Timestamps arrive from several generations of clients: ISO with and
// without fractional seconds, space-separated variants, bare dates, and
// both slash orders. Offsets are stripped rather than converted — the
// stored wall-clock time is what the analytics care about.
static TZ_OFFSET: Lazy<Regex> = Lazy::new(|| Regex::new(r"[+-]\d{2}:?\d{2}$").expect("static pattern"));
static UTC_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"Z$").expect("static pattern"));

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d-%m-%Y %H:%M:%S",
];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized timestamp: {0:?}")]
pub struct ParseFailure(pub String);

/// Parse a timestamp string of unknown provenance into a naive date-time.
///
/// Callers skip the record on failure; a bad timestamp must never abort a
/// whole aggregation pass.
pub fn parse_flexible(raw: &str) -> Result<NaiveDateTime, ParseFailure> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseFailure(raw.to_string()));
    }

    let cleaned = TZ_OFFSET.replace(trimmed, "");
    let cleaned = UTC_MARKER.replace(&cleaned, "");
    let cleaned = cleaned.trim();

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, fmt) {
            return Ok(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(cleaned, fmt) {
            return Ok(date.and_time(NaiveTime::MIN));
        }
    }

    // Last resort: salvage the date portion before a 'T' or space.
    let date_part = cleaned.split(['T', ' ']).next().unwrap_or(cleaned);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| ParseFailure(raw.to_string()))
}
