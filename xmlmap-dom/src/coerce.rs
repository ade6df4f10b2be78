//! Text to value coercion rules shared by both mapping engines.
//!
//! The `parse_*` functions are pure and report failure as `None`. The
//! `coerce_*` functions are the lenient variants entity implementations use:
//! they trim their input, treat empty strings as absent and log whatever they
//! could not parse.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use http::Uri;

use crate::warning;

/// The date type produced by date coercion.
pub type Date = DateTime<FixedOffset>;

/// `Sat, 15 Aug 2020 03:00:00 +0000`
const NUMERIC_ZONE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// `Wed, 07 Oct 2020 14:15:08 PDT`, minus the trailing zone name.
const NAMED_ZONE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S";

/// Parse an RFC 822 style date.
///
/// The numeric-offset form is tried first, then the named-zone form. The first
/// one that parses wins.
pub fn parse_date(raw: &str) -> Option<Date> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    DateTime::parse_from_str(trimmed, NUMERIC_ZONE_FORMAT)
        .ok()
        .or_else(|| parse_named_zone_date(trimmed))
}

fn parse_named_zone_date(raw: &str) -> Option<Date> {
    let (stamp, zone) = raw.rsplit_once(' ')?;
    let offset = FixedOffset::east_opt(zone_offset_seconds(zone)?)?;
    let naive = NaiveDateTime::parse_from_str(stamp.trim_end(), NAMED_ZONE_FORMAT).ok()?;
    naive.and_local_timezone(offset).single()
}

/// Offset from UTC, in seconds, of a time-zone abbreviation.
fn zone_offset_seconds(zone: &str) -> Option<i32> {
    const HOUR: i32 = 3600;
    let hours = match zone.to_ascii_uppercase().as_str() {
        "UT" | "UTC" | "GMT" | "Z" | "WET" => 0,
        "BST" | "WEST" | "CET" => 1,
        "CEST" | "EET" => 2,
        "EEST" => 3,
        "JST" => 9,
        "AEST" => 10,
        "AEDT" => 11,
        "EDT" => -4,
        "EST" | "CDT" => -5,
        "CST" | "MDT" => -6,
        "MST" | "PDT" => -7,
        "PST" | "AKDT" => -8,
        "AKST" => -9,
        "HST" => -10,
        "IST" => return Some(5 * HOUR + 30 * 60),
        _ => return None,
    };
    Some(hours * HOUR)
}

/// Parse a URI reference.
pub fn parse_uri(raw: &str) -> Option<Uri> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<Uri>().ok()
}

/// The decoder's boolean rule: true iff the value starts with `T`, `t`, `Y`
/// or `y`. Everything else, absence included, is false.
pub fn parse_bool(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.starts_with(['T', 't', 'Y', 'y']))
}

/// Lenient date coercion for entity setters.
pub fn coerce_date(value: Option<&str>) -> Option<Date> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    let date = parse_date(trimmed);
    if date.is_none() {
        warning!(value = trimmed, "could not coerce date");
    }
    date
}

/// Lenient URI coercion for entity setters.
pub fn coerce_url(value: Option<&str>) -> Option<Uri> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    let uri = parse_uri(trimmed);
    if uri.is_none() {
        warning!(value = trimmed, "could not coerce URL");
    }
    uri
}

/// The streaming models' boolean rule: true iff the value is `true`, ignoring
/// case.
pub fn coerce_bool_exact(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Integer coercion for entity setters.
pub fn coerce_i32(value: Option<&str>) -> Option<i32> {
    value?.parse().ok()
}
