//! HTTP-date handling.
//!
//! Conditional request headers may carry any of the three historical formats:
//!
//! ```text
//! Fri, 31 Dec 1999 23:59:59 GMT      RFC 1123
//! Friday, 31-Dec-99 23:59:59 GMT     RFC 850
//! Fri Dec 31 23:59:59 1999           ANSI C asctime()
//! ```
//!
//! A value without a trailing zone is read as GMT, and other zones are
//! converted to UTC.

use chrono::{FixedOffset, NaiveDateTime, TimeZone, Utc};
use std::borrow::Cow;
use std::time::SystemTime;

// Layouts once the weekday name is dropped and the zone split off.
const RFC1123_FORMAT: &str = "%d %b %Y %H:%M:%S";
const RFC850_FORMAT: &str = "%d-%b-%Y %H:%M:%S";
const ASCTIME_FORMAT: &str = "%b %e %H:%M:%S %Y";

const WEEKDAYS: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

/// Formats `time` as an IMF-fixdate, e.g. `Fri, 31 Dec 1999 23:59:59 GMT`.
pub fn format_http_date(time: SystemTime) -> String {
    httpdate::fmt_http_date(time)
}

/// Parses an HTTP-date in any accepted format.
///
/// The leading weekday name is ignored, so a weekday that disagrees with the
/// date does not reject it. Two-digit RFC 850 years 69-99 are 19xx, 00-68
/// are 20xx. Returns `None` for anything unparseable.
pub fn parse_http_date(raw: &str) -> Option<SystemTime> {
    let value = strip_weekday(raw.trim());
    if value.is_empty() {
        return None;
    }

    let zoned = if has_zone(value) {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(format!("{value} GMT"))
    };

    let (stamp, zone) = zoned.rsplit_once([' ', '\t'])?;
    let offset = zone_offset(zone)?;
    let stamp = expand_two_digit_year(stamp.trim_end());

    [RFC1123_FORMAT, RFC850_FORMAT, ASCTIME_FORMAT]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&stamp, format).ok())
        .and_then(|naive| offset.from_local_datetime(&naive).single())
        .map(|time| time.with_timezone(&Utc).into())
}

/// Parses a conditional-request date, ignoring values later than `now`.
pub fn parse_conditional_date(raw: &str, now: SystemTime) -> Option<SystemTime> {
    parse_http_date(raw).filter(|date| *date <= now)
}

/// Drops a leading `Fri,` / `Friday,` / `Fri` token.
fn strip_weekday(value: &str) -> &str {
    let Some((first, rest)) = value.split_once([' ', '\t']) else {
        return value;
    };

    let name = first.trim_end_matches(',');
    let is_weekday = name.len() >= 3
        && name.bytes().all(|b| b.is_ascii_alphabetic())
        && WEEKDAYS.iter().any(|day| day.eq_ignore_ascii_case(&name[..3]));

    if is_weekday { rest.trim_start() } else { value }
}

/// Rewrites an RFC 850 `31-Dec-99` date to `31-Dec-1999`.
fn expand_two_digit_year(stamp: &str) -> Cow<'_, str> {
    let (date, time) = stamp.split_once(' ').unwrap_or((stamp, ""));
    let Some((day_month, year)) = date.rsplit_once('-') else {
        return Cow::Borrowed(stamp);
    };
    if year.len() != 2 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Cow::Borrowed(stamp);
    }

    let Ok(yy) = year.parse::<u32>() else {
        return Cow::Borrowed(stamp);
    };
    let century = if yy >= 69 { 1900 } else { 2000 };
    Cow::Owned(format!("{day_month}-{} {time}", century + yy))
}

/// True if the value ends in whitespace followed by an alphabetic or numeric zone token.
fn has_zone(value: &str) -> bool {
    let Some((_, last)) = value.rsplit_once([' ', '\t']) else {
        return false;
    };

    let alphabetic = !last.is_empty() && last.chars().all(|c| c.is_ascii_alphabetic());
    alphabetic || numeric_offset(last).is_some()
}

fn zone_offset(zone: &str) -> Option<FixedOffset> {
    let hours = match zone.to_ascii_uppercase().as_str() {
        "GMT" | "UT" | "UTC" | "Z" => 0,
        "EDT" => -4,
        "EST" | "CDT" => -5,
        "CST" | "MDT" => -6,
        "MST" | "PDT" => -7,
        "PST" => -8,
        _ => return numeric_offset(zone),
    };
    FixedOffset::east_opt(hours * 3600)
}

/// Parses `+hhmm` / `-hhmm`.
fn numeric_offset(zone: &str) -> Option<FixedOffset> {
    let (sign, digits) = match zone.as_bytes().first()? {
        b'+' => (1, &zone[1..]),
        b'-' => (-1, &zone[1..]),
        _ => return None,
    };
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
