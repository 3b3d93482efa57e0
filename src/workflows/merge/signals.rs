//! Small text signals shared by the resolver, the eligibility checks, and the
//! conflict monitor.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

static FOUR_DIGIT_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})\b").expect("year pattern compiles"));

static ACTIVITY_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:updated at\s*)?(\w{3})\s+(\d{1,2}),?\s+(\d{4})\s*-?\s*(\d{1,2}):(\d{2})\s*(AM|PM)",
    )
    .expect("activity timestamp pattern compiles")
});

const EARLIEST_BIRTH_YEAR: u32 = 1900;

/// Layout of a timestamp once the separators are normalized.
const ACTIVITY_TIMESTAMP_FORMAT: &str = "%b %d %Y %I:%M %p";

/// First standalone four-digit run in a date-of-birth value.
pub fn birth_year(value: &str) -> Option<&str> {
    FOUR_DIGIT_YEAR
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|year| year.as_str())
}

/// Years with a leading zero or before 1900 are placeholder data.
pub fn is_valid_birth_year(year: &str) -> bool {
    if year.starts_with('0') {
        return false;
    }
    year.parse::<u32>()
        .map(|parsed| parsed >= EARLIEST_BIRTH_YEAR)
        .unwrap_or(false)
}

pub fn valid_birth_year(value: &str) -> Option<&str> {
    birth_year(value).filter(|year| is_valid_birth_year(year))
}

/// Parses the "Mon D, YYYY - H:MM AM" stamps shown on application and milestone rows.
pub fn parse_activity_timestamp(text: &str) -> Option<NaiveDateTime> {
    let caps = ACTIVITY_TIMESTAMP.captures(text)?;
    let stamp = format!(
        "{} {} {} {}:{} {}",
        &caps[1], &caps[2], &caps[3], &caps[4], &caps[5], &caps[6]
    );
    NaiveDateTime::parse_from_str(&stamp, ACTIVITY_TIMESTAMP_FORMAT).ok()
}

/// Lower-cased name with whitespace and hyphens removed.
pub fn compact_name(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}
