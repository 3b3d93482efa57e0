use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::normalizer::{clean_address, has_country, STREET_TYPE_WORDS};

/// Structured view of a free-text US address line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAddress {
    pub number: Option<String>,
    pub prefix: Option<String>,
    pub street: Option<String>,
    #[serde(rename = "type")]
    pub street_type: Option<String>,
    pub suffix: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub unit: Option<String>,
    pub has_country: bool,
    pub raw_original: String,
    pub cleaned_text: String,
}

static TRAILING_UNIT: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)\s+(?:apt|apartment|unit|ste|suite|spc|space)\b\.?\s*#?\s*[a-z0-9-]+$")
            .expect("trailing unit pattern compiles"),
        Regex::new(r"(?i)\s+#\s*[a-z0-9-]+$").expect("trailing hash unit pattern compiles"),
    ]
});

static UNIT_DESIGNATORS: LazyLock<[Regex; 5]> = LazyLock::new(|| {
    [
        r"\b(?:apt|apartment)\b\.?\s*#?\s*([a-z0-9-]+)",
        r"\b(?:unit|ste|suite)\b\.?\s*#?\s*([a-z0-9-]+)",
        r"\b(?:spc|space)\b\.?\s*#?\s*([a-z0-9-]+)",
        r"\b(?:bldg|building|fl|floor|rm|room)\b\.?\s*#?\s*([a-z0-9-]+)",
        r"#\s*([a-z0-9-]+)",
    ]
    .map(|pattern| Regex::new(pattern).expect("unit designator pattern compiles"))
});

static UNIT_MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:apt|apartment|unit|ste|suite|spc|space)\b\.?\s*#?\s*[a-z0-9]|#\s*[a-z0-9]")
        .expect("unit mention pattern compiles")
});

static HOUSE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+[A-Za-z]?)\s+(.+)").expect("house number pattern compiles"));

static DIRECTION_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(N|S|E|W|NE|NW|SE|SW|North|South|East|West|Northeast|Northwest|Southeast|Southwest)\.?\s+(.+)",
    )
    .expect("direction prefix pattern compiles")
});

static TYPE_AT_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b({STREET_TYPE_WORDS})\.?\s*$")).expect("street type pattern compiles")
});

static TYPE_WITH_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b({STREET_TYPE_WORDS})\.?\s+(N|S|E|W|NE|NW|SE|SW)\s*$"
    ))
    .expect("street type suffix pattern compiles")
});

static TYPE_MID_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b({STREET_TYPE_WORDS})\.?\s+"))
        .expect("inline street type pattern compiles")
});

static STATE_ZIP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z]{2})\s+(\d{5}(?:-\d{4})?)\s*$").expect("state zip pattern compiles")
});

static CITY_STATE_ZIP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s+([A-Za-z]{2})\s+(\d{5}(?:-\d{4})?)$")
        .expect("city state zip pattern compiles")
});

static STATE_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z]{2})\s*$").expect("state pattern compiles"));

static TRAILING_STATE_ZIP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+([A-Za-z]{2})\s+(\d{5}(?:-\d{4})?)\s*$")
        .expect("trailing state zip pattern compiles")
});

/// Breaks a raw address into its components. Never fails; unrecognized parts stay `None`.
pub fn parse_address(raw: &str) -> ParsedAddress {
    let cleaned = clean_address(raw);
    let mut parsed = ParsedAddress::default();

    let parts: Vec<&str> = cleaned
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    if parts.len() >= 2 {
        read_locality(&parts, &mut parsed);
        parse_street_part(parts[0], &mut parsed);
    } else {
        parse_single_line(&cleaned, &mut parsed);
    }

    parsed.unit = extract_unit(&cleaned);
    parsed.has_country = has_country(raw);
    parsed.raw_original = raw.to_string();
    parsed.cleaned_text = cleaned;
    parsed
}

fn read_locality(parts: &[&str], parsed: &mut ParsedAddress) {
    let last = parts[parts.len() - 1];
    let second_last = (parts.len() >= 3).then(|| parts[parts.len() - 2]);

    if let Some(caps) = STATE_ZIP.captures(last) {
        parsed.state = Some(caps[1].to_string());
        parsed.zip = Some(caps[2].to_string());
        parsed.city = second_last.map(str::to_string);
    } else if let Some(caps) = CITY_STATE_ZIP.captures(last) {
        parsed.city = Some(caps[1].trim().to_string());
        parsed.state = Some(caps[2].to_string());
        parsed.zip = Some(caps[3].to_string());
    } else if let Some((caps, city)) = STATE_ONLY.captures(last).zip(second_last) {
        parsed.state = Some(caps[1].to_string());
        parsed.city = Some(city.to_string());
    } else if !last.chars().any(|c| c.is_ascii_digit()) {
        parsed.city = Some(last.to_string());
    }
}

fn parse_single_line(cleaned: &str, parsed: &mut ParsedAddress) {
    let mut remainder = cleaned;
    if let Some(caps) = TRAILING_STATE_ZIP.captures(cleaned) {
        parsed.state = Some(caps[1].to_string());
        parsed.zip = Some(caps[2].to_string());
        if let Some(whole) = caps.get(0) {
            remainder = cleaned[..whole.start()].trim();
        }
    }

    if let Some(street_type) = TYPE_MID_LINE.find(remainder) {
        let after_type = remainder[street_type.end()..].trim();
        let starts_with_digit = after_type.starts_with(|c: char| c.is_ascii_digit());
        if !after_type.is_empty() && !starts_with_digit {
            parsed.city = Some(after_type.to_string());
            parse_street_part(remainder[..street_type.end()].trim(), parsed);
            return;
        }
    }

    parse_street_part(remainder, parsed);
}

fn parse_street_part(street_part: &str, parsed: &mut ParsedAddress) {
    let mut line = street_part.to_string();
    for unit in TRAILING_UNIT.iter() {
        line = unit.replace(&line, "").into_owned();
    }

    let numbered = HOUSE_NUMBER
        .captures(&line)
        .map(|caps| (caps[1].to_string(), caps[2].trim().to_string()));
    let Some((number, mut remainder)) = numbered else {
        return;
    };
    parsed.number = Some(number);

    let prefixed = DIRECTION_PREFIX
        .captures(&remainder)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()));
    if let Some((direction, rest)) = prefixed {
        parsed.prefix = Some(direction);
        remainder = rest;
    }

    let street = if let Some(caps) = TYPE_AT_END.captures(&remainder) {
        parsed.street_type = Some(caps[1].to_string());
        let start = caps.get(0).map_or(remainder.len(), |whole| whole.start());
        remainder[..start].trim().to_string()
    } else if let Some(caps) = TYPE_WITH_SUFFIX.captures(&remainder) {
        parsed.street_type = Some(caps[1].to_string());
        parsed.suffix = Some(caps[2].to_string());
        let start = caps.get(0).map_or(remainder.len(), |whole| whole.start());
        remainder[..start].trim().to_string()
    } else {
        remainder.trim().to_string()
    };

    parsed.street = (!street.is_empty()).then_some(street);
}

/// Unit designator from an address line, e.g. "4B" from "Apt #4B".
pub fn extract_unit(address: &str) -> Option<String> {
    let lower = address.to_lowercase();
    UNIT_DESIGNATORS.iter().find_map(|pattern| {
        pattern
            .captures(&lower)
            .and_then(|caps| caps.get(1))
            .map(|unit| unit.as_str().trim_start_matches('#').trim().to_string())
            .filter(|unit| !unit.is_empty())
    })
}

pub fn has_unit_info(address: &str) -> bool {
    UNIT_MENTION.is_match(address)
}
