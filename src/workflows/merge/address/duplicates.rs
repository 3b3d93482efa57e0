use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::normalizer::{
    clean_address, normalize_for_fuzzy, normalize_street, similarity, STREET_TYPE_TOKENS,
};

const SEGMENT_SIMILARITY: f64 = 0.8;
const FRAGMENT_SIMILARITY: f64 = 0.75;
const CITY_SIMILARITY: f64 = 0.8;
const MIN_COMPARABLE_LEN: usize = 4;

static STREET_TYPE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^(.+?\b(?:{STREET_TYPE_TOKENS})\b\.?)(\s+.+)?$"))
        .expect("street type break pattern compiles")
});

static NUMBERED_FRAGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+[a-z]?\s+(?:[a-z]+\.?\s+)*[a-z]+)").expect("numbered fragment pattern compiles")
});

static TYPED_FRAGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b([a-z]+(?:\s+[a-z]+){{0,2}}?\s+(?:{STREET_TYPE_TOKENS}))\b"
    ))
    .expect("typed fragment pattern compiles")
});

static UNIT_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\b(?:apt|apartment|unit|spc|space|ste|suite)\b|#)\.?\s*#?\s*([a-z0-9]+)")
        .expect("unit token pattern compiles")
});

static CITY_STREET_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:st|ave|blvd|dr|rd|ln|ct|cir|trl|way|pl)\b")
        .expect("city street type pattern compiles")
});

/// The repeated piece that marks an address as corrupted by concatenation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateComponent {
    Segment { first: String, second: String },
    StreetFragment { first: String, second: String },
    City { city: String, occurrences: usize },
    Unit(String),
}

pub fn has_duplicate_components(raw: &str) -> bool {
    find_duplicate_component(raw).is_some()
}

/// Looks for repeated segments, street fragments, city names, or unit designators.
pub fn find_duplicate_component(raw: &str) -> Option<DuplicateComponent> {
    let cleaned = clean_address(raw);
    if cleaned.is_empty() {
        return None;
    }
    let normalized = normalize_street(&cleaned);
    let segments = split_segments(&cleaned, &normalized);

    let found = repeated_segment(&segments)
        .or_else(|| repeated_fragment(&NUMBERED_FRAGMENT, &normalized))
        .or_else(|| repeated_fragment(&TYPED_FRAGMENT, &normalized))
        .or_else(|| repeated_city(raw, &segments, &normalized))
        .or_else(|| repeated_unit(&normalized));

    if let Some(component) = &found {
        debug!(address = raw, ?component, "address carries duplicated components");
    }
    found
}

fn split_segments(cleaned: &str, normalized: &str) -> Vec<String> {
    if cleaned.contains(',') {
        return normalized
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect();
    }

    match STREET_TYPE_BREAK.captures(normalized) {
        Some(caps) => match (caps.get(1), caps.get(2)) {
            (Some(street), Some(rest)) => vec![
                street.as_str().trim().to_string(),
                rest.as_str().trim().to_string(),
            ],
            _ => vec![normalized.to_string()],
        },
        None => vec![normalized.to_string()],
    }
}

fn repeated_segment(segments: &[String]) -> Option<DuplicateComponent> {
    let comparable: Vec<&String> = segments
        .iter()
        .filter(|segment| segment.chars().count() >= MIN_COMPARABLE_LEN)
        .collect();

    for (index, segment) in comparable.iter().enumerate() {
        for earlier in &comparable[..index] {
            if segment == earlier || similarity(segment, earlier) > SEGMENT_SIMILARITY {
                return Some(DuplicateComponent::Segment {
                    first: (*earlier).clone(),
                    second: (*segment).clone(),
                });
            }
        }
    }
    None
}

fn repeated_fragment(pattern: &Regex, normalized: &str) -> Option<DuplicateComponent> {
    let fragments: Vec<&str> = pattern
        .captures_iter(normalized)
        .filter_map(|caps| caps.get(1).map(|fragment| fragment.as_str().trim()))
        .collect();

    for (index, fragment) in fragments.iter().enumerate() {
        for other in &fragments[index + 1..] {
            if similarity(fragment, other) > FRAGMENT_SIMILARITY {
                return Some(DuplicateComponent::StreetFragment {
                    first: fragment.to_string(),
                    second: other.to_string(),
                });
            }
        }
    }
    None
}

fn repeated_city(raw: &str, segments: &[String], normalized: &str) -> Option<DuplicateComponent> {
    let city = extract_city(raw).filter(|city| city.chars().count() >= MIN_COMPARABLE_LEN)?;
    let city_key = normalize_for_fuzzy(&city);
    if city_key.is_empty() {
        return None;
    }

    let mut occurrences = segments
        .iter()
        .filter(|segment| {
            let segment_key = normalize_for_fuzzy(segment);
            if segment_key.is_empty() {
                return false;
            }
            segment_key.contains(&city_key)
                || (segment_key.len() >= MIN_COMPARABLE_LEN && city_key.contains(&segment_key))
                || similarity(&segment_key, &city_key) > CITY_SIMILARITY
        })
        .count();

    if occurrences < 2 {
        if let Ok(literal) = Regex::new(&format!("(?i){}", regex::escape(&city))) {
            occurrences = occurrences.max(literal.find_iter(normalized).count());
        }
    }

    (occurrences >= 2).then_some(DuplicateComponent::City { city, occurrences })
}

fn repeated_unit(normalized: &str) -> Option<DuplicateComponent> {
    let mut seen = HashSet::new();
    UNIT_TOKEN
        .captures_iter(normalized)
        .filter_map(|caps| caps.get(1).map(|unit| unit.as_str().to_lowercase()))
        .find(|unit| !seen.insert(unit.clone()))
        .map(DuplicateComponent::Unit)
}

/// Best-guess city: the last comma segment that is not a state code, zip, or street line.
pub fn extract_city(raw: &str) -> Option<String> {
    let cleaned = clean_address(raw);
    cleaned
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .rev()
        .find(|part| {
            part.chars().count() != 2
                && !part.chars().any(|c| c.is_ascii_digit())
                && !CITY_STREET_TYPE.is_match(part)
        })
        .map(str::to_lowercase)
}
