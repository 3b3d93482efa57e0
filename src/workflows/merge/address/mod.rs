//! Free-text address comparison: cleaning, parsing, corruption detection, and
//! completeness scoring for the two sides of an address conflict.

mod duplicates;
mod normalizer;
mod parser;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use duplicates::{extract_city, find_duplicate_component, has_duplicate_components, DuplicateComponent};
pub use normalizer::{clean_address, has_country, normalize_for_fuzzy, normalize_street, similarity};
pub use parser::{extract_unit, has_unit_info, parse_address, ParsedAddress};

use super::domain::Side;

const COMPONENT_POINTS: i32 = 10;
const STREET_TYPE_POINTS: i32 = 5;
const UNIT_POINTS: i32 = 15;
const DIRECTION_POINTS: i32 = 3;
const COUNTRY_POINTS: i32 = 5;
const DUPLICATE_PENALTY: i32 = 100;
const MISPLACED_NUMBER_PENALTY: i32 = 20;

static MISPLACED_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s\d{4,5}\s*,").expect("misplaced number pattern compiles"));

static LEADING_STREET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+[a-z]?)\s+(.+?)(?:\s*,|\s+\d{5}|\s+[a-z]{2}\s+\d{5}|$)")
        .expect("leading street pattern compiles")
});

/// Which address to keep after comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressWinner {
    Left,
    Right,
    /// Both sides are corrupted.
    Neither,
    /// Different places; no automatic preference.
    Tie,
}

impl AddressWinner {
    pub fn side(self) -> Option<Side> {
        match self {
            AddressWinner::Left => Some(Side::Left),
            AddressWinner::Right => Some(Side::Right),
            AddressWinner::Neither | AddressWinner::Tie => None,
        }
    }
}

impl fmt::Display for AddressWinner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AddressWinner::Left => "left",
            AddressWinner::Right => "right",
            AddressWinner::Neither => "neither",
            AddressWinner::Tie => "tie",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressComparison {
    pub are_same: bool,
    pub winner: AddressWinner,
    pub reason: String,
    pub left_score: i32,
    pub right_score: i32,
}

/// Decides which of two address strings should survive a merge.
pub fn compare_addresses(left_raw: &str, right_raw: &str) -> AddressComparison {
    let left = parse_address(left_raw);
    let right = parse_address(right_raw);
    let left_score = completeness_score(&left);
    let right_score = completeness_score(&right);
    let left_corrupted = has_duplicate_components(left_raw);
    let right_corrupted = has_duplicate_components(right_raw);
    // A corrupted address never names the same place as a clean one.
    let are_same = left_corrupted == right_corrupted && same_location(&left, &right);

    let (winner, reason) = match (left_corrupted, right_corrupted) {
        (true, true) => (AddressWinner::Neither, "Both have duplicates".to_string()),
        (true, false) => (AddressWinner::Right, "Left has duplicates".to_string()),
        (false, true) => (AddressWinner::Left, "Right has duplicates".to_string()),
        (false, false) if are_same => {
            if right_score > left_score {
                (
                    AddressWinner::Right,
                    format!("Same location, right more complete ({right_score} vs {left_score})"),
                )
            } else {
                (
                    AddressWinner::Left,
                    format!("Same location, left at least as complete ({left_score} vs {right_score})"),
                )
            }
        }
        (false, false) => (AddressWinner::Tie, "Different addresses".to_string()),
    };

    debug!(
        left = left_raw,
        right = right_raw,
        are_same,
        %winner,
        left_score,
        right_score,
        "compared addresses"
    );

    AddressComparison {
        are_same,
        winner,
        reason,
        left_score,
        right_score,
    }
}

/// Points for each recognized component, minus penalties for corruption.
pub fn completeness_score(parsed: &ParsedAddress) -> i32 {
    let present = |component: &Option<String>| component.as_deref().is_some_and(|v| !v.is_empty());
    let mut score = 0;

    for component in [
        &parsed.number,
        &parsed.street,
        &parsed.city,
        &parsed.state,
        &parsed.zip,
    ] {
        if present(component) {
            score += COMPONENT_POINTS;
        }
    }
    if present(&parsed.street_type) {
        score += STREET_TYPE_POINTS;
    }
    if present(&parsed.unit) || has_unit_info(&parsed.raw_original) {
        score += UNIT_POINTS;
    }
    if present(&parsed.prefix) {
        score += DIRECTION_POINTS;
    }
    if present(&parsed.suffix) {
        score += DIRECTION_POINTS;
    }
    if parsed.has_country {
        score += COUNTRY_POINTS;
    }
    if has_duplicate_components(&parsed.raw_original) {
        score -= DUPLICATE_PENALTY;
    }
    if !present(&parsed.number) && MISPLACED_NUMBER.is_match(&parsed.raw_original) {
        score -= MISPLACED_NUMBER_PENALTY;
    }

    score
}

/// House number and normalized street name, joined with `|`.
pub fn comparison_key(parsed: &ParsedAddress) -> String {
    let number = parsed.number.as_deref().map(str::to_lowercase);
    let street = parsed.street.as_deref().map(normalize_street);

    [number, street]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("|")
}

fn same_location(left: &ParsedAddress, right: &ParsedAddress) -> bool {
    let left_key = comparison_key(left);
    if !left_key.is_empty() && left_key == comparison_key(right) {
        return true;
    }

    let left_fallback = leading_street_key(&left.cleaned_text);
    let right_fallback = leading_street_key(&right.cleaned_text);
    matches!(
        (left_fallback, right_fallback),
        (Some(l), Some(r)) if l == r && l.len() >= 4
    )
}

fn leading_street_key(cleaned: &str) -> Option<String> {
    let normalized = normalize_street(cleaned);
    let caps = LEADING_STREET.captures(&normalized)?;
    let key: String = format!("{} {}", &caps[1], &caps[2])
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();

    (!key.is_empty()).then_some(key)
}

#[cfg(test)]
pub(crate) fn leading_street_key_for_tests(cleaned: &str) -> Option<String> {
    leading_street_key(cleaned)
}
