use std::sync::LazyLock;

use regex::Regex;

/// Country spellings stripped from the end of an address, longest first.
pub(crate) const COUNTRY_VARIATIONS: [&str; 6] = [
    "united states of america",
    "united states",
    "usa",
    "us",
    "u.s.a.",
    "u.s.",
];

const DIRECTION_ABBREVIATIONS: [(&str, &str); 8] = [
    ("north", "n"),
    ("south", "s"),
    ("east", "e"),
    ("west", "w"),
    ("northeast", "ne"),
    ("northwest", "nw"),
    ("southeast", "se"),
    ("southwest", "sw"),
];

const STREET_TYPE_ABBREVIATIONS: [(&str, &str); 14] = [
    ("street", "st"),
    ("avenue", "ave"),
    ("boulevard", "blvd"),
    ("drive", "dr"),
    ("road", "rd"),
    ("lane", "ln"),
    ("court", "ct"),
    ("circle", "cir"),
    ("trail", "trl"),
    ("way", "way"),
    ("place", "pl"),
    ("parkway", "pkwy"),
    ("highway", "hwy"),
    ("terrace", "ter"),
];

/// Abbreviated street types as they appear after normalization.
pub(crate) const STREET_TYPE_TOKENS: &str = "st|ave|blvd|dr|rd|ln|ct|cir|trl|way|pl|pkwy|hwy|ter";

/// Street types in both abbreviated and spelled-out form.
pub(crate) const STREET_TYPE_WORDS: &str = "st|street|ave|avenue|blvd|boulevard|dr|drive|rd|road|ln|lane|ct|court|cir|circle|trl|trail|way|pl|place|pkwy|parkway|hwy|highway|ter|terrace";

static HOME_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Home,\s*").expect("home prefix pattern compiles"));
static EDGE_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[,\s]+|[,\s]+$").expect("edge separator pattern compiles"));
static TRAILING_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,\s]+$").expect("trailing separator pattern compiles"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern compiles"));
static COMMA_SPACING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*,\s*").expect("comma spacing pattern compiles"));
static DOUBLED_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*,").expect("doubled comma pattern compiles"));
static PERIOD_SPACING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\.\s*").expect("period spacing pattern compiles"));

static COUNTRY_SUFFIXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    COUNTRY_VARIATIONS
        .iter()
        .map(|country| {
            Regex::new(&format!(r"(?i),?\s*\b{}\s*,?\s*$", regex::escape(country)))
                .expect("country suffix pattern compiles")
        })
        .collect()
});

static COUNTRY_MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:^|[^a-z0-9.])(?:united states of america|united states|usa|u\.s\.a\.|u\.s\.|us)(?:[^a-z0-9]|$)",
    )
    .expect("country mention pattern compiles")
});

static STREET_SUBSTITUTIONS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    DIRECTION_ABBREVIATIONS
        .iter()
        .chain(STREET_TYPE_ABBREVIATIONS.iter())
        .map(|(word, abbreviation)| {
            let pattern = Regex::new(&format!(r"\b{word}\b")).expect("street word pattern compiles");
            (pattern, *abbreviation)
        })
        .collect()
});

/// Tidies a raw address line: drops the "Home," prefix and any trailing country,
/// then canonicalizes whitespace, comma and period spacing.
pub fn clean_address(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let mut cleaned = HOME_PREFIX.replace(trimmed, "").into_owned();
    cleaned = EDGE_SEPARATORS.replace_all(&cleaned, "").into_owned();
    for suffix in COUNTRY_SUFFIXES.iter() {
        cleaned = suffix.replace(&cleaned, "").into_owned();
    }
    cleaned = WHITESPACE_RUN.replace_all(&cleaned, " ").into_owned();
    cleaned = COMMA_SPACING.replace_all(&cleaned, ", ").into_owned();
    cleaned = DOUBLED_COMMA.replace_all(&cleaned, ",").into_owned();
    cleaned = PERIOD_SPACING.replace_all(&cleaned, ". ").into_owned();

    TRAILING_SEPARATORS
        .replace(cleaned.trim(), "")
        .into_owned()
}

/// Lower-cases a street and abbreviates whole-word directions and street types.
pub fn normalize_street(street: &str) -> String {
    let mut normalized = street.trim().to_lowercase();
    for (pattern, abbreviation) in STREET_SUBSTITUTIONS.iter() {
        normalized = pattern.replace_all(&normalized, *abbreviation).into_owned();
    }

    normalized
        .replace('.', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lower-case ASCII letters and digits only.
pub fn normalize_for_fuzzy(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Edit-distance similarity in [0, 1] over the fuzzy-normalized forms.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize_for_fuzzy(a);
    let b = normalize_for_fuzzy(b);
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let longest = a.len().max(b.len()) as f64;
    1.0 - strsim::levenshtein(&a, &b) as f64 / longest
}

pub fn has_country(raw: &str) -> bool {
    COUNTRY_MENTION.is_match(raw)
}
