//! Marker vocabularies read off workflow, program, and milestone rows.

use std::sync::LazyLock;

use regex::Regex;

use super::super::domain::FieldPair;

/// Names containing this (case-insensitive) belong to test records.
pub(crate) const TEST_NAME_MARKER: &str = "test";

/// Full names of records that must never be merged automatically.
pub(crate) const DENIED_FULL_NAMES: [&str; 3] = [
    "angela armstrong",
    "gillespie armstrong",
    "mariah armstrong",
];

/// Rows carrying any of these describe workflow or application membership.
pub(crate) const DEPARTMENT_ROW_MARKERS: [&str; 6] = [
    "Workflows",
    "Application",
    "Program",
    "type:",
    "status:",
    "Outreach_",
];

pub(crate) const GRAD_MARKER: &str = "GRAD_";
pub(crate) const IA_MARKERS: [&str; 3] = ["IA_", "_IA_", "_IA "];
pub(crate) const OUTREACH_MARKER: &str = "Outreach_";
pub(crate) const UNDERGRAD_OUTREACH_QUALIFIER: &str = "UGRD";

pub(crate) const IGNORED_TAG: &str = "ignored";

static GRAD_STUDENT_PHRASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)grad student").expect("grad phrase pattern compiles"));

pub(crate) static SCHOOL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)School Id:\s*(\d+)").expect("school id pattern compiles"));

pub(crate) fn is_department_row(pair: &FieldPair) -> bool {
    DEPARTMENT_ROW_MARKERS
        .iter()
        .any(|marker| pair.contains(marker))
}

pub(crate) fn has_grad_marker(pair: &FieldPair) -> bool {
    pair.contains(GRAD_MARKER) || GRAD_STUDENT_PHRASE.is_match(&pair.text())
}

pub(crate) fn has_ia_marker(pair: &FieldPair) -> bool {
    IA_MARKERS.iter().any(|marker| pair.contains(marker))
}

/// Outreach rows that are not tagged for undergraduate recruitment.
pub(crate) fn has_non_undergrad_outreach(pair: &FieldPair) -> bool {
    pair.contains(OUTREACH_MARKER) && !pair.contains(UNDERGRAD_OUTREACH_QUALIFIER)
}
