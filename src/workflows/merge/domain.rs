use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static STREET_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+\s+[a-z]+\s+(?:st|ave|blvd|dr|rd|ln|ct|cir|trl|way|pl)\b")
        .expect("street line pattern compiles")
});

/// One side of a candidate duplicate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const fn label(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    pub const fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A value held once per side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sided<T> {
    pub left: T,
    pub right: T,
}

impl<T> Sided<T> {
    pub fn new(left: T, right: T) -> Self {
        Self { left, right }
    }

    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> Sided<U> {
        Sided {
            left: f(&self.left),
            right: f(&self.right),
        }
    }
}

impl Sided<bool> {
    /// The side holding the flag when exactly one side does.
    pub fn sole(&self) -> Option<Side> {
        match (self.left, self.right) {
            (true, false) => Some(Side::Left),
            (false, true) => Some(Side::Right),
            _ => None,
        }
    }
}

/// Field category inferred from a row's label. Attribute rows and addresses are
/// also recognized from their values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    FirstName,
    LastName,
    Name,
    DateOfBirth,
    Email,
    EmailActivity,
    Address,
    FirstGeneration,
    IntendedTerm,
    StudentType,
    SchoolId,
    Other,
}

impl FieldKind {
    pub fn infer(label: &str, left: &str, right: &str) -> Self {
        let label_lower = label.to_lowercase();
        let has = |needle: &str| label_lower.contains(needle);

        if has("email open")
            || [left, right]
                .iter()
                .any(|value| value.to_lowercase().contains("email open"))
        {
            return FieldKind::EmailActivity;
        }
        if has("email") {
            return FieldKind::Email;
        }
        if has("first name") {
            return FieldKind::FirstName;
        }
        if has("last name") {
            return FieldKind::LastName;
        }
        if has("date of birth") || has("birth date") {
            return FieldKind::DateOfBirth;
        }

        let row_lower = format!("{label} {left} {right}").to_lowercase();
        let mentions = |needle: &str| row_lower.contains(needle);
        if mentions("first generation student") {
            return FieldKind::FirstGeneration;
        }
        if mentions("intended term") {
            return FieldKind::IntendedTerm;
        }
        if mentions("student type") {
            return FieldKind::StudentType;
        }
        if [label, left, right]
            .iter()
            .any(|part| part.contains("School Id:"))
        {
            return FieldKind::SchoolId;
        }
        if has("address") || looks_like_address_row(label, left, right) {
            return FieldKind::Address;
        }
        if has("name") {
            return FieldKind::Name;
        }

        FieldKind::Other
    }
}

fn looks_like_address_row(label: &str, left: &str, right: &str) -> bool {
    let parts = [label, left, right];
    let home_marker = parts.iter().any(|part| part.contains("Home,"));
    if !home_marker && parts.iter().any(|part| part.contains('@')) {
        return false;
    }

    home_marker || parts.iter().any(|part| STREET_LINE.is_match(part))
}

fn default_conflicting() -> bool {
    true
}

/// Left/right values of one attribute in a record-pair comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPair {
    pub label: String,
    pub left: String,
    pub right: String,
    /// Whether the record view flagged this row as a conflict.
    #[serde(default = "default_conflicting")]
    pub conflicting: bool,
}

impl FieldPair {
    pub fn new(label: impl Into<String>, left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            left: left.into(),
            right: right.into(),
            conflicting: true,
        }
    }

    pub fn with_conflicting(mut self, conflicting: bool) -> Self {
        self.conflicting = conflicting;
        self
    }

    pub fn kind(&self) -> FieldKind {
        FieldKind::infer(&self.label, &self.left, &self.right)
    }

    pub fn value(&self, side: Side) -> &str {
        match side {
            Side::Left => self.left.trim(),
            Side::Right => self.right.trim(),
        }
    }

    pub fn values(&self) -> Sided<&str> {
        Sided::new(self.left.trim(), self.right.trim())
    }

    /// Whole-row text: label followed by both values.
    pub fn text(&self) -> String {
        format!("{} {} {}", self.label, self.left.trim(), self.right.trim())
    }

    /// Case-sensitive search across the label and both values.
    pub fn contains(&self, needle: &str) -> bool {
        self.label.contains(needle) || self.left.contains(needle) || self.right.contains(needle)
    }

    /// Case-insensitive search across the label and both values.
    pub fn mentions(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        [&self.label, &self.left, &self.right]
            .iter()
            .any(|part| part.to_lowercase().contains(&needle))
    }
}

/// Everything the record view knows about one candidate duplicate pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    pub fields: Vec<FieldPair>,
    /// Chips attached to the record, e.g. "Ignored".
    #[serde(default)]
    pub tags: Vec<String>,
    /// Side the operator already chose for the email field, if any.
    #[serde(default)]
    pub selected_email_side: Option<Side>,
}

impl RecordSnapshot {
    pub fn new(fields: Vec<FieldPair>) -> Self {
        Self {
            fields,
            tags: Vec::new(),
            selected_email_side: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_selected_email_side(mut self, side: Option<Side>) -> Self {
        self.selected_email_side = side;
        self
    }

    pub fn conflicting(&self) -> impl Iterator<Item = &FieldPair> {
        self.fields.iter().filter(|pair| pair.conflicting)
    }

    /// Last field of the given kind, matching how later rows override earlier ones.
    pub fn last_of_kind(&self, kind: FieldKind) -> Option<&FieldPair> {
        self.fields.iter().rev().find(|pair| pair.kind() == kind)
    }
}

/// Why a field was left for manual review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeferReason {
    NoRuleMatched,
    AttributeMissing,
    AwaitingEmailSelection,
    DualPersonalEmailUndecided,
    AddressesDiffer,
}

impl DeferReason {
    pub const fn summary(self) -> &'static str {
        match self {
            DeferReason::NoRuleMatched => "no resolution rule matched",
            DeferReason::AttributeMissing => "neither side carries the preferred attribute",
            DeferReason::AwaitingEmailSelection => {
                "both sides carry the attribute and no email side is selected"
            }
            DeferReason::DualPersonalEmailUndecided => {
                "both emails are personal and no tie-breaker discriminated"
            }
            DeferReason::AddressesDiffer => {
                "addresses differ and no email side is selected"
            }
        }
    }
}

/// Outcome for a single conflicting field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum FieldDecision {
    Left,
    Right,
    Neither,
    Defer(DeferReason),
}

impl FieldDecision {
    pub fn side(&self) -> Option<Side> {
        match self {
            FieldDecision::Left => Some(Side::Left),
            FieldDecision::Right => Some(Side::Right),
            FieldDecision::Neither | FieldDecision::Defer(_) => None,
        }
    }

    pub fn is_decided(&self) -> bool {
        self.side().is_some()
    }

    pub fn summary(&self) -> String {
        match self {
            FieldDecision::Left => "keep left".to_string(),
            FieldDecision::Right => "keep right".to_string(),
            FieldDecision::Neither => "neither value is usable".to_string(),
            FieldDecision::Defer(reason) => format!("manual review: {}", reason.summary()),
        }
    }
}

impl From<Side> for FieldDecision {
    fn from(side: Side) -> Self {
        match side {
            Side::Left => FieldDecision::Left,
            Side::Right => FieldDecision::Right,
        }
    }
}
