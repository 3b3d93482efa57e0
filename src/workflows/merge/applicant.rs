use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{FieldPair, Side, Sided};
use super::signals::parse_activity_timestamp;

/// Text carried by the primary application row.
pub const PRIMARY_APPLICATION_MARKER: &str = "Cal State Apply Application";

static MILESTONE_EVENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)type:\s*(?:Application Start|Application Submit|Application Complete|Admit)")
        .expect("milestone event pattern compiles")
});

static MILESTONE_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)type:\s*(?:Application|Admit)").expect("milestone entry pattern compiles")
});

/// Side holding the applicant's record, or `None` when no evidence exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicantSide {
    Left,
    Right,
    #[default]
    None,
}

impl ApplicantSide {
    pub fn side(self) -> Option<Side> {
        match self {
            ApplicantSide::Left => Some(Side::Left),
            ApplicantSide::Right => Some(Side::Right),
            ApplicantSide::None => None,
        }
    }
}

impl From<Side> for ApplicantSide {
    fn from(side: Side) -> Self {
        match side {
            Side::Left => ApplicantSide::Left,
            Side::Right => ApplicantSide::Right,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantSideHint {
    pub side: ApplicantSide,
    /// Evidence that decided the side.
    pub basis: String,
}

impl ApplicantSideHint {
    pub fn none() -> Self {
        Self {
            side: ApplicantSide::None,
            basis: "no application evidence".to_string(),
        }
    }

    fn found(side: Side, basis: impl Into<String>) -> Self {
        Self {
            side: side.into(),
            basis: basis.into(),
        }
    }
}

/// Finds the side with application evidence. A primary application row anywhere in
/// the record outranks milestone rows.
pub fn detect_applicant_side(fields: &[FieldPair]) -> ApplicantSideHint {
    let hint = fields
        .iter()
        .find_map(primary_application_side)
        .or_else(|| fields.iter().find_map(milestone_side))
        .unwrap_or_else(ApplicantSideHint::none);

    debug!(side = ?hint.side, basis = %hint.basis, "detected applicant side");
    hint
}

fn primary_application_side(pair: &FieldPair) -> Option<ApplicantSideHint> {
    let values = pair.values();
    let present = values.map(|value| value.contains(PRIMARY_APPLICATION_MARKER));

    if let Some(side) = present.sole() {
        return Some(ApplicantSideHint::found(side, "only side with a primary application"));
    }
    if !present.left {
        return None;
    }

    let stamps = values.map(|value| parse_activity_timestamp(value));
    let hint = match (stamps.left, stamps.right) {
        (Some(left), Some(right)) if left >= right => {
            ApplicantSideHint::found(Side::Left, "more recent primary application")
        }
        (Some(_), Some(_)) => ApplicantSideHint::found(Side::Right, "more recent primary application"),
        (Some(_), None) => ApplicantSideHint::found(Side::Left, "only dated primary application"),
        (None, Some(_)) => ApplicantSideHint::found(Side::Right, "only dated primary application"),
        (None, None) => ApplicantSideHint::found(Side::Left, "both have undated primary applications"),
    };
    Some(hint)
}

fn milestone_side(pair: &FieldPair) -> Option<ApplicantSideHint> {
    let values = pair.values();
    let present = values.map(|value| MILESTONE_EVENT.is_match(value));

    if let Some(side) = present.sole() {
        return Some(ApplicantSideHint::found(side, "only side with application milestones"));
    }
    if !present.left {
        return None;
    }

    let counts: Sided<usize> = values.map(|value| MILESTONE_ENTRY.find_iter(value).count());
    let hint = match counts.left.cmp(&counts.right) {
        Ordering::Greater => ApplicantSideHint::found(Side::Left, "more application milestones"),
        Ordering::Less => ApplicantSideHint::found(Side::Right, "more application milestones"),
        Ordering::Equal => {
            let stamps = values.map(|value| parse_activity_timestamp(value));
            match (stamps.left, stamps.right) {
                (Some(left), Some(right)) if right > left => {
                    ApplicantSideHint::found(Side::Right, "more recent application milestone")
                }
                (Some(_), Some(_)) => {
                    ApplicantSideHint::found(Side::Left, "application milestone at least as recent")
                }
                _ => ApplicantSideHint::found(Side::Right, "undated milestone tie"),
            }
        }
    };
    Some(hint)
}
