//! Gate deciding whether a pair of records may be merged at all.

mod department;
mod markers;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use department::{
    detect_actual_department, wrong_department, AllowedDepartment, Department, ParseDepartmentError,
};

use super::domain::{FieldKind, FieldPair, RecordSnapshot, Side};
use markers::{DENIED_FULL_NAMES, IGNORED_TAG, SCHOOL_ID, TEST_NAME_MARKER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForbiddenReason {
    TestFirstName(Side),
    TestLastName(Side),
    DeniedName(Side),
}

impl ForbiddenReason {
    pub fn summary(&self) -> String {
        match self {
            ForbiddenReason::TestFirstName(side) => format!("{side} first name marks a test record"),
            ForbiddenReason::TestLastName(side) => format!("{side} last name marks a test record"),
            ForbiddenReason::DeniedName(side) => format!("{side} full name is on the deny list"),
        }
    }
}

/// Whether the pair may be merged, and why not when it may not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum EligibilityVerdict {
    Forbidden { reason: ForbiddenReason },
    WrongDepartment { department: Department },
    StudentIdMismatch { left_id: String, right_id: String },
    Ignored,
    Eligible,
}

impl EligibilityVerdict {
    pub fn blocks(&self) -> bool {
        !matches!(self, EligibilityVerdict::Eligible)
    }

    pub fn summary(&self) -> String {
        match self {
            EligibilityVerdict::Forbidden { reason } => format!("forbidden: {}", reason.summary()),
            EligibilityVerdict::WrongDepartment { department } => {
                format!("wrong department: {}", department.reason_code())
            }
            EligibilityVerdict::StudentIdMismatch { left_id, right_id } => {
                format!("student ids differ: {left_id} vs {right_id}")
            }
            EligibilityVerdict::Ignored => "record is tagged as ignored".to_string(),
            EligibilityVerdict::Eligible => "eligible for merge".to_string(),
        }
    }
}

/// Ledger bucket for a record pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordCategory {
    Forbidden,
    Ignored,
    Department(Department),
}

impl fmt::Display for RecordCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordCategory::Forbidden => f.write_str("Forbidden"),
            RecordCategory::Ignored => f.write_str("Ignored"),
            RecordCategory::Department(department) => f.write_str(department.label()),
        }
    }
}

/// Applies the eligibility checks in priority order.
#[derive(Debug, Clone, Copy, Default)]
pub struct EligibilityClassifier {
    allowed: AllowedDepartment,
}

impl EligibilityClassifier {
    pub fn new(allowed: AllowedDepartment) -> Self {
        Self { allowed }
    }

    pub fn allowed(&self) -> AllowedDepartment {
        self.allowed
    }

    pub fn classify(&self, snapshot: &RecordSnapshot) -> EligibilityVerdict {
        let verdict = self.evaluate(snapshot);
        if verdict.blocks() {
            info!(
                allowed = %self.allowed,
                verdict = %verdict.summary(),
                "merge blocked"
            );
        } else {
            debug!(allowed = %self.allowed, "merge eligible");
        }
        verdict
    }

    fn evaluate(&self, snapshot: &RecordSnapshot) -> EligibilityVerdict {
        if let Some(reason) = forbidden_entry(snapshot) {
            return EligibilityVerdict::Forbidden { reason };
        }
        if let Some(department) = wrong_department(&snapshot.fields, self.allowed) {
            return EligibilityVerdict::WrongDepartment { department };
        }
        if let Some((left_id, right_id)) = student_id_mismatch(&snapshot.fields) {
            return EligibilityVerdict::StudentIdMismatch { left_id, right_id };
        }
        if is_ignored(&snapshot.tags) {
            return EligibilityVerdict::Ignored;
        }
        EligibilityVerdict::Eligible
    }
}

/// Test records and deny-listed people. The last name row of each kind wins.
pub fn forbidden_entry(snapshot: &RecordSnapshot) -> Option<ForbiddenReason> {
    let first = snapshot.last_of_kind(FieldKind::FirstName);
    let last = snapshot.last_of_kind(FieldKind::LastName);

    for side in [Side::Left, Side::Right] {
        let first_name = first.map(|pair| pair.value(side)).unwrap_or_default();
        let last_name = last.map(|pair| pair.value(side)).unwrap_or_default();

        if first_name.to_lowercase().contains(TEST_NAME_MARKER) {
            return Some(ForbiddenReason::TestFirstName(side));
        }
        if last_name.to_lowercase().contains(TEST_NAME_MARKER) {
            return Some(ForbiddenReason::TestLastName(side));
        }
    }

    for side in [Side::Left, Side::Right] {
        let first_name = first.map(|pair| pair.value(side)).unwrap_or_default();
        let last_name = last.map(|pair| pair.value(side)).unwrap_or_default();
        let full_name = format!("{first_name} {last_name}").trim().to_lowercase();
        if DENIED_FULL_NAMES.iter().any(|denied| *denied == full_name) {
            return Some(ForbiddenReason::DeniedName(side));
        }
    }

    None
}

/// Differing school ids on the first row that carries them on both sides.
pub fn student_id_mismatch(fields: &[FieldPair]) -> Option<(String, String)> {
    fields
        .iter()
        .filter(|pair| pair.kind() == FieldKind::SchoolId)
        .find_map(|pair| {
            let ids = pair.values().map(|value| {
                SCHOOL_ID
                    .captures(value)
                    .and_then(|caps| caps.get(1))
                    .map(|id| id.as_str().to_string())
            });
            match (ids.left, ids.right) {
                (Some(left), Some(right)) if left != right => Some((left, right)),
                _ => None,
            }
        })
}

pub fn is_ignored(tags: &[String]) -> bool {
    tags.iter()
        .any(|tag| tag.trim().eq_ignore_ascii_case(IGNORED_TAG))
}

/// Ledger category: Forbidden, then Ignored, then the detected department.
pub fn record_category(snapshot: &RecordSnapshot) -> RecordCategory {
    if forbidden_entry(snapshot).is_some() {
        RecordCategory::Forbidden
    } else if is_ignored(&snapshot.tags) {
        RecordCategory::Ignored
    } else {
        RecordCategory::Department(detect_actual_department(&snapshot.fields))
    }
}
