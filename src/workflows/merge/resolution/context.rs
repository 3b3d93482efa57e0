use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::super::applicant::ApplicantSide;
use super::super::domain::{FieldKind, RecordSnapshot, Side, Sided};
use super::super::signals::birth_year;

static EMAIL_OPENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*email opens?").expect("email opens pattern compiles"));

/// What the record view says about one side's person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownIdentity {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Raw four-digit year; may be a placeholder.
    pub birth_year: Option<String>,
}

/// Record-wide facts consulted while resolving individual fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionContext {
    pub applicant_side: ApplicantSide,
    pub selected_email_side: Option<Side>,
    pub known: Sided<KnownIdentity>,
    pub email_opens: Sided<u32>,
}

impl ResolutionContext {
    /// Collects names, birth years, and email engagement from every row, conflicting or not.
    pub fn from_snapshot(snapshot: &RecordSnapshot, applicant_side: ApplicantSide) -> Self {
        let mut known: Sided<KnownIdentity> = Sided::default();
        let mut email_opens: Sided<u32> = Sided::default();

        for pair in &snapshot.fields {
            match pair.kind() {
                FieldKind::FirstName => {
                    known.left.first_name = non_empty_lower(pair.value(Side::Left));
                    known.right.first_name = non_empty_lower(pair.value(Side::Right));
                }
                FieldKind::LastName => {
                    known.left.last_name = non_empty_lower(pair.value(Side::Left));
                    known.right.last_name = non_empty_lower(pair.value(Side::Right));
                }
                FieldKind::DateOfBirth => {
                    known.left.birth_year = birth_year(pair.value(Side::Left)).map(str::to_string);
                    known.right.birth_year = birth_year(pair.value(Side::Right)).map(str::to_string);
                }
                FieldKind::EmailActivity => {
                    if let Some(opens) = email_open_count(pair.value(Side::Left)) {
                        email_opens.left = opens;
                    }
                    if let Some(opens) = email_open_count(pair.value(Side::Right)) {
                        email_opens.right = opens;
                    }
                }
                _ => {}
            }
        }

        Self {
            applicant_side,
            selected_email_side: snapshot.selected_email_side,
            known,
            email_opens,
        }
    }

    pub fn with_selected_email_side(mut self, side: Option<Side>) -> Self {
        self.selected_email_side = side;
        self
    }

    pub fn with_applicant_side(mut self, side: ApplicantSide) -> Self {
        self.applicant_side = side;
        self
    }
}

fn non_empty_lower(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_lowercase())
}

fn email_open_count(value: &str) -> Option<u32> {
    EMAIL_OPENS
        .captures(value)
        .and_then(|caps| caps[1].parse().ok())
}
