use crate::workflows::merge::applicant::ApplicantSide;
use crate::workflows::merge::domain::{FieldPair, RecordSnapshot, Side};
use crate::workflows::merge::resolution::ResolutionContext;
use crate::workflows::merge::review::{MergeAdvisor, MergeConfig};

pub(super) fn pair(label: &str, left: &str, right: &str) -> FieldPair {
    FieldPair::new(label, left, right)
}

pub(super) fn settled(label: &str, value: &str) -> FieldPair {
    FieldPair::new(label, value, value).with_conflicting(false)
}

/// Ordinary undergraduate pair: matching names, one dated application on the right.
pub(super) fn undergrad_snapshot() -> RecordSnapshot {
    RecordSnapshot::new(vec![
        settled("First Name", "Maria"),
        settled("Last Name", "Lopez"),
        settled("Date of Birth", "Feb 14, 2006"),
        pair("Email", "mlopez@csusb.edu", "maria.lopez@gmail.com"),
        pair(
            "Applications",
            "",
            "Cal State Apply Application updated at Apr 17, 2025 - 1:49 PM",
        ),
        pair(
            "Address",
            "1234 Main St, San Bernardino, CA 92407",
            "1234 Main Street San Bernardino CA",
        ),
        pair("Phone", "909-555-0100", "909-555-0199"),
    ])
}

pub(super) fn graduate_snapshot() -> RecordSnapshot {
    RecordSnapshot::new(vec![
        settled("First Name", "Devon"),
        settled("Last Name", "Park"),
        pair("Workflows", "GRAD_Fall_Inquiry", ""),
    ])
}

pub(super) fn advisor() -> MergeAdvisor {
    MergeAdvisor::new(MergeConfig::default())
}

pub(super) fn context_for(applicant: ApplicantSide, email_side: Option<Side>) -> ResolutionContext {
    ResolutionContext::default()
        .with_applicant_side(applicant)
        .with_selected_email_side(email_side)
}
