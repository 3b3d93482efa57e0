use super::common::*;
use crate::workflows::merge::applicant::ApplicantSide;
use crate::workflows::merge::domain::{DeferReason, FieldDecision, RecordSnapshot, Side};
use crate::workflows::merge::eligibility::{AllowedDepartment, Department, EligibilityVerdict};
use crate::workflows::merge::review::{MergeAdvisor, MergeConfig, MergeReadiness};

#[test]
fn applicant_side_drives_every_field() {
    let review = advisor().review(&undergrad_snapshot());

    assert_eq!(review.verdict, EligibilityVerdict::Eligible);
    assert_eq!(review.applicant.side, ApplicantSide::Right);
    assert_eq!(review.resolutions.len(), 4);
    assert!(review
        .resolutions
        .iter()
        .all(|resolution| resolution.decision == FieldDecision::Right));
    assert_eq!(review.readiness, MergeReadiness::Ready);
    assert!(!review.twin_warning);
}

#[test]
fn resolutions_keep_document_order() {
    let review = advisor().review(&undergrad_snapshot());

    let labels: Vec<&str> = review
        .resolutions
        .iter()
        .map(|resolution| resolution.label.as_str())
        .collect();
    assert_eq!(labels, vec!["Email", "Applications", "Address", "Phone"]);
}

#[test]
fn email_outcome_steers_dependent_fields() {
    let snapshot = RecordSnapshot::new(vec![
        pair("Program", "csusb.major.bio", "csusb.major.chem"),
        pair("Email", "kim@csusb.edu", "kim.lee@gmail.com"),
        pair("Address", "123 Oak Ave", "456 Pine Rd"),
    ]);

    let review = advisor().review(&snapshot);

    let decisions: Vec<FieldDecision> = review
        .resolutions
        .iter()
        .map(|resolution| resolution.decision)
        .collect();
    assert_eq!(
        decisions,
        vec![FieldDecision::Right, FieldDecision::Right, FieldDecision::Right]
    );
    assert_eq!(review.readiness, MergeReadiness::Ready);
}

#[test]
fn inbound_email_selection_is_used_when_email_does_not_decide() {
    let snapshot = RecordSnapshot::new(vec![pair("Address", "123 Oak Ave", "456 Pine Rd")])
        .with_selected_email_side(Some(Side::Left));

    let review = advisor().review(&snapshot);

    assert_eq!(review.resolutions[0].decision, FieldDecision::Left);
}

#[test]
fn undecided_fields_need_review() {
    let snapshot = RecordSnapshot::new(vec![pair("Phone", "909-555-0100", "909-555-0199")]);

    let review = advisor().review(&snapshot);

    assert_eq!(review.readiness, MergeReadiness::NeedsReview);
    let undecided: Vec<_> = review.undecided().collect();
    assert_eq!(undecided.len(), 1);
    assert_eq!(
        undecided[0].decision,
        FieldDecision::Defer(DeferReason::NoRuleMatched)
    );
}

#[test]
fn blocked_pairs_skip_resolution_but_still_count_conflicts() {
    let mut snapshot = graduate_snapshot();
    snapshot.fields.push(pair("Last Name", "Park", "Nguyen"));
    snapshot.fields.push(pair("Date of Birth", "May 1, 1999", "Jun 2, 2001"));

    let review = advisor().review(&snapshot);

    assert_eq!(
        review.verdict,
        EligibilityVerdict::WrongDepartment {
            department: Department::Grad
        }
    );
    assert_eq!(review.readiness, MergeReadiness::Blocked);
    assert!(review.resolutions.is_empty());
    assert_eq!(review.conflicts.count, 2);
    assert!(review.twin_warning);
}

#[test]
fn zero_threshold_disables_twin_warning() {
    let advisor = MergeAdvisor::new(MergeConfig {
        allowed_department: AllowedDepartment::All,
        conflict_row_threshold: 0,
    });
    let snapshot = RecordSnapshot::new(vec![
        pair("First Name", "Ana", "Luz"),
        pair("Last Name", "Ruiz", "Soto"),
    ]);

    let review = advisor.review(&snapshot);

    assert_eq!(review.conflicts.count, 2);
    assert!(!review.twin_warning);
}
