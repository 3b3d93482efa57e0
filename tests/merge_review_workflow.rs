use std::io::Cursor;

use merge_advisor::workflows::merge::{
    AllowedDepartment, DeferReason, EligibilityVerdict, FieldDecision, MergeAdvisor, MergeConfig,
    MergeReadiness, RecordCategory, ResolutionRule, Side,
};
use merge_advisor::workflows::snapshot::{SnapshotFormat, SnapshotImporter};

const UNDERGRAD_PAIR_CSV: &str = "\
Label,Left,Right,Conflicting
First Name,Jordan,Jordan,no
Last Name,RIVERA,Rivera,yes
Date of Birth,\"Jan 1, 0001\",\"Sep 9, 2006\",yes
Email,jrivera@csusb.edu,jordan.rivera@gmail.com,yes
Addresses,\"1234 Main St, San Bernardino, CA 92407\",1234 Main Street San Bernardino CA,yes
Intended Term,Fall 2025 (2258),Fall 2026 (2268),yes
Phone,909-555-0100,909-555-0199,yes
";

fn review_csv(data: &str, config: MergeConfig) -> merge_advisor::workflows::merge::MergeReview {
    let snapshot = SnapshotImporter::from_reader(Cursor::new(data.as_bytes()), SnapshotFormat::Csv)
        .expect("snapshot csv parses");
    MergeAdvisor::new(config).review(&snapshot)
}

#[test]
fn csv_snapshot_runs_the_full_cascade() {
    let review = review_csv(UNDERGRAD_PAIR_CSV, MergeConfig::default());

    assert_eq!(review.verdict, EligibilityVerdict::Eligible);
    assert_eq!(review.category.to_string(), "UnderGrad");
    assert_eq!(review.applicant.side.side(), None);

    let decisions: Vec<(&str, FieldDecision, Option<ResolutionRule>)> = review
        .resolutions
        .iter()
        .map(|resolution| (resolution.label.as_str(), resolution.decision, resolution.rule))
        .collect();

    assert_eq!(
        decisions,
        vec![
            ("Last Name", FieldDecision::Right, Some(ResolutionRule::NameCase)),
            (
                "Date of Birth",
                FieldDecision::Right,
                Some(ResolutionRule::BirthDateValidity)
            ),
            ("Email", FieldDecision::Right, Some(ResolutionRule::PersonalEmail)),
            (
                "Addresses",
                FieldDecision::Left,
                Some(ResolutionRule::AddressComparison)
            ),
            ("Intended Term", FieldDecision::Right, Some(ResolutionRule::IntendedTerm)),
            ("Phone", FieldDecision::Defer(DeferReason::NoRuleMatched), None),
        ]
    );
    assert_eq!(review.readiness, MergeReadiness::NeedsReview);
}

#[test]
fn json_snapshot_with_ignored_tag_is_blocked() {
    let data = r#"{
        "fields": [
            {"label": "First Name", "left": "Ana", "right": "Ana", "conflicting": false},
            {"label": "Email", "left": "ana@csusb.edu", "right": "ana@gmail.com"}
        ],
        "tags": ["Ignored"]
    }"#;

    let snapshot = SnapshotImporter::from_reader(data.as_bytes(), SnapshotFormat::Json)
        .expect("snapshot json parses");
    let review = MergeAdvisor::new(MergeConfig::default()).review(&snapshot);

    assert_eq!(review.verdict, EligibilityVerdict::Ignored);
    assert_eq!(review.category, RecordCategory::Ignored);
    assert_eq!(review.readiness, MergeReadiness::Blocked);
    assert!(review.resolutions.is_empty());
}

#[test]
fn possible_twins_are_flagged_even_when_merge_is_allowed() {
    let data = "\
Label,Left,Right
First Name,Alex,Sam
Last Name,Kim,Kim
Date of Birth,\"Mar 3, 2005\",\"Mar 3, 2005\"
Email,alex.kim@gmail.com,sam.kim@gmail.com
";
    let review = review_csv(
        data,
        MergeConfig {
            allowed_department: AllowedDepartment::All,
            conflict_row_threshold: 1,
        },
    );

    assert_eq!(review.conflicts.count, 1);
    assert_eq!(review.conflicts.conflicts, vec!["First Name".to_string()]);
    assert!(review.twin_warning);

    let email = review
        .resolutions
        .iter()
        .find(|resolution| resolution.label == "Email")
        .expect("email row resolved");
    assert_eq!(
        email.decision,
        FieldDecision::Defer(DeferReason::DualPersonalEmailUndecided)
    );
}

#[test]
fn applicant_evidence_decides_dependent_rows() {
    let data = "\
Label,Left,Right
Applications,Cal State Apply Application updated at Feb 1 2025 - 10:15 AM,
Email,pat@gmail.com,pat@csusb.edu
Program,csusb.major.art,csusb.major.music
";
    let review = review_csv(data, MergeConfig::default());

    assert_eq!(review.applicant.side.side(), Some(Side::Left));
    assert!(review
        .resolutions
        .iter()
        .all(|resolution| resolution.decision == FieldDecision::Left));
    assert_eq!(review.readiness, MergeReadiness::Ready);
}
