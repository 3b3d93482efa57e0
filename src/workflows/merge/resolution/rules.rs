use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::super::address::{compare_addresses, AddressWinner};
use super::super::domain::{DeferReason, FieldDecision, FieldKind, FieldPair, Sided};
use super::super::signals::{birth_year, is_valid_birth_year};
use super::context::ResolutionContext;
use super::email::{break_personal_tie, is_personal_address};

/// Rule that settled a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionRule {
    ApplicantSide,
    MilestoneType,
    PersonalEmail,
    AttributePresence,
    BirthDateValidity,
    FirstGeneration,
    IntendedTerm,
    NameCase,
    LegacyDefault,
    AddressComparison,
}

pub(crate) type Rule = fn(&FieldPair, &ResolutionContext) -> Option<FieldDecision>;

/// Ordered cascade for every non-address field. First `Some` wins.
pub(crate) const FIELD_CASCADE: [(ResolutionRule, Rule); 9] = [
    (ResolutionRule::ApplicantSide, applicant_side),
    (ResolutionRule::MilestoneType, milestone_type),
    (ResolutionRule::PersonalEmail, personal_email),
    (ResolutionRule::AttributePresence, attribute_presence),
    (ResolutionRule::BirthDateValidity, birth_date_validity),
    (ResolutionRule::FirstGeneration, first_generation),
    (ResolutionRule::IntendedTerm, intended_term),
    (ResolutionRule::NameCase, name_case),
    (ResolutionRule::LegacyDefault, legacy_default),
];

pub(crate) const ADDRESS_CASCADE: [(ResolutionRule, Rule); 2] = [
    (ResolutionRule::ApplicantSide, applicant_side),
    (ResolutionRule::AddressComparison, address_comparison),
];

static MILESTONE_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)type:\s*\w+,\s*\w{3}\s+\d{1,2},\s*\d{4}").expect("milestone row pattern compiles")
});
static MILESTONE_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)type:\s*(\w+),").expect("milestone type pattern compiles"));
static MAJOR_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)csusb\.major\.").expect("major code pattern compiles"));
static SCHOOL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)csusb\.school\.\d+").expect("school code pattern compiles"));
static ENCOURA_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Encoura Id:").expect("encoura pattern compiles"));
static COLLEGE_BOARD_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)College Board Id:").expect("college board pattern compiles"));
static YES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\byes\b").expect("yes pattern compiles"));
static NO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bno\b").expect("no pattern compiles"));
static TERM_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d{4})\)").expect("term code pattern compiles"));
static ADDRESS_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\s+\w+").expect("address-like pattern compiles"));

static LEGACY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)Spark Id:",
        r"(?i)type:\s*Created,\s*name:\s*Record Created",
        r"(?i)type:\s*Custom",
        r"(?i)type:.*name:",
        r"(?i)type:\s*Web",
        r"(?i)\[ACUx\]",
        r"(?i)Outreach_UGRD_",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("legacy pattern compiles"))
    .collect()
});

/// Address rows with usable text on both sides go through the address sub-cascade.
pub(crate) fn is_address_pair(pair: &FieldPair) -> bool {
    if pair.kind() != FieldKind::Address {
        return false;
    }
    let values = pair.values();
    if values.left.is_empty() || values.right.is_empty() {
        return false;
    }
    let looks_like_address =
        |value: &str| value.contains("Home,") || ADDRESS_LIKE.is_match(value);
    looks_like_address(values.left) || looks_like_address(values.right)
}

fn applicant_side(_pair: &FieldPair, context: &ResolutionContext) -> Option<FieldDecision> {
    context.applicant_side.side().map(FieldDecision::from)
}

/// Same milestone type on both sides: keep the left entry.
fn milestone_type(pair: &FieldPair, _context: &ResolutionContext) -> Option<FieldDecision> {
    if !MILESTONE_ROW.is_match(&pair.text()) {
        return None;
    }
    let types = pair.values().map(|value| {
        MILESTONE_TYPE
            .captures(value)
            .map(|caps| caps[1].to_lowercase())
    });
    match (types.left, types.right) {
        (Some(left), Some(right)) if left == right => Some(FieldDecision::Left),
        _ => None,
    }
}

fn personal_email(pair: &FieldPair, context: &ResolutionContext) -> Option<FieldDecision> {
    if !pair.mentions("email") {
        return None;
    }
    let personal = pair.values().map(|value| is_personal_address(value));
    match (personal.left, personal.right) {
        (true, false) => Some(FieldDecision::Left),
        (false, true) => Some(FieldDecision::Right),
        (true, true) => Some(break_personal_tie(pair, context)),
        (false, false) => None,
    }
}

fn attribute_presence(pair: &FieldPair, context: &ResolutionContext) -> Option<FieldDecision> {
    let values = pair.values();
    let text = pair.text();

    if MAJOR_CODE.is_match(&text) {
        let present = values.map(|value| MAJOR_CODE.is_match(value));
        match (present.left, present.right) {
            (true, true) => return Some(follow_email_side(context)),
            (false, false) => {}
            _ => return present.sole().map(FieldDecision::from),
        }
    }

    for id_marker in [&*ENCOURA_ID, &*COLLEGE_BOARD_ID] {
        let present = values.map(|value| id_marker.is_match(value));
        match (present.left, present.right) {
            (true, true) => return Some(FieldDecision::Left),
            (false, false) => {}
            _ => return present.sole().map(FieldDecision::from),
        }
    }

    if pair.kind() == FieldKind::StudentType && SCHOOL_CODE.is_match(&text) {
        let present = values.map(|value| SCHOOL_CODE.is_match(value));
        return Some(match (present.left, present.right) {
            (true, true) => follow_email_side(context),
            (false, false) => FieldDecision::Defer(DeferReason::AttributeMissing),
            _ => present
                .sole()
                .map_or(FieldDecision::Defer(DeferReason::AttributeMissing), FieldDecision::from),
        });
    }

    None
}

fn follow_email_side(context: &ResolutionContext) -> FieldDecision {
    context
        .selected_email_side
        .map_or(FieldDecision::Defer(DeferReason::AwaitingEmailSelection), FieldDecision::from)
}

/// A placeholder birth year loses to a plausible one.
fn birth_date_validity(pair: &FieldPair, _context: &ResolutionContext) -> Option<FieldDecision> {
    if pair.kind() != FieldKind::DateOfBirth
        && !pair.mentions("date of birth")
        && !pair.mentions("birth date")
    {
        return None;
    }
    let invalid = pair.values().map(|value| {
        birth_year(value).is_some_and(|year| !is_valid_birth_year(year))
    });
    match (invalid.left, invalid.right) {
        (true, false) => Some(FieldDecision::Right),
        (false, true) => Some(FieldDecision::Left),
        _ => None,
    }
}

/// "Yes" beats "No".
fn first_generation(pair: &FieldPair, _context: &ResolutionContext) -> Option<FieldDecision> {
    if pair.kind() != FieldKind::FirstGeneration {
        return None;
    }
    let values = pair.values();
    let answers: Sided<(bool, bool)> = values.map(|value| (YES.is_match(value), NO.is_match(value)));
    match (answers.left, answers.right) {
        ((true, _), (_, true)) => Some(FieldDecision::Left),
        ((_, true), (true, _)) => Some(FieldDecision::Right),
        _ => None,
    }
}

/// The later term code wins.
fn intended_term(pair: &FieldPair, _context: &ResolutionContext) -> Option<FieldDecision> {
    if pair.kind() != FieldKind::IntendedTerm {
        return None;
    }
    let codes = pair.values().map(|value| {
        TERM_CODE
            .captures(value)
            .and_then(|caps| caps[1].parse::<u32>().ok())
    });
    let (Some(left), Some(right)) = (codes.left, codes.right) else {
        return None;
    };
    match left.cmp(&right) {
        Ordering::Greater => Some(FieldDecision::Left),
        Ordering::Less => Some(FieldDecision::Right),
        Ordering::Equal => None,
    }
}

/// Same name in different casing: prefer the title-cased spelling.
fn name_case(pair: &FieldPair, _context: &ResolutionContext) -> Option<FieldDecision> {
    let is_name_row = pair.mentions("first name")
        || pair.mentions("last name")
        || (pair.mentions("name") && !pair.mentions("email"));
    if !is_name_row {
        return None;
    }
    let values = pair.values();
    if values.left.to_lowercase() != values.right.to_lowercase() || values.left == values.right {
        return None;
    }

    values
        .map(|value| !is_all_upper(value) && !is_all_lower(value))
        .sole()
        .map(FieldDecision::from)
}

fn is_all_upper(value: &str) -> bool {
    value == value.to_uppercase() && value != value.to_lowercase()
}

fn is_all_lower(value: &str) -> bool {
    value == value.to_lowercase() && value != value.to_uppercase()
}

/// Long-standing row shapes where the left record is kept by convention.
fn legacy_default(pair: &FieldPair, _context: &ResolutionContext) -> Option<FieldDecision> {
    let text = pair.text();
    LEGACY_PATTERNS
        .iter()
        .any(|pattern| pattern.is_match(&text))
        .then_some(FieldDecision::Left)
}

fn address_comparison(pair: &FieldPair, context: &ResolutionContext) -> Option<FieldDecision> {
    let values = pair.values();
    let comparison = compare_addresses(values.left, values.right);
    let decision = match comparison.winner {
        AddressWinner::Left => FieldDecision::Left,
        AddressWinner::Right => FieldDecision::Right,
        AddressWinner::Neither => FieldDecision::Neither,
        AddressWinner::Tie => context
            .selected_email_side
            .map_or(FieldDecision::Defer(DeferReason::AddressesDiffer), FieldDecision::from),
    };
    Some(decision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::merge::domain::Side;

    fn resolve(pair: &FieldPair, context: &ResolutionContext) -> Option<(ResolutionRule, FieldDecision)> {
        FIELD_CASCADE
            .iter()
            .find_map(|(rule, apply)| apply(pair, context).map(|decision| (*rule, decision)))
    }

    #[test]
    fn milestone_rows_of_same_type_keep_left() {
        let pair = FieldPair::new(
            "Milestones",
            "type: Inquiry, Mar 2, 2024 - 3:10 PM",
            "type: inquiry, Apr 9, 2024 - 9:00 AM",
        );
        assert_eq!(
            resolve(&pair, &ResolutionContext::default()),
            Some((ResolutionRule::MilestoneType, FieldDecision::Left))
        );
    }

    #[test]
    fn institutional_email_loses_to_personal() {
        let pair = FieldPair::new("Email", "jane@csusb.edu", "jane@gmail.com");
        assert_eq!(
            resolve(&pair, &ResolutionContext::default()),
            Some((ResolutionRule::PersonalEmail, FieldDecision::Right))
        );
    }

    #[test]
    fn major_on_both_sides_follows_email() {
        let pair = FieldPair::new("Program", "csusb.major.bio", "csusb.major.chem");
        let context = ResolutionContext::default();
        assert_eq!(
            resolve(&pair, &context),
            Some((
                ResolutionRule::AttributePresence,
                FieldDecision::Defer(DeferReason::AwaitingEmailSelection)
            ))
        );
        let context = context.with_selected_email_side(Some(Side::Right));
        assert_eq!(
            resolve(&pair, &context),
            Some((ResolutionRule::AttributePresence, FieldDecision::Right))
        );
    }

    #[test]
    fn external_ids_prefer_the_side_that_has_one() {
        let pair = FieldPair::new("External Ids", "", "Encoura Id: 5521");
        assert_eq!(
            resolve(&pair, &ResolutionContext::default()),
            Some((ResolutionRule::AttributePresence, FieldDecision::Right))
        );
        let pair = FieldPair::new("External Ids", "College Board Id: 1", "College Board Id: 2");
        assert_eq!(
            resolve(&pair, &ResolutionContext::default()),
            Some((ResolutionRule::AttributePresence, FieldDecision::Left))
        );
    }

    #[test]
    fn student_type_without_school_code_defers() {
        let pair = FieldPair::new("Student Type", "Freshman csusb.school.12", "csusb.school.14 Transfer");
        assert_eq!(
            resolve(&pair, &ResolutionContext::default()),
            Some((
                ResolutionRule::AttributePresence,
                FieldDecision::Defer(DeferReason::AwaitingEmailSelection)
            ))
        );
        let pair = FieldPair::new("Student Type csusb.school.1", "Freshman", "Transfer");
        assert_eq!(
            resolve(&pair, &ResolutionContext::default()),
            Some((
                ResolutionRule::AttributePresence,
                FieldDecision::Defer(DeferReason::AttributeMissing)
            ))
        );
    }

    #[test]
    fn placeholder_birth_year_loses() {
        let pair = FieldPair::new("Date of Birth", "Jan 1, 0001", "Jun 5, 2005");
        assert_eq!(
            resolve(&pair, &ResolutionContext::default()),
            Some((ResolutionRule::BirthDateValidity, FieldDecision::Right))
        );
    }

    #[test]
    fn first_generation_yes_wins() {
        let pair = FieldPair::new("First Generation Student", "No", "Yes");
        assert_eq!(
            resolve(&pair, &ResolutionContext::default()),
            Some((ResolutionRule::FirstGeneration, FieldDecision::Right))
        );
    }

    #[test]
    fn later_intended_term_wins() {
        let pair = FieldPair::new("Intended Term", "Fall 2025 (2258)", "Spring 2025 (2252)");
        assert_eq!(
            resolve(&pair, &ResolutionContext::default()),
            Some((ResolutionRule::IntendedTerm, FieldDecision::Left))
        );
    }

    #[test]
    fn title_case_name_wins() {
        let pair = FieldPair::new("Last Name", "GARCIA", "Garcia");
        assert_eq!(
            resolve(&pair, &ResolutionContext::default()),
            Some((ResolutionRule::NameCase, FieldDecision::Right))
        );
        let pair = FieldPair::new("Last Name", "GARCIA", "garcia");
        assert_eq!(resolve(&pair, &ResolutionContext::default()), None);
    }

    #[test]
    fn legacy_rows_keep_left() {
        let pair = FieldPair::new("Sources", "[ACUx] Fair", "Website");
        assert_eq!(
            resolve(&pair, &ResolutionContext::default()),
            Some((ResolutionRule::LegacyDefault, FieldDecision::Left))
        );
    }

    #[test]
    fn unmatched_rows_fall_through() {
        let pair = FieldPair::new("Phone", "909-555-0100", "909-555-0199");
        assert_eq!(resolve(&pair, &ResolutionContext::default()), None);
    }
}
