use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::super::domain::{DeferReason, FieldDecision, FieldPair, Side, Sided};
use super::super::signals::is_valid_birth_year;
use super::context::ResolutionContext;

/// Consumer mailbox providers; anything else is treated as institutional.
pub const PERSONAL_EMAIL_DOMAINS: [&str; 11] = [
    "gmail.com",
    "yahoo.com",
    "icloud.com",
    "hotmail.com",
    "aol.com",
    "me.com",
    "outlook.com",
    "live.com",
    "msn.com",
    "protonmail.com",
    "proton.me",
];

const MIN_NAME_FRAGMENT_LEN: usize = 3;

static NAME_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s-]+").expect("name separator pattern compiles"));

pub fn is_personal_address(value: &str) -> bool {
    let lower = value.to_lowercase();
    PERSONAL_EMAIL_DOMAINS
        .iter()
        .any(|domain| lower.contains(&format!("@{domain}")))
}

/// Signals consulted, in order, when both emails are personal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailTieBreaker {
    EmailOpens,
    FirstName,
    LastName,
    BirthYear,
}

type TieBreak = fn(&Sided<String>, &ResolutionContext) -> Option<Side>;

const TIE_BREAKERS: [(EmailTieBreaker, TieBreak); 4] = [
    (EmailTieBreaker::EmailOpens, by_email_opens),
    (EmailTieBreaker::FirstName, by_first_name),
    (EmailTieBreaker::LastName, by_last_name),
    (EmailTieBreaker::BirthYear, by_birth_year),
];

/// Picks between two personal addresses, deferring when nothing discriminates.
pub(crate) fn break_personal_tie(pair: &FieldPair, context: &ResolutionContext) -> FieldDecision {
    let emails = pair.values().map(|value| value.to_lowercase());

    for (breaker, apply) in TIE_BREAKERS {
        if let Some(side) = apply(&emails, context) {
            debug!(label = %pair.label, ?breaker, %side, "broke personal email tie");
            return side.into();
        }
    }

    FieldDecision::Defer(DeferReason::DualPersonalEmailUndecided)
}

fn by_email_opens(_emails: &Sided<String>, context: &ResolutionContext) -> Option<Side> {
    match context.email_opens.left.cmp(&context.email_opens.right) {
        Ordering::Greater => Some(Side::Left),
        Ordering::Less => Some(Side::Right),
        Ordering::Equal => None,
    }
}

fn by_first_name(emails: &Sided<String>, context: &ResolutionContext) -> Option<Side> {
    let names = context.known.map(|identity| identity.first_name.clone());
    by_names(emails, names)
}

fn by_last_name(emails: &Sided<String>, context: &ResolutionContext) -> Option<Side> {
    let names = context.known.map(|identity| identity.last_name.clone());
    by_names(emails, names)
}

fn by_names(emails: &Sided<String>, names: Sided<Option<String>>) -> Option<Side> {
    let names: Vec<String> = [names.left, names.right]
        .into_iter()
        .flatten()
        .map(|name| name.trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect();
    if names.is_empty() {
        return None;
    }

    emails
        .map(|email| names.iter().any(|name| email_contains_name(email, name)))
        .sole()
}

fn by_birth_year(emails: &Sided<String>, context: &ResolutionContext) -> Option<Side> {
    let years: Vec<&str> = [&context.known.left.birth_year, &context.known.right.birth_year]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .filter(|year| is_valid_birth_year(year))
        .collect();
    if years.is_empty() {
        return None;
    }

    emails
        .map(|email| years.iter().any(|year| email_contains_year(email, year)))
        .sole()
}

/// Whole name, or any hyphen/space separated part of at least three letters.
fn email_contains_name(email: &str, name: &str) -> bool {
    email.contains(name)
        || NAME_SEPARATORS
            .split(name)
            .any(|part| part.chars().count() >= MIN_NAME_FRAGMENT_LEN && email.contains(part))
}

/// Four-digit year, or its last three or two digits.
fn email_contains_year(email: &str, year: &str) -> bool {
    [Some(year), year.get(1..), year.get(2..)]
        .into_iter()
        .flatten()
        .any(|fragment| email.contains(fragment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::merge::resolution::context::KnownIdentity;

    fn context_with_names(left: &str, right: &str) -> ResolutionContext {
        ResolutionContext {
            known: Sided::new(
                KnownIdentity {
                    first_name: Some(left.to_string()),
                    ..KnownIdentity::default()
                },
                KnownIdentity {
                    first_name: Some(right.to_string()),
                    ..KnownIdentity::default()
                },
            ),
            ..ResolutionContext::default()
        }
    }

    #[test]
    fn recognizes_personal_domains() {
        assert!(is_personal_address("Jane@Gmail.com"));
        assert!(is_personal_address("x@proton.me"));
        assert!(!is_personal_address("jane@csusb.edu"));
    }

    #[test]
    fn email_opens_take_precedence() {
        let pair = FieldPair::new("Email", "maria@gmail.com", "jose@yahoo.com");
        let mut context = context_with_names("jose", "jose");
        context.email_opens = Sided::new(1, 4);
        assert_eq!(break_personal_tie(&pair, &context), FieldDecision::Right);
    }

    #[test]
    fn name_parts_discriminate() {
        let pair = FieldPair::new("Email", "soccerfan99@gmail.com", "mary.ann@yahoo.com");
        let context = context_with_names("mary-ann", "mary-ann");
        assert_eq!(break_personal_tie(&pair, &context), FieldDecision::Right);
    }

    #[test]
    fn birth_year_suffixes_discriminate() {
        let pair = FieldPair::new("Email", "kid04@gmail.com", "someone@yahoo.com");
        let mut context = ResolutionContext::default();
        context.known.left.birth_year = Some("2004".to_string());
        assert_eq!(break_personal_tie(&pair, &context), FieldDecision::Left);
    }

    #[test]
    fn placeholder_years_are_ignored() {
        let pair = FieldPair::new("Email", "kid01@gmail.com", "someone@yahoo.com");
        let mut context = ResolutionContext::default();
        context.known.left.birth_year = Some("0001".to_string());
        assert_eq!(
            break_personal_tie(&pair, &context),
            FieldDecision::Defer(DeferReason::DualPersonalEmailUndecided)
        );
    }
}
