//! Per-field conflict resolution: an ordered cascade of rules, each of which
//! either decides the field or passes it on.

mod context;
mod email;
mod rules;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use context::{KnownIdentity, ResolutionContext};
pub use email::{is_personal_address, EmailTieBreaker, PERSONAL_EMAIL_DOMAINS};
pub use rules::ResolutionRule;

use super::domain::{DeferReason, FieldDecision, FieldPair};
use rules::{is_address_pair, Rule, ADDRESS_CASCADE, FIELD_CASCADE};

/// A field's decision together with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldResolution {
    pub label: String,
    pub decision: FieldDecision,
    /// `None` when every rule passed.
    pub rule: Option<ResolutionRule>,
}

pub fn resolve_field(pair: &FieldPair, context: &ResolutionContext) -> FieldDecision {
    resolve_field_traced(pair, context).decision
}

pub fn resolve_field_traced(pair: &FieldPair, context: &ResolutionContext) -> FieldResolution {
    let cascade: &[(ResolutionRule, Rule)] = if is_address_pair(pair) {
        &ADDRESS_CASCADE
    } else {
        &FIELD_CASCADE
    };

    for (rule, apply) in cascade {
        if let Some(decision) = apply(pair, context) {
            debug!(
                label = %pair.label,
                ?rule,
                decision = %decision.summary(),
                "resolved field"
            );
            return FieldResolution {
                label: pair.label.clone(),
                decision,
                rule: Some(*rule),
            };
        }
    }

    debug!(label = %pair.label, "no rule matched; deferring");
    FieldResolution {
        label: pair.label.clone(),
        decision: FieldDecision::Defer(DeferReason::NoRuleMatched),
        rule: None,
    }
}
