//! Merge decisioning for duplicate person records.

pub mod address;
pub mod applicant;
pub mod conflicts;
pub mod domain;
pub mod eligibility;
pub mod resolution;
pub mod review;
pub mod signals;

#[cfg(test)]
mod tests;

pub use address::{compare_addresses, AddressComparison, AddressWinner, ParsedAddress};
pub use applicant::{detect_applicant_side, ApplicantSide, ApplicantSideHint};
pub use conflicts::{count_conflicts, ConflictReport};
pub use domain::{DeferReason, FieldDecision, FieldKind, FieldPair, RecordSnapshot, Side, Sided};
pub use eligibility::{
    record_category, AllowedDepartment, Department, EligibilityClassifier, EligibilityVerdict,
    ForbiddenReason, ParseDepartmentError, RecordCategory,
};
pub use resolution::{
    resolve_field, resolve_field_traced, FieldResolution, KnownIdentity, ResolutionContext,
    ResolutionRule,
};
pub use review::{MergeAdvisor, MergeConfig, MergeReadiness, MergeReview};
