use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::applicant::{detect_applicant_side, ApplicantSideHint};
use super::conflicts::{count_conflicts, ConflictReport};
use super::domain::{FieldKind, FieldPair, RecordSnapshot};
use super::eligibility::{record_category, AllowedDepartment, EligibilityClassifier, EligibilityVerdict, RecordCategory};
use super::resolution::{resolve_field_traced, FieldResolution, ResolutionContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConfig {
    pub allowed_department: AllowedDepartment,
    /// Identity conflicts at which the pair is flagged as possible twins. Zero disables.
    pub conflict_row_threshold: u32,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            allowed_department: AllowedDepartment::UnderGrad,
            conflict_row_threshold: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeReadiness {
    /// Eligibility gate refused the pair.
    Blocked,
    /// At least one field still needs an operator.
    NeedsReview,
    Ready,
}

impl MergeReadiness {
    pub const fn summary(self) -> &'static str {
        match self {
            MergeReadiness::Blocked => "merge blocked",
            MergeReadiness::NeedsReview => "manual review required",
            MergeReadiness::Ready => "ready to merge",
        }
    }
}

/// Full advisory for one record pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReview {
    pub verdict: EligibilityVerdict,
    pub category: RecordCategory,
    pub applicant: ApplicantSideHint,
    pub resolutions: Vec<FieldResolution>,
    pub conflicts: ConflictReport,
    pub twin_warning: bool,
    pub readiness: MergeReadiness,
}

impl MergeReview {
    pub fn undecided(&self) -> impl Iterator<Item = &FieldResolution> {
        self.resolutions
            .iter()
            .filter(|resolution| !resolution.decision.is_decided())
    }
}

/// Runs eligibility, applicant detection, field resolution, and the conflict monitor.
#[derive(Debug, Clone, Default)]
pub struct MergeAdvisor {
    config: MergeConfig,
    classifier: EligibilityClassifier,
}

impl MergeAdvisor {
    pub fn new(config: MergeConfig) -> Self {
        let classifier = EligibilityClassifier::new(config.allowed_department);
        Self { config, classifier }
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    pub fn review(&self, snapshot: &RecordSnapshot) -> MergeReview {
        let verdict = self.classifier.classify(snapshot);
        let category = record_category(snapshot);
        let conflicts = count_conflicts(&snapshot.fields);
        let twin_warning = conflicts.exceeds(self.config.conflict_row_threshold);
        if twin_warning {
            info!(
                count = conflicts.count,
                threshold = self.config.conflict_row_threshold,
                "identity conflicts suggest distinct people"
            );
        }

        if verdict.blocks() {
            return MergeReview {
                verdict,
                category,
                applicant: ApplicantSideHint::none(),
                resolutions: Vec::new(),
                conflicts,
                twin_warning,
                readiness: MergeReadiness::Blocked,
            };
        }

        let applicant = detect_applicant_side(&snapshot.fields);
        let resolutions = self.resolve_fields(snapshot, &applicant);
        let readiness = if resolutions
            .iter()
            .all(|resolution| resolution.decision.is_decided())
        {
            MergeReadiness::Ready
        } else {
            MergeReadiness::NeedsReview
        };

        info!(
            fields = resolutions.len(),
            readiness = readiness.summary(),
            category = %category,
            "reviewed record pair"
        );

        MergeReview {
            verdict,
            category,
            applicant,
            resolutions,
            conflicts,
            twin_warning,
            readiness,
        }
    }

    /// Email rows go first so their outcome can steer attribute and address ties.
    fn resolve_fields(&self, snapshot: &RecordSnapshot, applicant: &ApplicantSideHint) -> Vec<FieldResolution> {
        let mut context = ResolutionContext::from_snapshot(snapshot, applicant.side);
        let conflicting: Vec<(usize, &FieldPair)> = snapshot
            .fields
            .iter()
            .enumerate()
            .filter(|(_, pair)| pair.conflicting)
            .collect();
        let (emails, others): (Vec<_>, Vec<_>) = conflicting
            .into_iter()
            .partition(|(_, pair)| pair.kind() == FieldKind::Email);

        let mut resolved: Vec<(usize, FieldResolution)> = emails
            .iter()
            .map(|(index, pair)| (*index, resolve_field_traced(pair, &context)))
            .collect();

        let email_side = resolved
            .iter()
            .find_map(|(_, resolution)| resolution.decision.side())
            .or(snapshot.selected_email_side);
        debug!(email_side = ?email_side, "email side for dependent fields");
        context = context.with_selected_email_side(email_side);

        resolved.extend(
            others
                .iter()
                .map(|(index, pair)| (*index, resolve_field_traced(pair, &context))),
        );
        resolved.sort_by_key(|(index, _)| *index);
        resolved.into_iter().map(|(_, resolution)| resolution).collect()
    }
}
