use serde::{Deserialize, Serialize};
use tracing::debug;

use super::address::compare_addresses;
use super::domain::{FieldKind, FieldPair};
use super::signals::{compact_name, valid_birth_year};

/// Address strings at or below this many characters are too short to call a conflict.
const MIN_ADDRESS_LEN: usize = 10;

/// Identity fields that disagree between the two sides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    pub count: usize,
    pub conflicts: Vec<String>,
}

impl ConflictReport {
    /// Twin-record warning threshold; zero disables the warning.
    pub fn exceeds(&self, threshold: u32) -> bool {
        threshold > 0 && self.count >= threshold as usize
    }

    fn push(&mut self, label: &str) {
        self.count += 1;
        self.conflicts.push(label.to_string());
    }
}

/// Counts disagreements in names, birth date, and address. Advisory only.
pub fn count_conflicts(fields: &[FieldPair]) -> ConflictReport {
    let mut report = ConflictReport::default();

    for pair in fields {
        let values = pair.values();
        if values.left.is_empty() || values.right.is_empty() {
            continue;
        }

        let conflicting = match pair.kind() {
            FieldKind::FirstName | FieldKind::LastName => {
                compact_name(values.left) != compact_name(values.right)
            }
            FieldKind::DateOfBirth => {
                match (valid_birth_year(values.left), valid_birth_year(values.right)) {
                    (Some(_), Some(_)) => compact_date(values.left) != compact_date(values.right),
                    _ => false,
                }
            }
            FieldKind::Address => {
                !compare_addresses(values.left, values.right).are_same
                    && values.left.chars().count() > MIN_ADDRESS_LEN
                    && values.right.chars().count() > MIN_ADDRESS_LEN
            }
            _ => false,
        };

        if conflicting {
            report.push(&pair.label);
        }
    }

    debug!(count = report.count, conflicts = ?report.conflicts, "counted identity conflicts");
    report
}

fn compact_date(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_threshold_never_warns() {
        let report = ConflictReport {
            count: 5,
            conflicts: Vec::new(),
        };
        assert!(!report.exceeds(0));
        assert!(report.exceeds(5));
        assert!(!report.exceeds(6));
    }

    #[test]
    fn placeholder_birth_dates_are_not_conflicts() {
        let fields = vec![FieldPair::new("Date of Birth", "Jan 1, 0001", "May 4, 2003")];
        assert_eq!(count_conflicts(&fields).count, 0);
    }
}
