use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::super::domain::FieldPair;
use super::markers::{has_grad_marker, has_ia_marker, has_non_undergrad_outreach, is_department_row};

/// Admissions department a record belongs to, inferred from its workflow rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    UnderGrad,
    Grad,
    #[serde(rename = "IA")]
    IA,
    NonUndergrad,
}

impl Department {
    pub const fn label(self) -> &'static str {
        match self {
            Department::UnderGrad => "UnderGrad",
            Department::Grad => "Grad",
            Department::IA => "IA",
            Department::NonUndergrad => "Non-Undergrad",
        }
    }

    /// Short code reported when a record is blocked for belonging here.
    pub const fn reason_code(self) -> &'static str {
        match self {
            Department::UnderGrad => "UnderGrad",
            Department::Grad => "GRAD",
            Department::IA => "IA",
            Department::NonUndergrad => "Non-Undergrad",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Department whose records the operator is cleared to merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllowedDepartment {
    All,
    #[default]
    UnderGrad,
    Grad,
    #[serde(rename = "IA")]
    IA,
    None,
}

impl AllowedDepartment {
    pub fn permits(self, department: Department) -> bool {
        match self {
            AllowedDepartment::All => true,
            AllowedDepartment::None => false,
            AllowedDepartment::UnderGrad => department == Department::UnderGrad,
            AllowedDepartment::Grad => department == Department::Grad,
            AllowedDepartment::IA => department == Department::IA,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            AllowedDepartment::All => "all",
            AllowedDepartment::UnderGrad => "undergrad",
            AllowedDepartment::Grad => "grad",
            AllowedDepartment::IA => "ia",
            AllowedDepartment::None => "none",
        }
    }
}

impl fmt::Display for AllowedDepartment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown department `{value}` (expected all, undergrad, grad, ia, or none)")]
pub struct ParseDepartmentError {
    pub value: String,
}

impl FromStr for AllowedDepartment {
    type Err = ParseDepartmentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(AllowedDepartment::All),
            "undergrad" => Ok(AllowedDepartment::UnderGrad),
            "grad" => Ok(AllowedDepartment::Grad),
            "ia" => Ok(AllowedDepartment::IA),
            "none" => Ok(AllowedDepartment::None),
            _ => Err(ParseDepartmentError {
                value: value.to_string(),
            }),
        }
    }
}

/// First decisive marker among workflow rows; unmarked records are undergraduate.
pub fn detect_actual_department(fields: &[FieldPair]) -> Department {
    fields
        .iter()
        .filter(|pair| is_department_row(pair))
        .find_map(|pair| {
            if has_grad_marker(pair) {
                Some(Department::Grad)
            } else if has_ia_marker(pair) {
                Some(Department::IA)
            } else if has_non_undergrad_outreach(pair) {
                Some(Department::NonUndergrad)
            } else {
                None
            }
        })
        .unwrap_or(Department::UnderGrad)
}

/// Department that puts the record outside what `allowed` permits, if any.
pub fn wrong_department(fields: &[FieldPair], allowed: AllowedDepartment) -> Option<Department> {
    match allowed {
        AllowedDepartment::All => return None,
        AllowedDepartment::None => return Some(detect_actual_department(fields)),
        AllowedDepartment::UnderGrad | AllowedDepartment::Grad | AllowedDepartment::IA => {}
    }

    for pair in fields.iter().filter(|pair| is_department_row(pair)) {
        if has_non_undergrad_outreach(pair) {
            return Some(Department::NonUndergrad);
        }
        let grad = has_grad_marker(pair);
        let ia = has_ia_marker(pair);
        let foreign = match allowed {
            AllowedDepartment::UnderGrad if grad => Some(Department::Grad),
            AllowedDepartment::UnderGrad if ia => Some(Department::IA),
            AllowedDepartment::Grad if ia => Some(Department::IA),
            AllowedDepartment::IA if grad => Some(Department::Grad),
            _ => None,
        };
        if foreign.is_some() {
            return foreign;
        }
    }

    let actual = detect_actual_department(fields);
    (!allowed.permits(actual)).then_some(actual)
}
