use serde::{Deserialize, Serialize};

/// How the taxpayer earns the income being compared.
///
/// Selects which pension contribution rule and which credits apply. A
/// corporate owner's salary is always taxed as [`EmploymentStatus::Employee`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    #[default]
    Employee,
    SelfEmployed,
}

impl EmploymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::SelfEmployed => "self_employed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "employee" => Some(Self::Employee),
            "self_employed" | "self-employed" => Some(Self::SelfEmployed),
            _ => None,
        }
    }

    pub fn from_self_employed(self_employed: bool) -> Self {
        if self_employed {
            Self::SelfEmployed
        } else {
            Self::Employee
        }
    }

    pub fn is_self_employed(&self) -> bool {
        matches!(self, Self::SelfEmployed)
    }
}
