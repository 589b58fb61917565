//! Domain entities: core data structures

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::operation::{Datatype, Operation};

/// Record identifier.
pub type Id = u64;

/// Company owning a category tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: Id,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Person who can be employed by a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Id,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Links a contact to a company in a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employment {
    pub id: Id,
    pub company_id: Id,
    pub contact_id: Id,
    pub role_id: Id,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome attached to every category carrying the same code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub code: String,
    pub outcome: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.outcome)
    }
}

/// One node of a company's category tree.
///
/// A category without a parent is a grouping root. A category with a
/// non-blank `code` is an outcome leaf, whatever its depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Id,
    pub company_id: Id,
    pub parent_id: Option<Id>,
    /// Siblings are visited in ascending priority
    pub priority: i32,
    pub tab_name: String,
    pub operation: Operation,
    pub datatype: Datatype,
    /// Comparison operand; may be blank only for `Datatype::Nil`
    pub tab_value: Option<String>,
    pub code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn is_grouping_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Outcome code without surrounding whitespace; a blank code is absent.
    pub fn outcome_code(&self) -> Option<&str> {
        self.code.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }

    /// Predicate text: `<tab_name> <symbol> <tab_value>`.
    pub fn predicate(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.tab_name,
            self.operation.symbol(),
            self.tab_value.as_deref().unwrap_or("")
        )
    }
}

/// Empty or whitespace-only.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Optional text that is present and not blank.
pub fn is_present(s: Option<&str>) -> bool {
    s.is_some_and(|v| !is_blank(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn with_code(code: Option<&str>) -> Category {
        let now = Utc::now();
        Category {
            id: 1,
            company_id: 1,
            parent_id: None,
            priority: 0,
            tab_name: "age".to_string(),
            operation: Operation::GreaterThan,
            datatype: Datatype::Integer,
            tab_value: Some("18".to_string()),
            code: code.map(str::to_string),
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("   "), None)]
    #[case(Some("A"), Some("A"))]
    #[case(Some(" A "), Some("A"))]
    fn given_stored_code_when_reading_outcome_code_then_trimmed_or_absent(
        #[case] stored: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(with_code(stored).outcome_code(), expected);
    }
}
