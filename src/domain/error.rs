//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::Id;
use crate::domain::validation::ValidationErrors;

/// Domain errors represent business logic violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("cycle detected in category hierarchy at: {0}")]
    CycleDetected(Id),

    #[error("category {id} references missing parent {parent_id}")]
    DanglingParent { id: Id, parent_id: Id },

    #[error("duplicate category id: {0}")]
    DuplicateId(Id),

    #[error("category {id} belongs to company {company_id}, its parent to company {parent_company_id}")]
    CompanyMismatch {
        id: Id,
        company_id: Id,
        parent_company_id: Id,
    },

    #[error("no rule set for outcome code: {0}")]
    MissingOutcome(String),

    #[error("category {0} still has subcategories")]
    HasSubcategories(Id),

    #[error("rule set {code} is still used by category {category_id}")]
    OutcomeInUse { code: String, category_id: Id },
}

impl DomainError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
