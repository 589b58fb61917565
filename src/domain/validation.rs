//! Record validation: presence, enum inclusion and parent-company rules.
//!
//! Every failing field is collected so callers can report them together.

use std::fmt;

use itertools::Itertools;

use crate::domain::entities::{is_blank, is_present, Category, Company, Contact, Role};
use crate::domain::operation::Datatype;

/// A single failed rule on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// All failed rules for one record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed: {}", self.errors.iter().join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Validate a category against its (already resolved) parent.
pub fn validate_category(
    category: &Category,
    parent: Option<&Category>,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if is_blank(&category.tab_name) {
        errors.add("tab_name", "can't be blank");
    }
    if !category.operation.is_known() {
        errors.add("operation", "is not included in the list");
    }
    if !category.datatype.is_known() {
        errors.add("datatype", "is not included in the list");
    }
    if category.datatype != Datatype::Nil && !is_present(category.tab_value.as_deref()) {
        errors.add("tab_value", "Must be present unless datatype is 'NIL'");
    }
    if let Some(parent) = parent {
        if parent.company_id != category.company_id {
            errors.add("company", "Must match parent Company");
        }
    }

    errors.into_result()
}

pub fn validate_company(company: &Company) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if is_blank(&company.name) {
        errors.add("name", "can't be blank");
    }
    errors.into_result()
}

pub fn validate_contact(contact: &Contact) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if is_blank(&contact.name) {
        errors.add("name", "can't be blank");
    }
    if is_blank(&contact.email) {
        errors.add("email", "can't be blank");
    }
    errors.into_result()
}

pub fn validate_role(role: &Role) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if is_blank(&role.name) {
        errors.add("name", "can't be blank");
    }
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::operation::Operation;
    use chrono::Utc;

    fn category(company_id: u64, datatype: Datatype, tab_value: Option<&str>) -> Category {
        let now = Utc::now();
        Category {
            id: 1,
            company_id,
            parent_id: None,
            priority: 0,
            tab_name: "age".to_string(),
            operation: Operation::GreaterThan,
            datatype,
            tab_value: tab_value.map(str::to_string),
            code: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn given_complete_category_when_validating_then_passes() {
        let c = category(1, Datatype::Integer, Some("18"));
        assert!(validate_category(&c, None).is_ok());
    }

    #[test]
    fn given_blank_value_with_nil_datatype_when_validating_then_passes() {
        let c = category(1, Datatype::Nil, None);
        assert!(validate_category(&c, None).is_ok());
    }

    #[test]
    fn given_blank_value_with_string_datatype_when_validating_then_fails_on_tab_value() {
        let c = category(1, Datatype::String, Some("   "));
        let errors = validate_category(&c, None).unwrap_err();
        assert!(errors.has("tab_value"));
        assert_eq!(errors.errors.len(), 1);
    }

    #[test]
    fn given_parent_of_other_company_when_validating_then_fails_on_company() {
        let parent = category(2, Datatype::Integer, Some("1"));
        let child = category(1, Datatype::Integer, Some("1"));
        let errors = validate_category(&child, Some(&parent)).unwrap_err();
        assert!(errors.has("company"));
    }

    #[test]
    fn given_several_broken_fields_when_validating_then_collects_all() {
        let mut c = category(1, Datatype::Unknown(9), None);
        c.tab_name = String::new();
        c.operation = Operation::Unknown(7);
        let errors = validate_category(&c, None).unwrap_err();
        assert!(errors.has("tab_name"));
        assert!(errors.has("operation"));
        assert!(errors.has("datatype"));
        assert!(errors.has("tab_value"));
        assert!(errors.to_string().starts_with("validation failed: "));
    }
}
