//! Companies, contacts, roles and employments

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, instrument};

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::validation::{validate_company, validate_contact, validate_role};
use crate::domain::{Company, Contact, Dataset, DomainError, Employment, Id, Role};
use crate::infrastructure::traits::RecordStore;

/// A contact employed by a company, with their role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaffMember {
    pub contact: Contact,
    pub role: Role,
}

pub struct DirectoryService {
    store: Arc<dyn RecordStore>,
}

impl DirectoryService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    fn load(&self) -> ApplicationResult<Dataset> {
        self.store.load().with_context("load records")
    }

    fn save(&self, data: &Dataset) -> ApplicationResult<()> {
        self.store.save(data).with_context("save records")
    }

    #[instrument(level = "debug", skip(self))]
    pub fn add_company(&self, name: &str) -> ApplicationResult<Company> {
        let mut data = self.load()?;
        let now = Utc::now();
        let mut company = Company {
            id: 0,
            name: name.trim().to_string(),
            created_at: now,
            updated_at: now,
        };
        validate_company(&company).map_err(DomainError::from)?;

        company.id = data.allocate_id();
        data.companies.insert(company.id, company.clone());
        self.save(&data)?;

        info!("created company {}: {}", company.id, company.name);
        Ok(company)
    }

    pub fn companies(&self) -> ApplicationResult<Vec<Company>> {
        Ok(self.load()?.companies.into_values().collect())
    }

    pub fn company(&self, id: Id) -> ApplicationResult<Company> {
        self.load()?
            .companies
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("company", id).into())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn add_contact(&self, name: &str, email: &str) -> ApplicationResult<Contact> {
        let mut data = self.load()?;
        let now = Utc::now();
        let mut contact = Contact {
            id: 0,
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            created_at: now,
            updated_at: now,
        };
        validate_contact(&contact).map_err(DomainError::from)?;

        contact.id = data.allocate_id();
        data.contacts.insert(contact.id, contact.clone());
        self.save(&data)?;

        info!("created contact {}: {}", contact.id, contact.name);
        Ok(contact)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn add_role(&self, name: &str) -> ApplicationResult<Role> {
        let mut data = self.load()?;
        let now = Utc::now();
        let mut role = Role {
            id: 0,
            name: name.trim().to_string(),
            created_at: now,
            updated_at: now,
        };
        validate_role(&role).map_err(DomainError::from)?;

        role.id = data.allocate_id();
        data.roles.insert(role.id, role.clone());
        self.save(&data)?;

        info!("created role {}: {}", role.id, role.name);
        Ok(role)
    }

    /// Employ `contact` at `company` in `role`; all three must exist.
    #[instrument(level = "debug", skip(self))]
    pub fn employ(&self, company: Id, contact: Id, role: Id) -> ApplicationResult<Employment> {
        let mut data = self.load()?;
        if !data.companies.contains_key(&company) {
            return Err(DomainError::not_found("company", company).into());
        }
        if !data.contacts.contains_key(&contact) {
            return Err(DomainError::not_found("contact", contact).into());
        }
        if !data.roles.contains_key(&role) {
            return Err(DomainError::not_found("role", role).into());
        }

        let now = Utc::now();
        let employment = Employment {
            id: data.allocate_id(),
            company_id: company,
            contact_id: contact,
            role_id: role,
            created_at: now,
            updated_at: now,
        };
        data.employments.insert(employment.id, employment.clone());
        self.save(&data)?;

        info!(
            "contact {} employed at company {} as role {}",
            contact, company, role
        );
        Ok(employment)
    }

    /// Contacts employed by `company`, ordered by contact name.
    pub fn staff(&self, company: Id) -> ApplicationResult<Vec<StaffMember>> {
        let data = self.load()?;
        if !data.companies.contains_key(&company) {
            return Err(DomainError::not_found("company", company).into());
        }
        let mut staff: Vec<_> = data
            .employments
            .values()
            .filter(|e| e.company_id == company)
            .filter_map(|e| {
                Some(StaffMember {
                    contact: data.contacts.get(&e.contact_id)?.clone(),
                    role: data.roles.get(&e.role_id)?.clone(),
                })
            })
            .collect();
        staff.sort_by(|a, b| a.contact.name.cmp(&b.contact.name));
        Ok(staff)
    }
}
