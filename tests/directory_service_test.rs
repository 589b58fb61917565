//! Tests for DirectoryService

use std::sync::Arc;

use ruletree::application::services::DirectoryService;
use ruletree::application::ApplicationError;
use ruletree::domain::DomainError;
use ruletree::infrastructure::MemoryStore;

fn service() -> DirectoryService {
    DirectoryService::new(Arc::new(MemoryStore::new()))
}

#[test]
fn given_employments_when_listing_staff_then_sorted_by_contact_name() {
    // Arrange
    let directory = service();
    let acme = directory.add_company("Acme").unwrap().id;
    let globex = directory.add_company("Globex").unwrap().id;
    let zoe = directory.add_contact("Zoe", "zoe@acme.test").unwrap().id;
    let adam = directory.add_contact("Adam", "adam@acme.test").unwrap().id;
    let analyst = directory.add_role("Analyst").unwrap().id;
    let owner = directory.add_role("Owner").unwrap().id;
    directory.employ(acme, zoe, owner).unwrap();
    directory.employ(acme, adam, analyst).unwrap();
    directory.employ(globex, zoe, analyst).unwrap();

    // Act
    let staff = directory.staff(acme).unwrap();

    // Assert
    let names: Vec<_> = staff
        .iter()
        .map(|m| (m.contact.name.as_str(), m.role.name.as_str()))
        .collect();
    assert_eq!(names, vec![("Adam", "Analyst"), ("Zoe", "Owner")]);
}

#[test]
fn given_unknown_contact_when_employing_then_not_found() {
    let directory = service();
    let acme = directory.add_company("Acme").unwrap().id;
    let role = directory.add_role("Owner").unwrap().id;

    let err = directory.employ(acme, 999, role).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::NotFound { entity: "contact", .. })
    ));
}

#[test]
fn given_blank_email_when_adding_contact_then_validation_error() {
    let directory = service();

    let err = directory.add_contact("Adam", " ").unwrap_err();

    let ApplicationError::Domain(DomainError::Validation(errors)) = err else {
        panic!("expected validation error");
    };
    assert!(errors.has("email"));
    assert!(!errors.has("name"));
}

#[test]
fn given_records_when_adding_then_ids_are_unique_across_kinds() {
    let directory = service();

    let company = directory.add_company("Acme").unwrap().id;
    let contact = directory.add_contact("Adam", "adam@acme.test").unwrap().id;
    let role = directory.add_role("Owner").unwrap().id;

    assert_eq!((company, contact, role), (1, 2, 3));
    assert_eq!(directory.companies().unwrap().len(), 1);
    assert_eq!(directory.company(company).unwrap().name, "Acme");
}
