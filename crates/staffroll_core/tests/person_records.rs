use chrono::NaiveDate;
use rusqlite::params;
use staffroll_core::db::open_db_in_memory;
use staffroll_core::{
    Document, DocumentRepository, Person, PersonKind, PersonListQuery, PersonRepository,
    RecordValidationError, RepoError, ServiceError, SqliteDocumentRepository,
    SqlitePersonRepository, SqliteStaffRepository, StaffService, ValidationError,
};
use uuid::Uuid;

fn person_with_national_id(national_id: &str) -> Person {
    Person::new("Ana", "Rojas", "Soto").with_national_id(national_id)
}

#[test]
fn create_and_get_roundtrip_stores_canonical_identity_number() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();

    let mut person = person_with_national_id("06-k");
    person.birth_date = NaiveDate::from_ymd_opt(1985, 4, 12);
    person.phone = Some("912345678".to_string());
    person.email = Some("ana.rojas@colegio.cl".to_string());
    person.address = Some("   ".to_string());
    let id = repo.create_person(&person).unwrap();

    let loaded = repo.get_person(id).unwrap().unwrap();
    assert_eq!(loaded.national_id.as_deref(), Some("6-K"));
    assert_eq!(loaded.foreign_id, None);
    assert_eq!(loaded.address, None);
    assert_eq!(loaded.birth_date, NaiveDate::from_ymd_opt(1985, 4, 12));
    assert_eq!(loaded.full_name(), "Ana Rojas Soto");
}

#[test]
fn duplicate_national_id_is_rejected_in_any_spelling() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();

    repo.create_person(&person_with_national_id("1-9")).unwrap();

    let err = repo
        .create_person(&person_with_national_id("01-9"))
        .unwrap_err();
    match err {
        RepoError::DuplicateNationalId(value) => assert_eq!(value, "1-9"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn duplicate_foreign_id_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();

    repo.create_person(&Person::new("Luz", "Mora", "Diaz").with_foreign_id("P-7788"))
        .unwrap();
    let err = repo
        .create_person(&Person::new("Eva", "Paz", "Lagos").with_foreign_id("P-7788"))
        .unwrap_err();
    assert!(matches!(err, RepoError::DuplicateForeignId(_)));
}

#[test]
fn find_by_national_id_accepts_any_valid_spelling() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();
    let id = repo.create_person(&person_with_national_id("1-9")).unwrap();

    let found = repo.find_by_national_id("001-9").unwrap().unwrap();
    assert_eq!(found.id, id);
    assert!(repo.find_by_national_id("2-7").unwrap().is_none());
    assert!(matches!(
        repo.find_by_national_id("1-0"),
        Err(RepoError::Validation(RecordValidationError::InvalidField {
            error: ValidationError::Checksum,
            ..
        }))
    ));
}

#[test]
fn both_or_neither_identifier_is_rejected_by_repository() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();

    let both = person_with_national_id("1-9").with_foreign_id("P-1");
    let err = repo.create_person(&both).unwrap_err();
    match err {
        RepoError::Validation(validation) => assert_eq!(
            validation.validation_error(),
            Some(ValidationError::ConflictingIdentifier)
        ),
        other => panic!("unexpected error: {other}"),
    }

    let neither = Person::new("Ana", "Rojas", "Soto");
    let err = repo.create_person(&neither).unwrap_err();
    match err {
        RepoError::Validation(validation) => assert_eq!(
            validation.validation_error(),
            Some(ValidationError::MissingIdentifier)
        ),
        other => panic!("unexpected error: {other}"),
    }

    let blank_national = Person::new("Ana", "Rojas", "Soto").with_national_id("   ");
    assert!(repo.create_person(&blank_national).is_err());
}

#[test]
fn schema_rejects_rows_that_bypass_the_repository() {
    let conn = open_db_in_memory().unwrap();
    let insert = "INSERT INTO persons (id, first_name, national_id, foreign_id, paternal_surname, maternal_surname)
                  VALUES (?1, 'Ana', ?2, ?3, 'Rojas', 'Soto');";

    let both = conn.execute(
        insert,
        params![Uuid::new_v4().to_string(), "1-9", "P-1"],
    );
    assert!(both.is_err());

    let neither = conn.execute(
        insert,
        params![Uuid::new_v4().to_string(), None::<String>, None::<String>],
    );
    assert!(neither.is_err());

    conn.execute(
        insert,
        params![Uuid::new_v4().to_string(), "1-9", None::<String>],
    )
    .unwrap();
    let duplicate = conn.execute(
        insert,
        params![Uuid::new_v4().to_string(), "1-9", None::<String>],
    );
    assert!(duplicate.is_err());
}

#[test]
fn invalid_contact_fields_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();

    let mut bad_phone = person_with_national_id("1-9");
    bad_phone.phone = Some("812345678".to_string());
    assert!(matches!(
        repo.create_person(&bad_phone),
        Err(RepoError::Validation(RecordValidationError::InvalidField {
            field: "phone",
            error: ValidationError::Format,
        }))
    ));

    let mut bad_email = person_with_national_id("1-9");
    bad_email.email = Some("not-an-email".to_string());
    assert!(matches!(
        repo.create_person(&bad_email),
        Err(RepoError::Validation(RecordValidationError::InvalidField {
            field: "email",
            ..
        }))
    ));
}

#[test]
fn update_can_switch_identifier_kind() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();
    let mut person = person_with_national_id("1-9");
    repo.create_person(&person).unwrap();

    person.national_id = None;
    person.foreign_id = Some("P-42".to_string());
    repo.update_person(&person).unwrap();

    let loaded = repo.get_person(person.id).unwrap().unwrap();
    assert_eq!(loaded.national_id, None);
    assert_eq!(loaded.foreign_id.as_deref(), Some("P-42"));

    let missing = person_with_national_id("2-7");
    assert!(matches!(
        repo.update_person(&missing),
        Err(RepoError::NotFound(_))
    ));
}

#[test]
fn list_orders_by_surname_and_filters_by_kind() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();

    let zuniga = Person::new("Ana", "Zuniga", "Soto").with_national_id("1-9");
    let alvarez = Person::new("Luis", "Alvarez", "Pino").with_national_id("2-7");
    repo.create_person(&zuniga).unwrap();
    repo.create_person(&alvarez).unwrap();

    let listed = repo.list_persons(&PersonListQuery::default()).unwrap();
    let surnames: Vec<&str> = listed
        .iter()
        .map(|person| person.paternal_surname.as_str())
        .collect();
    assert_eq!(surnames, vec!["Alvarez", "Zuniga"]);

    let teachers = repo
        .list_persons(&PersonListQuery {
            kind: Some(PersonKind::Teacher),
            ..PersonListQuery::default()
        })
        .unwrap();
    assert!(teachers.is_empty());
    assert_eq!(
        repo.person_kind(alvarez.id).unwrap(),
        Some(PersonKind::Other)
    );
}

#[test]
fn deleting_person_cascades_to_documents() {
    let conn = open_db_in_memory().unwrap();
    let persons = SqlitePersonRepository::try_new(&conn).unwrap();
    let documents = SqliteDocumentRepository::try_new(&conn).unwrap();

    let person = person_with_national_id("1-9");
    persons.create_person(&person).unwrap();
    let document = documents
        .attach_document(&Document::new(person.id, "Contrato 2024", "docs/contrato.pdf"))
        .unwrap();
    assert!(document.uploaded_at.is_some());

    persons.delete_person(person.id).unwrap();

    assert!(persons.get_person(person.id).unwrap().is_none());
    assert!(documents.get_document(document.id).unwrap().is_none());
    assert!(matches!(
        persons.delete_person(person.id),
        Err(RepoError::NotFound(_))
    ));
}

#[test]
fn service_returns_stored_shape_and_maps_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = StaffService::new(
        SqlitePersonRepository::try_new(&conn).unwrap(),
        SqliteStaffRepository::try_new(&conn).unwrap(),
    );

    let stored = service
        .register_person(&person_with_national_id("0345-k"))
        .unwrap();
    assert_eq!(stored.national_id.as_deref(), Some("345-K"));

    let err = service.get_person(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}
