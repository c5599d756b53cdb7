use chrono::NaiveDate;
use staffroll_core::db::open_db_in_memory;
use staffroll_core::{
    AssignmentRepository, AssignmentService, Assistant, Biennium, ContractType, DocumentService,
    DocumentState, Establishment, EstablishmentRepository, Page, Person, PersonKind,
    PersonRepository, RecordRef, RecordValidationError, RepoError, Role, ServiceError,
    SqliteAssignmentRepository, SqliteDocumentRepository, SqliteEstablishmentRepository,
    SqlitePersonRepository, SqliteStaffRepository, StaffRepository, StaffService, SubsidyHours,
    SubsidyType, Teacher, TeacherAssignment, TeacherAssignmentRequest, TeacherListQuery,
};
use uuid::Uuid;

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn teacher(national_id: &str, role: Role, subsidy: SubsidyType) -> Teacher {
    Teacher::new(
        Person::new("Marta", "Fuentes", "Vera").with_national_id(national_id),
        role,
        ContractType::FixedTerm,
        subsidy,
    )
}

fn assistant(foreign_id: &str) -> Assistant {
    Assistant::new(
        Person::new("Rosa", "Perez", "Lagos").with_foreign_id(foreign_id),
        "Auxiliar de aseo",
        44,
        day(2022, 3, 1),
        ContractType::Tenured,
    )
}

#[test]
fn teacher_roundtrip_keeps_role_and_hours() {
    let conn = open_db_in_memory().unwrap();
    let staff = SqliteStaffRepository::try_new(&conn).unwrap();
    let persons = SqlitePersonRepository::try_new(&conn).unwrap();

    let mut record = teacher("06-k", Role::SpecialEducator, SubsidyType::Pie);
    record.contract_hours = 44;
    record.subsidy_hours = SubsidyHours::new(30, 0, 14);
    let id = staff.create_teacher(&record).unwrap();

    let loaded = staff.get_teacher(id).unwrap().unwrap();
    assert_eq!(loaded.role, Role::SpecialEducator);
    assert_eq!(loaded.contract_type, ContractType::FixedTerm);
    assert_eq!(loaded.subsidy, SubsidyType::Pie);
    assert_eq!(loaded.subsidy_hours, SubsidyHours::new(30, 0, 14));
    assert_eq!(loaded.person.national_id.as_deref(), Some("6-K"));
    assert_eq!(persons.person_kind(id).unwrap(), Some(PersonKind::Teacher));
}

#[test]
fn failed_teacher_insert_leaves_no_person_row() {
    let conn = open_db_in_memory().unwrap();
    let staff = SqliteStaffRepository::try_new(&conn).unwrap();
    let persons = SqlitePersonRepository::try_new(&conn).unwrap();

    staff
        .create_teacher(&teacher("1-9", Role::Director, SubsidyType::Normal))
        .unwrap();
    let duplicate = teacher("01-9", Role::Psychologist, SubsidyType::Sep);
    assert!(matches!(
        staff.create_teacher(&duplicate),
        Err(RepoError::DuplicateNationalId(_))
    ));
    assert!(persons.get_person(duplicate.id()).unwrap().is_none());
}

#[test]
fn teacher_list_filters_by_role_and_subsidy() {
    let conn = open_db_in_memory().unwrap();
    let staff = SqliteStaffRepository::try_new(&conn).unwrap();

    staff
        .create_teacher(&teacher("1-9", Role::ClassroomTeacher, SubsidyType::Sep))
        .unwrap();
    staff
        .create_teacher(&teacher("2-7", Role::ClassroomTeacher, SubsidyType::Normal))
        .unwrap();
    staff
        .create_teacher(&teacher("3-5", Role::Psychologist, SubsidyType::Sep))
        .unwrap();

    let classroom_sep = staff
        .list_teachers(&TeacherListQuery {
            role: Some(Role::ClassroomTeacher),
            subsidy: Some(SubsidyType::Sep),
            page: Page::default(),
        })
        .unwrap();
    assert_eq!(classroom_sep.len(), 1);
    assert_eq!(classroom_sep[0].person.national_id.as_deref(), Some("1-9"));

    let all = staff.list_teachers(&TeacherListQuery::default()).unwrap();
    assert_eq!(all.len(), 3);
}

#[test]
fn assistant_roundtrip_and_update() {
    let conn = open_db_in_memory().unwrap();
    let staff = SqliteStaffRepository::try_new(&conn).unwrap();

    let mut record = assistant("X-77");
    staff.create_assistant(&record).unwrap();

    record.position = "Portero".to_string();
    record.weekly_hours = 30;
    staff.update_assistant(&record).unwrap();

    let loaded = staff.get_assistant(record.id()).unwrap().unwrap();
    assert_eq!(loaded.position, "Portero");
    assert_eq!(loaded.weekly_hours, 30);
    assert_eq!(loaded.hired_on, day(2022, 3, 1));
    assert_eq!(staff.list_assistants(&Page::default()).unwrap().len(), 1);
}

#[test]
fn assignments_require_existing_references() {
    let conn = open_db_in_memory().unwrap();
    let staff = SqliteStaffRepository::try_new(&conn).unwrap();
    let assignments = SqliteAssignmentRepository::try_new(&conn).unwrap();

    let record = teacher("1-9", Role::ClassroomTeacher, SubsidyType::Normal);
    staff.create_teacher(&record).unwrap();

    let unknown_school =
        TeacherAssignment::new(record.id(), 4242, day(2024, 3, 1), day(2024, 12, 31));
    assert!(matches!(
        assignments.create_teacher_assignment(&unknown_school),
        Err(RepoError::MissingReference(RecordRef::Establishment(4242)))
    ));

    let ghost = Uuid::new_v4();
    let unknown_teacher = TeacherAssignment::new(ghost, 4242, day(2024, 3, 1), day(2024, 12, 31));
    assert!(matches!(
        assignments.create_teacher_assignment(&unknown_teacher),
        Err(RepoError::MissingReference(RecordRef::Teacher(id))) if id == ghost
    ));
}

#[test]
fn reversed_date_ranges_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let staff = SqliteStaffRepository::try_new(&conn).unwrap();
    let establishments = SqliteEstablishmentRepository::try_new(&conn).unwrap();
    let assignments = SqliteAssignmentRepository::try_new(&conn).unwrap();

    let record = teacher("1-9", Role::ClassroomTeacher, SubsidyType::Normal);
    staff.create_teacher(&record).unwrap();
    establishments
        .create_establishment(&Establishment::new(8480, '4', "Escuela Los Aromos"))
        .unwrap();

    let reversed = TeacherAssignment::new(record.id(), 8480, day(2024, 12, 31), day(2024, 3, 1));
    assert!(matches!(
        assignments.create_teacher_assignment(&reversed),
        Err(RepoError::Validation(RecordValidationError::InvalidDateRange { .. }))
    ));

    let raw = conn.execute(
        "INSERT INTO bienniums (id, teacher_id, start_date, end_date, accrued_hours)
         VALUES (?1, ?2, '2024-01-01', '2023-01-01', 10);",
        [Uuid::new_v4().to_string(), record.id().to_string()],
    );
    assert!(raw.is_err());
}

#[test]
fn dates_beyond_four_digit_years_fail_validation() {
    let conn = open_db_in_memory().unwrap();
    let staff = SqliteStaffRepository::try_new(&conn).unwrap();
    let assignments = SqliteAssignmentRepository::try_new(&conn).unwrap();

    let record = teacher("1-9", Role::ClassroomTeacher, SubsidyType::Normal);
    staff.create_teacher(&record).unwrap();

    let far = Biennium::new(record.id(), day(9999, 1, 1), day(10_001, 1, 1), 10);
    assert!(matches!(
        assignments.create_biennium(&far),
        Err(RepoError::Validation(RecordValidationError::DateOutOfRange {
            field: "end_date",
            ..
        }))
    ));
    assert!(assignments.list_bienniums(record.id()).unwrap().is_empty());

    let edge = Biennium::new(record.id(), day(9998, 1, 1), day(9999, 12, 31), 10);
    assignments.create_biennium(&edge).unwrap();

    let mut late_hire = assistant("P-100");
    late_hire.hired_on = day(12_000, 3, 1);
    assert!(matches!(
        staff.create_assistant(&late_hire),
        Err(RepoError::Validation(RecordValidationError::DateOutOfRange {
            field: "hired_on",
            ..
        }))
    ));
}

#[test]
fn hour_summary_sums_active_assignments_per_subsidy() {
    let conn = open_db_in_memory().unwrap();
    let establishments = SqliteEstablishmentRepository::try_new(&conn).unwrap();
    establishments
        .create_establishment(&Establishment::new(8480, '4', "Escuela Los Aromos"))
        .unwrap();
    establishments
        .create_establishment(&Establishment::new(9120, 'K', "Liceo Costero"))
        .unwrap();

    let staff_service = StaffService::new(
        SqlitePersonRepository::try_new(&conn).unwrap(),
        SqliteStaffRepository::try_new(&conn).unwrap(),
    );
    let mut record = teacher("1-9", Role::ClassroomTeacher, SubsidyType::Normal);
    record.contract_hours = 40;
    record.subsidy_hours = SubsidyHours::new(30, 6, 4);
    let registered = staff_service.register_teacher(&record).unwrap();

    let service = AssignmentService::new(
        SqliteAssignmentRepository::try_new(&conn).unwrap(),
        SqliteStaffRepository::try_new(&conn).unwrap(),
    );
    service
        .assign_teacher(&TeacherAssignmentRequest {
            teacher_id: registered.id(),
            rbd: 8480,
            subsidy_hours: SubsidyHours::new(20, 4, 0),
            contract_hours: 24,
            start: day(2024, 3, 1),
            end: day(2024, 12, 31),
        })
        .unwrap();
    service
        .assign_teacher(&TeacherAssignmentRequest {
            teacher_id: registered.id(),
            rbd: 9120,
            subsidy_hours: SubsidyHours::new(10, 4, 2),
            contract_hours: 16,
            start: day(2024, 3, 1),
            end: day(2024, 6, 30),
        })
        .unwrap();
    service
        .record_biennium(registered.id(), day(2020, 1, 1), day(2021, 12, 31), 12)
        .unwrap();
    service
        .record_biennium(registered.id(), day(2022, 1, 1), day(2023, 12, 31), 8)
        .unwrap();

    let overall = service.hour_summary(registered.id(), None).unwrap();
    assert_eq!(overall.assignment_count, 2);
    assert_eq!(overall.assigned, SubsidyHours::new(30, 8, 2));
    assert_eq!(overall.assigned_contract_hours, 40);
    assert_eq!(overall.accrued_biennium_hours, 20);
    assert_eq!(overall.over_allocated(), vec![SubsidyType::Sep]);
    assert_eq!(overall.remaining(SubsidyType::Pie), 2);

    let in_september = service
        .hour_summary(registered.id(), Some(day(2024, 9, 1)))
        .unwrap();
    assert_eq!(in_september.assignment_count, 1);
    assert_eq!(in_september.assigned, SubsidyHours::new(20, 4, 0));
    assert!(in_september.over_allocated().is_empty());

    let ordered: Vec<u32> = service
        .teacher_assignments(registered.id())
        .unwrap()
        .iter()
        .map(|assignment| assignment.rbd)
        .collect();
    assert_eq!(ordered.len(), 2);
    assert_eq!(service.bienniums(registered.id()).unwrap().len(), 2);
}

#[test]
fn hour_summary_for_unknown_teacher_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = AssignmentService::new(
        SqliteAssignmentRepository::try_new(&conn).unwrap(),
        SqliteStaffRepository::try_new(&conn).unwrap(),
    );
    let ghost = Uuid::new_v4();
    assert!(matches!(
        service.hour_summary(ghost, None),
        Err(ServiceError::NotFound(RecordRef::Teacher(id))) if id == ghost
    ));
}

#[test]
fn deleting_teacher_cascades_to_assignments_and_bienniums() {
    let conn = open_db_in_memory().unwrap();
    let persons = SqlitePersonRepository::try_new(&conn).unwrap();
    let staff = SqliteStaffRepository::try_new(&conn).unwrap();
    let establishments = SqliteEstablishmentRepository::try_new(&conn).unwrap();
    let assignments = SqliteAssignmentRepository::try_new(&conn).unwrap();

    let record = teacher("1-9", Role::ClassroomTeacher, SubsidyType::Normal);
    staff.create_teacher(&record).unwrap();
    establishments
        .create_establishment(&Establishment::new(8480, '4', "Escuela Los Aromos"))
        .unwrap();
    assignments
        .create_teacher_assignment(&TeacherAssignment::new(
            record.id(),
            8480,
            day(2024, 3, 1),
            day(2024, 12, 31),
        ))
        .unwrap();

    persons.delete_person(record.id()).unwrap();

    assert!(staff.get_teacher(record.id()).unwrap().is_none());
    assert!(assignments
        .list_establishment_assignments(8480)
        .unwrap()
        .is_empty());
    assert!(assignments.list_bienniums(record.id()).unwrap().is_empty());
}

#[test]
fn assistant_assignment_requires_assistant_record() {
    let conn = open_db_in_memory().unwrap();
    let staff = SqliteStaffRepository::try_new(&conn).unwrap();
    let establishments = SqliteEstablishmentRepository::try_new(&conn).unwrap();
    establishments
        .create_establishment(&Establishment::new(8480, '4', "Escuela Los Aromos"))
        .unwrap();

    let service = AssignmentService::new(
        SqliteAssignmentRepository::try_new(&conn).unwrap(),
        SqliteStaffRepository::try_new(&conn).unwrap(),
    );
    let not_hired = Uuid::new_v4();
    assert!(matches!(
        service.assign_assistant(not_hired, 8480, day(2024, 3, 1), day(2024, 12, 31)),
        Err(ServiceError::Repo(RepoError::MissingReference(RecordRef::Assistant(_))))
    ));

    let record = assistant("X-77");
    staff.create_assistant(&record).unwrap();
    service
        .assign_assistant(record.id(), 8480, day(2024, 3, 1), day(2024, 12, 31))
        .unwrap();
    assert_eq!(service.assistant_assignments(record.id()).unwrap().len(), 1);
}

#[test]
fn document_state_can_be_changed_and_removed() {
    let conn = open_db_in_memory().unwrap();
    let persons = SqlitePersonRepository::try_new(&conn).unwrap();
    let person = Person::new("Rosa", "Perez", "Lagos").with_foreign_id("X-77");
    persons.create_person(&person).unwrap();

    let service = DocumentService::new(SqliteDocumentRepository::try_new(&conn).unwrap());
    assert!(matches!(
        service.attach(Uuid::new_v4(), "Titulo", "docs/titulo.pdf"),
        Err(ServiceError::Repo(RepoError::MissingReference(RecordRef::Person(_))))
    ));

    let document = service
        .attach(person.id, "Certificado de antecedentes", "docs/antecedentes.pdf")
        .unwrap();
    assert_eq!(document.state, DocumentState::Yes);

    service.mark(document.id, DocumentState::NotApplicable).unwrap();
    let listed = service.list(person.id).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].state, DocumentState::NotApplicable);

    service.remove(document.id).unwrap();
    assert!(service.list(person.id).unwrap().is_empty());
    assert!(matches!(
        service.remove(document.id),
        Err(ServiceError::NotFound(RecordRef::Document(_)))
    ));
}
