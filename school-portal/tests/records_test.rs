use rust_decimal::Decimal;

pub mod helpers {
    use chrono::NaiveDate;
    use migration::Migrator;
    use sea_orm::{Database, DatabaseConnection};
    use sea_orm_migration::MigratorTrait;

    use school_portal::repo::{NewClass, NewExam, NewStudent, NewSubject, NewTeacher};
    use school_portal::{AcademicYear, ExamType, PortalClient, Section};

    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn year() -> AcademicYear {
        AcademicYear::parse("2024-2025").unwrap()
    }

    pub fn new_student(student_id: i32, first: &str, last: &str) -> NewStudent {
        NewStudent {
            first_name: first.to_owned(),
            last_name: last.to_owned(),
            date_of_birth: date(2010, 6, 15),
            nationality: "Bangladeshi".to_owned(),
            student_id,
            roll_number: 1,
            phone_number: None,
            email: None,
            photo: None,
            blood_group: None,
            birth_certificate_id: None,
            fathers_name: "Father".to_owned(),
            fathers_nid: "12345678901234567".to_owned(),
            mothers_name: "Mother".to_owned(),
            mothers_nid: "76543210987654321".to_owned(),
        }
    }

    pub fn new_teacher(teacher_id: i32, last: &str, email: &str) -> NewTeacher {
        NewTeacher {
            first_name: "Taslima".to_owned(),
            last_name: last.to_owned(),
            teacher_id,
            teacher_nid: "11122233344455566".to_owned(),
            phone_number: None,
            email: email.to_owned(),
            photo: None,
            blood_group: None,
            hire_date: date(2018, 1, 10),
        }
    }

    /// Seed teacher -> class -> subject -> exam, returning their ids.
    pub async fn seed_exam(client: &PortalClient) -> (i32, i32, i32, i32) {
        let teacher = client
            .teachers()
            .create(new_teacher(501, "Rahman", "rahman@school.example"))
            .await
            .unwrap();
        let class = client
            .classes()
            .create(NewClass {
                class_name: "Six".to_owned(),
                section: Section::A,
                class_teacher_id: teacher.id,
                teacher_ids: vec![teacher.id],
            })
            .await
            .unwrap();
        let subject = client
            .subjects()
            .create(NewSubject {
                subject_name: "Mathematics".to_owned(),
                class_id: class.id,
                teacher_ids: vec![teacher.id],
            })
            .await
            .unwrap();
        let exam = client
            .exams()
            .schedule(NewExam {
                exam_name: "Mid-Term".to_owned(),
                exam_type: ExamType::Midterm,
                subject_id: subject.id,
                class_id: class.id,
                academic_year: year(),
                exam_date: date(2024, 11, 12),
                total_marks: None,
                pass_marks: None,
                duration_minutes: 90,
            })
            .await
            .unwrap();
        (teacher.id, class.id, subject.id, exam.id)
    }
}

#[cfg(test)]
mod records_tests {
    use super::helpers::{date, new_student, new_teacher, seed_exam, setup_test_db, year};
    use super::*;
    use sea_orm::{EntityTrait, PaginatorTrait};

    use school_portal::entities::{class, enrollment, exam, grade, student, subject, teacher};
    use school_portal::repo::{
        ExamPatch, GradePatch, NewClass, NewEnrollment, NewExam, NewGrade, StudentPatch,
    };
    use school_portal::{
        AcademicYear, EnrollmentStatus, ExamType, LetterGrade, PortalClient, PortalError, Section,
    };

    #[tokio::test]
    async fn create_and_fetch_student() {
        let db = setup_test_db().await;
        let client = PortalClient::new(db);

        let created = client
            .students()
            .create(new_student(22641, "Alice", "Smith"))
            .await
            .unwrap();
        assert_eq!(created.full_name(), "Alice Smith");
        assert_eq!(created.created_at, created.updated_at);

        let fetched = client.students().get_by_student_id(22641).await.unwrap();
        assert_eq!(fetched.id, created.id);

        let missing = client.students().get_by_student_id(99999).await;
        assert!(matches!(missing, Err(PortalError::NotFound { .. })));
    }

    #[tokio::test]
    async fn duplicate_student_id_rejected() {
        let db = setup_test_db().await;
        let client = PortalClient::new(db);

        client
            .students()
            .create(new_student(22641, "Alice", "Smith"))
            .await
            .unwrap();
        let second = client
            .students()
            .create(new_student(22641, "Bob", "Jones"))
            .await;
        assert!(matches!(second, Err(PortalError::Conflict { .. })));

        // The conflicting submission was not persisted.
        let total = student::Entity::find().count(client.db()).await.unwrap();
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn student_update_refreshes_timestamp() {
        let db = setup_test_db().await;
        let client = PortalClient::new(db);

        let created = client
            .students()
            .create(new_student(22641, "Alice", "Smith"))
            .await
            .unwrap();
        let updated = client
            .students()
            .update(
                created.id,
                StudentPatch {
                    nationality: Some("Indian".to_owned()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.nationality, "Indian");
        assert_eq!(updated.student_id, created.student_id);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn teacher_uniqueness() {
        let db = setup_test_db().await;
        let client = PortalClient::new(db);

        client
            .teachers()
            .create(new_teacher(501, "Rahman", "rahman@school.example"))
            .await
            .unwrap();

        let same_id = client
            .teachers()
            .create(new_teacher(501, "Khan", "khan@school.example"))
            .await;
        assert!(matches!(same_id, Err(PortalError::Conflict { .. })));

        let same_email = client
            .teachers()
            .create(new_teacher(502, "Khan", "rahman@school.example"))
            .await;
        assert!(matches!(same_email, Err(PortalError::Conflict { .. })));
    }

    #[tokio::test]
    async fn enrollment_unique_per_student_class_year() {
        let db = setup_test_db().await;
        let client = PortalClient::new(db);
        let (_, class_id, _, _) = seed_exam(&client).await;
        let student = client
            .students()
            .create(new_student(22641, "Alice", "Smith"))
            .await
            .unwrap();

        let first = client
            .enrollments()
            .enroll(NewEnrollment {
                student_id: student.id,
                class_id,
                academic_year: year(),
                enrollment_date: date(2024, 1, 5),
                status: None,
            })
            .await
            .unwrap();
        assert_eq!(first.status, EnrollmentStatus::Active);

        let duplicate = client
            .enrollments()
            .enroll(NewEnrollment {
                student_id: student.id,
                class_id,
                academic_year: year(),
                enrollment_date: date(2024, 2, 1),
                status: None,
            })
            .await;
        assert!(matches!(duplicate, Err(PortalError::Conflict { .. })));

        // Same class in the following year is a fresh enrollment.
        let next_year = client
            .enrollments()
            .enroll(NewEnrollment {
                student_id: student.id,
                class_id,
                academic_year: AcademicYear::parse("2025-2026").unwrap(),
                enrollment_date: date(2025, 1, 6),
                status: None,
            })
            .await
            .unwrap();

        let history = client.enrollments().for_student(student.id).await.unwrap();
        assert_eq!(history.len(), 2);
        // Newest first.
        assert_eq!(history[0].id, next_year.id);

        let graduated = client
            .enrollments()
            .set_status(first.id, EnrollmentStatus::Graduated)
            .await
            .unwrap();
        assert_eq!(graduated.status, EnrollmentStatus::Graduated);
    }

    #[tokio::test]
    async fn exam_defaults_and_uniqueness() {
        let db = setup_test_db().await;
        let client = PortalClient::new(db);
        let (_, class_id, subject_id, exam_id) = seed_exam(&client).await;

        let exam = client.exams().get(exam_id).await.unwrap();
        assert_eq!(exam.total_marks, 100);
        assert_eq!(exam.pass_marks, 40);

        let duplicate = client
            .exams()
            .schedule(NewExam {
                exam_name: "Mid-Term".to_owned(),
                exam_type: ExamType::Midterm,
                subject_id,
                class_id,
                academic_year: year(),
                exam_date: date(2024, 11, 19),
                total_marks: None,
                pass_marks: None,
                duration_minutes: 60,
            })
            .await;
        assert!(matches!(duplicate, Err(PortalError::Conflict { .. })));

        // Same name in another year is allowed.
        client
            .exams()
            .schedule(NewExam {
                exam_name: "Mid-Term".to_owned(),
                exam_type: ExamType::Midterm,
                subject_id,
                class_id,
                academic_year: AcademicYear::parse("2025-2026").unwrap(),
                exam_date: date(2025, 11, 11),
                total_marks: None,
                pass_marks: None,
                duration_minutes: 60,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn exam_mark_scheme_guards() {
        let db = setup_test_db().await;
        let client = PortalClient::new(db);
        let (_, class_id, subject_id, exam_id) = seed_exam(&client).await;

        let inverted = client
            .exams()
            .schedule(NewExam {
                exam_name: "Practical".to_owned(),
                exam_type: ExamType::Practical,
                subject_id,
                class_id,
                academic_year: year(),
                exam_date: date(2024, 12, 2),
                total_marks: Some(50),
                pass_marks: Some(60),
                duration_minutes: 45,
            })
            .await;
        assert!(matches!(inverted, Err(PortalError::Validation { .. })));

        let zero_total = client
            .exams()
            .schedule(NewExam {
                exam_name: "Practical".to_owned(),
                exam_type: ExamType::Practical,
                subject_id,
                class_id,
                academic_year: year(),
                exam_date: date(2024, 12, 2),
                total_marks: Some(0),
                pass_marks: Some(0),
                duration_minutes: 45,
            })
            .await;
        assert!(matches!(zero_total, Err(PortalError::Validation { .. })));

        // An update cannot push the pass bar above the total either.
        let bad_patch = client
            .exams()
            .update(
                exam_id,
                ExamPatch {
                    pass_marks: Some(150),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(bad_patch, Err(PortalError::Validation { .. })));
    }

    #[tokio::test]
    async fn grade_validation_and_uniqueness() {
        let db = setup_test_db().await;
        let client = PortalClient::new(db);
        let (_, _, _, exam_id) = seed_exam(&client).await;
        let student = client
            .students()
            .create(new_student(22641, "Alice", "Smith"))
            .await
            .unwrap();

        let negative = client
            .grades()
            .record(NewGrade {
                student_id: student.id,
                exam_id,
                marks_obtained: Decimal::new(-100, 2),
                is_absent: false,
                remarks: None,
            })
            .await;
        assert!(matches!(negative, Err(PortalError::Validation { .. })));

        let too_precise = client
            .grades()
            .record(NewGrade {
                student_id: student.id,
                exam_id,
                marks_obtained: Decimal::new(40125, 3),
                is_absent: false,
                remarks: None,
            })
            .await;
        assert!(matches!(too_precise, Err(PortalError::Validation { .. })));

        client
            .grades()
            .record(NewGrade {
                student_id: student.id,
                exam_id,
                marks_obtained: Decimal::new(4000, 2),
                is_absent: false,
                remarks: None,
            })
            .await
            .unwrap();

        let duplicate = client
            .grades()
            .record(NewGrade {
                student_id: student.id,
                exam_id,
                marks_obtained: Decimal::new(5500, 2),
                is_absent: false,
                remarks: None,
            })
            .await;
        assert!(matches!(duplicate, Err(PortalError::Conflict { .. })));
        let total = grade::Entity::find().count(client.db()).await.unwrap();
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn pass_boundary_report() {
        let db = setup_test_db().await;
        let client = PortalClient::new(db);
        let (_, _, _, exam_id) = seed_exam(&client).await;
        let student = client
            .students()
            .create(new_student(22641, "Alice", "Smith"))
            .await
            .unwrap();

        let graded = client
            .grades()
            .record(NewGrade {
                student_id: student.id,
                exam_id,
                marks_obtained: Decimal::new(4000, 2),
                is_absent: false,
                remarks: None,
            })
            .await
            .unwrap();

        let report = client.grades().report(graded.id).await.unwrap();
        assert_eq!(report.percentage, Decimal::from(40));
        assert_eq!(report.letter, LetterGrade::C);
        assert!(report.passed);
    }

    #[tokio::test]
    async fn absent_grade_report() {
        let db = setup_test_db().await;
        let client = PortalClient::new(db);
        let (_, _, _, exam_id) = seed_exam(&client).await;
        let student = client
            .students()
            .create(new_student(22641, "Alice", "Smith"))
            .await
            .unwrap();

        let graded = client
            .grades()
            .record(NewGrade {
                student_id: student.id,
                exam_id,
                marks_obtained: Decimal::from(95),
                is_absent: true,
                remarks: Some("absent with leave".to_owned()),
            })
            .await
            .unwrap();

        let report = client.grades().report(graded.id).await.unwrap();
        assert_eq!(report.percentage, Decimal::ZERO);
        assert_eq!(report.letter, LetterGrade::Absent);
        assert!(!report.passed);
    }

    #[tokio::test]
    async fn grade_patch_cannot_move_identity() {
        let db = setup_test_db().await;
        let client = PortalClient::new(db);
        let (_, _, _, exam_id) = seed_exam(&client).await;
        let student = client
            .students()
            .create(new_student(22641, "Alice", "Smith"))
            .await
            .unwrap();

        let graded = client
            .grades()
            .record(NewGrade {
                student_id: student.id,
                exam_id,
                marks_obtained: Decimal::new(3500, 2),
                is_absent: false,
                remarks: None,
            })
            .await
            .unwrap();

        let updated = client
            .grades()
            .update(
                graded.id,
                GradePatch {
                    marks_obtained: Some(Decimal::new(6550, 2)),
                    remarks: Some(Some("re-checked".to_owned())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        // Marks and remarks moved; the (student, exam) identity did not.
        assert_eq!(updated.marks_obtained, Decimal::new(6550, 2));
        assert_eq!(updated.remarks.as_deref(), Some("re-checked"));
        assert_eq!(updated.student_id, student.id);
        assert_eq!(updated.exam_id, exam_id);
        assert!(updated.updated_at >= graded.updated_at);
    }

    #[tokio::test]
    async fn teacher_delete_cascades_class_tree() {
        let db = setup_test_db().await;
        let client = PortalClient::new(db);
        let (teacher_id, class_id, _, exam_id) = seed_exam(&client).await;
        let student = client
            .students()
            .create(new_student(22641, "Alice", "Smith"))
            .await
            .unwrap();
        client
            .enrollments()
            .enroll(NewEnrollment {
                student_id: student.id,
                class_id,
                academic_year: year(),
                enrollment_date: date(2024, 1, 5),
                status: None,
            })
            .await
            .unwrap();
        client
            .grades()
            .record(NewGrade {
                student_id: student.id,
                exam_id,
                marks_obtained: Decimal::new(7200, 2),
                is_absent: false,
                remarks: None,
            })
            .await
            .unwrap();

        // An unrelated teacher with their own class survives the teardown.
        let other = client
            .teachers()
            .create(new_teacher(777, "Begum", "begum@school.example"))
            .await
            .unwrap();
        let other_class = client
            .classes()
            .create(NewClass {
                class_name: "Seven".to_owned(),
                section: Section::B,
                class_teacher_id: other.id,
                teacher_ids: vec![],
            })
            .await
            .unwrap();

        client.teachers().delete(teacher_id).await.unwrap();

        let conn = client.db();
        assert_eq!(class::Entity::find().count(conn).await.unwrap(), 1);
        assert_eq!(subject::Entity::find().count(conn).await.unwrap(), 0);
        assert_eq!(exam::Entity::find().count(conn).await.unwrap(), 0);
        assert_eq!(grade::Entity::find().count(conn).await.unwrap(), 0);
        assert_eq!(enrollment::Entity::find().count(conn).await.unwrap(), 0);
        assert_eq!(teacher::Entity::find().count(conn).await.unwrap(), 1);
        // The student record itself is not owned by the class.
        assert_eq!(student::Entity::find().count(conn).await.unwrap(), 1);

        let survivor = client.classes().get(other_class.id).await.unwrap();
        assert_eq!(survivor.class_teacher_id, other.id);
    }

    #[tokio::test]
    async fn student_delete_cascades_own_records() {
        let db = setup_test_db().await;
        let client = PortalClient::new(db);
        let (_, class_id, _, exam_id) = seed_exam(&client).await;
        let student = client
            .students()
            .create(new_student(22641, "Alice", "Smith"))
            .await
            .unwrap();
        client
            .enrollments()
            .enroll(NewEnrollment {
                student_id: student.id,
                class_id,
                academic_year: year(),
                enrollment_date: date(2024, 1, 5),
                status: None,
            })
            .await
            .unwrap();
        client
            .grades()
            .record(NewGrade {
                student_id: student.id,
                exam_id,
                marks_obtained: Decimal::new(8100, 2),
                is_absent: false,
                remarks: None,
            })
            .await
            .unwrap();

        client.students().delete(student.id).await.unwrap();

        let conn = client.db();
        assert_eq!(grade::Entity::find().count(conn).await.unwrap(), 0);
        assert_eq!(enrollment::Entity::find().count(conn).await.unwrap(), 0);
        // The class and exam the student sat are untouched.
        assert_eq!(exam::Entity::find().count(conn).await.unwrap(), 1);
        assert_eq!(class::Entity::find().count(conn).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn class_staff_management() {
        let db = setup_test_db().await;
        let client = PortalClient::new(db);
        let (teacher_id, class_id, subject_id, _) = seed_exam(&client).await;
        let other = client
            .teachers()
            .create(new_teacher(777, "Begum", "begum@school.example"))
            .await
            .unwrap();

        client.classes().add_teacher(class_id, other.id).await.unwrap();
        let again = client.classes().add_teacher(class_id, other.id).await;
        assert!(matches!(again, Err(PortalError::Conflict { .. })));

        let staff = client.classes().staff(class_id).await.unwrap();
        assert_eq!(staff.len(), 2);

        client
            .classes()
            .remove_teacher(class_id, other.id)
            .await
            .unwrap();
        let staff = client.classes().staff(class_id).await.unwrap();
        assert_eq!(staff.len(), 1);
        assert_eq!(staff[0].id, teacher_id);

        client
            .subjects()
            .assign_teacher(subject_id, other.id)
            .await
            .unwrap();
        let teachers = client.subjects().teachers(subject_id).await.unwrap();
        assert_eq!(teachers.len(), 2);

        let lead = client.classes().lead_teacher(class_id).await.unwrap();
        assert_eq!(lead.id, teacher_id);
    }

    #[tokio::test]
    async fn result_sheet_for_exam() {
        let db = setup_test_db().await;
        let client = PortalClient::new(db);
        let (_, class_id, _, exam_id) = seed_exam(&client).await;

        for (student_id, marks, absent) in
            [(101, Decimal::new(8250, 2), false), (102, Decimal::ZERO, true)]
        {
            let student = client
                .students()
                .create(new_student(student_id, "Student", &format!("No{student_id}")))
                .await
                .unwrap();
            client
                .enrollments()
                .enroll(NewEnrollment {
                    student_id: student.id,
                    class_id,
                    academic_year: year(),
                    enrollment_date: date(2024, 1, 5),
                    status: None,
                })
                .await
                .unwrap();
            client
                .grades()
                .record(NewGrade {
                    student_id: student.id,
                    exam_id,
                    marks_obtained: marks,
                    is_absent: absent,
                    remarks: None,
                })
                .await
                .unwrap();
        }

        let roster = client
            .enrollments()
            .for_class(class_id, Some(&year()))
            .await
            .unwrap();
        assert_eq!(roster.len(), 2);

        let sheet = client.grades().reports_for_exam(exam_id).await.unwrap();
        assert_eq!(sheet.len(), 2);
        let passed: Vec<LetterGrade> = sheet.iter().map(|report| report.letter).collect();
        assert!(passed.contains(&LetterGrade::APlus));
        assert!(passed.contains(&LetterGrade::Absent));
    }

    #[tokio::test]
    async fn subject_delete_cascades_exams() {
        let db = setup_test_db().await;
        let client = PortalClient::new(db);
        let (_, _, subject_id, exam_id) = seed_exam(&client).await;
        let student = client
            .students()
            .create(new_student(22641, "Alice", "Smith"))
            .await
            .unwrap();
        client
            .grades()
            .record(NewGrade {
                student_id: student.id,
                exam_id,
                marks_obtained: Decimal::new(5025, 2),
                is_absent: false,
                remarks: None,
            })
            .await
            .unwrap();

        client.subjects().delete(subject_id).await.unwrap();

        let conn = client.db();
        assert_eq!(subject::Entity::find().count(conn).await.unwrap(), 0);
        assert_eq!(exam::Entity::find().count(conn).await.unwrap(), 0);
        assert_eq!(grade::Entity::find().count(conn).await.unwrap(), 0);
        // The class stays; only the subject subtree went.
        assert_eq!(class::Entity::find().count(conn).await.unwrap(), 1);
    }
}
