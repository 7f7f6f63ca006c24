//! Write and lookup paths for every record type.
//!
//! `PortalClient` hands out one lightweight repository per entity, all
//! borrowing the same connection. Every write validates the §-invariants of
//! its record before touching the database: uniqueness conflicts and bad
//! input surface as typed errors and nothing is persisted. Deletes that own
//! children tear the whole subtree down inside a single transaction.

mod cascade;
mod classes;
mod enrollments;
mod exams;
mod grades;
mod students;
mod subjects;
mod teachers;

pub use classes::{ClassRepo, NewClass};
pub use enrollments::{EnrollmentRepo, NewEnrollment};
pub use exams::{ExamPatch, ExamRepo, NewExam, DEFAULT_PASS_MARKS, DEFAULT_TOTAL_MARKS};
pub use grades::{GradePatch, GradeRepo, NewGrade};
pub use students::{NewStudent, StudentPatch, StudentRepo};
pub use subjects::{NewSubject, SubjectRepo};
pub use teachers::{NewTeacher, TeacherPatch, TeacherRepo};

use sea_orm::DatabaseConnection;

use crate::directory::Directory;

/// Entry point for everything that reads or writes records.
pub struct PortalClient {
    db: DatabaseConnection,
}

impl PortalClient {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn students(&self) -> StudentRepo<'_> {
        StudentRepo { conn: &self.db }
    }

    pub fn teachers(&self) -> TeacherRepo<'_> {
        TeacherRepo { conn: &self.db }
    }

    pub fn classes(&self) -> ClassRepo<'_> {
        ClassRepo { conn: &self.db }
    }

    pub fn subjects(&self) -> SubjectRepo<'_> {
        SubjectRepo { conn: &self.db }
    }

    pub fn enrollments(&self) -> EnrollmentRepo<'_> {
        EnrollmentRepo { conn: &self.db }
    }

    pub fn exams(&self) -> ExamRepo<'_> {
        ExamRepo { conn: &self.db }
    }

    pub fn grades(&self) -> GradeRepo<'_> {
        GradeRepo { conn: &self.db }
    }

    /// The public student directory.
    pub fn directory(&self) -> Directory<'_> {
        Directory::new(&self.db)
    }
}
