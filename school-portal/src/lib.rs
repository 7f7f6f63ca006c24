//! School records core: students, teachers, classes, subjects, enrollments,
//! exams, and grades, with the derived values (age, percentage, letter
//! grade, pass flag) recomputed from row snapshots on every read.

pub mod academic_year;
pub mod computed;
pub mod db;
pub mod directory;
pub mod entities;
pub mod enums;
pub mod error;
pub mod repo;

pub use academic_year::AcademicYear;
pub use computed::{age, is_passed, letter_grade, percentage, GradeReport};
pub use db::{connect, init_logging, PortalConfig};
pub use directory::{Directory, DirectoryPage, PAGE_SIZE};
pub use enums::{BloodGroup, EnrollmentStatus, ExamType, LetterGrade, Section};
pub use error::{PortalError, PortalResult};
pub use repo::PortalClient;
