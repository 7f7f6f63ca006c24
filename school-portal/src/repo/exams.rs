use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};

use crate::academic_year::AcademicYear;
use crate::entities::{class, exam, subject};
use crate::enums::ExamType;
use crate::error::{PortalError, PortalResult};
use crate::repo::cascade;

pub const DEFAULT_TOTAL_MARKS: i32 = 100;
pub const DEFAULT_PASS_MARKS: i32 = 40;

pub struct ExamRepo<'a> {
    pub(crate) conn: &'a DatabaseConnection,
}

#[derive(Debug, Clone)]
pub struct NewExam {
    pub exam_name: String,
    pub exam_type: ExamType,
    pub subject_id: i32,
    pub class_id: i32,
    pub academic_year: AcademicYear,
    pub exam_date: sea_orm::prelude::Date,
    /// Defaults to 100.
    pub total_marks: Option<i32>,
    /// Defaults to 40.
    pub pass_marks: Option<i32>,
    pub duration_minutes: i32,
}

#[derive(Debug, Clone, Default)]
pub struct ExamPatch {
    pub exam_name: Option<String>,
    pub exam_type: Option<ExamType>,
    pub academic_year: Option<AcademicYear>,
    pub exam_date: Option<sea_orm::prelude::Date>,
    pub total_marks: Option<i32>,
    pub pass_marks: Option<i32>,
    pub duration_minutes: Option<i32>,
}

/// A pass bar above the total, or a zero/negative total, can never be
/// satisfied or computed against; both are rejected at submission.
fn check_mark_scheme(total_marks: i32, pass_marks: i32) -> PortalResult<()> {
    if total_marks <= 0 {
        return Err(PortalError::validation(
            "exam",
            format!("total_marks must be positive, got {total_marks}"),
        ));
    }
    if pass_marks < 0 {
        return Err(PortalError::validation(
            "exam",
            format!("pass_marks must not be negative, got {pass_marks}"),
        ));
    }
    if pass_marks > total_marks {
        return Err(PortalError::validation(
            "exam",
            format!("pass_marks {pass_marks} exceeds total_marks {total_marks}"),
        ));
    }
    Ok(())
}

impl ExamRepo<'_> {
    pub async fn schedule(&self, input: NewExam) -> PortalResult<exam::Model> {
        let total_marks = input.total_marks.unwrap_or(DEFAULT_TOTAL_MARKS);
        let pass_marks = input.pass_marks.unwrap_or(DEFAULT_PASS_MARKS);
        check_mark_scheme(total_marks, pass_marks)?;
        if input.duration_minutes <= 0 {
            return Err(PortalError::validation(
                "exam",
                format!("duration must be positive, got {} minutes", input.duration_minutes),
            ));
        }

        let known_subject = subject::Entity::find_by_id(input.subject_id)
            .count(self.conn)
            .await?;
        if known_subject == 0 {
            return Err(PortalError::not_found(
                "subject",
                format!("id {}", input.subject_id),
            ));
        }
        let known_class = class::Entity::find_by_id(input.class_id)
            .count(self.conn)
            .await?;
        if known_class == 0 {
            return Err(PortalError::not_found(
                "class",
                format!("id {}", input.class_id),
            ));
        }

        let duplicate = exam::Entity::find()
            .filter(exam::Column::ExamName.eq(input.exam_name.as_str()))
            .filter(exam::Column::SubjectId.eq(input.subject_id))
            .filter(exam::Column::ClassId.eq(input.class_id))
            .filter(exam::Column::AcademicYear.eq(input.academic_year.as_str()))
            .count(self.conn)
            .await?;
        if duplicate > 0 {
            return Err(PortalError::conflict(
                "exam",
                format!(
                    "{} for subject {}, class {}, year {}",
                    input.exam_name, input.subject_id, input.class_id, input.academic_year
                ),
            ));
        }

        let row = exam::ActiveModel {
            exam_name: Set(input.exam_name),
            exam_type: Set(input.exam_type),
            subject_id: Set(input.subject_id),
            class_id: Set(input.class_id),
            academic_year: Set(input.academic_year.as_str().to_owned()),
            exam_date: Set(input.exam_date),
            total_marks: Set(total_marks),
            pass_marks: Set(pass_marks),
            duration_minutes: Set(input.duration_minutes),
            ..Default::default()
        }
        .insert(self.conn)
        .await?;
        log::debug!("scheduled exam {} ({})", row.id, row.exam_name);
        Ok(row)
    }

    pub async fn update(&self, id: i32, patch: ExamPatch) -> PortalResult<exam::Model> {
        let current = self.get(id).await?;

        let total_marks = patch.total_marks.unwrap_or(current.total_marks);
        let pass_marks = patch.pass_marks.unwrap_or(current.pass_marks);
        check_mark_scheme(total_marks, pass_marks)?;

        let exam_name = patch.exam_name.clone().unwrap_or_else(|| current.exam_name.clone());
        let academic_year = patch
            .academic_year
            .as_ref()
            .map(|y| y.as_str().to_owned())
            .unwrap_or_else(|| current.academic_year.clone());
        if exam_name != current.exam_name || academic_year != current.academic_year {
            let duplicate = exam::Entity::find()
                .filter(exam::Column::ExamName.eq(exam_name.as_str()))
                .filter(exam::Column::SubjectId.eq(current.subject_id))
                .filter(exam::Column::ClassId.eq(current.class_id))
                .filter(exam::Column::AcademicYear.eq(academic_year.as_str()))
                .filter(exam::Column::Id.ne(id))
                .count(self.conn)
                .await?;
            if duplicate > 0 {
                return Err(PortalError::conflict(
                    "exam",
                    format!(
                        "{exam_name} for subject {}, class {}, year {academic_year}",
                        current.subject_id, current.class_id
                    ),
                ));
            }
        }

        let mut row: exam::ActiveModel = current.into();
        if let Some(v) = patch.exam_name {
            row.exam_name = Set(v);
        }
        if let Some(v) = patch.exam_type {
            row.exam_type = Set(v);
        }
        if let Some(v) = patch.academic_year {
            row.academic_year = Set(v.as_str().to_owned());
        }
        if let Some(v) = patch.exam_date {
            row.exam_date = Set(v);
        }
        if let Some(v) = patch.total_marks {
            row.total_marks = Set(v);
        }
        if let Some(v) = patch.pass_marks {
            row.pass_marks = Set(v);
        }
        if let Some(v) = patch.duration_minutes {
            if v <= 0 {
                return Err(PortalError::validation(
                    "exam",
                    format!("duration must be positive, got {v} minutes"),
                ));
            }
            row.duration_minutes = Set(v);
        }
        Ok(row.update(self.conn).await?)
    }

    pub async fn get(&self, id: i32) -> PortalResult<exam::Model> {
        exam::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_else(|| PortalError::not_found("exam", format!("id {id}")))
    }

    /// Exams sat by one class, newest first.
    pub async fn for_class(&self, class_id: i32) -> PortalResult<Vec<exam::Model>> {
        Ok(exam::Entity::find()
            .filter(exam::Column::ClassId.eq(class_id))
            .order_by_desc(exam::Column::ExamDate)
            .all(self.conn)
            .await?)
    }

    /// Exams for one subject, newest first.
    pub async fn for_subject(&self, subject_id: i32) -> PortalResult<Vec<exam::Model>> {
        Ok(exam::Entity::find()
            .filter(exam::Column::SubjectId.eq(subject_id))
            .order_by_desc(exam::Column::ExamDate)
            .all(self.conn)
            .await?)
    }

    /// Delete the exam and every grade recorded against it.
    pub async fn delete(&self, id: i32) -> PortalResult<()> {
        self.get(id).await?;
        let txn = self.conn.begin().await?;
        let grades = cascade::delete_exam_grades(&txn, id).await?;
        exam::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        log::debug!("deleted exam {id} ({grades} grades)");
        Ok(())
    }
}
