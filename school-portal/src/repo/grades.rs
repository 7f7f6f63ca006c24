use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};

use crate::computed::GradeReport;
use crate::entities::{exam, grade, student};
use crate::error::{PortalError, PortalResult};

pub struct GradeRepo<'a> {
    pub(crate) conn: &'a DatabaseConnection,
}

#[derive(Debug, Clone)]
pub struct NewGrade {
    pub student_id: i32,
    pub exam_id: i32,
    pub marks_obtained: Decimal,
    pub is_absent: bool,
    pub remarks: Option<String>,
}

/// The fields an existing grade record allows changing. The student and
/// exam references are deliberately absent: grade identity is fixed at
/// first save.
#[derive(Debug, Clone, Default)]
pub struct GradePatch {
    pub marks_obtained: Option<Decimal>,
    pub is_absent: Option<bool>,
    pub remarks: Option<Option<String>>,
}

/// Marks live in a DECIMAL(5,2) column: non-negative, at most two
/// fractional digits, below 1000.
fn check_marks(marks: Decimal) -> PortalResult<()> {
    if marks.is_sign_negative() {
        return Err(PortalError::validation(
            "grade",
            format!("marks_obtained must not be negative, got {marks}"),
        ));
    }
    if marks != marks.round_dp(2) {
        return Err(PortalError::validation(
            "grade",
            format!("marks_obtained allows two decimal places, got {marks}"),
        ));
    }
    if marks >= Decimal::from(1000) {
        return Err(PortalError::validation(
            "grade",
            format!("marks_obtained exceeds five digits, got {marks}"),
        ));
    }
    Ok(())
}

impl GradeRepo<'_> {
    /// Record a student's marks for an exam. One grade per (student, exam);
    /// a second submission conflicts instead of overwriting.
    pub async fn record(&self, input: NewGrade) -> PortalResult<grade::Model> {
        check_marks(input.marks_obtained)?;

        let known_student = student::Entity::find_by_id(input.student_id)
            .count(self.conn)
            .await?;
        if known_student == 0 {
            return Err(PortalError::not_found(
                "student",
                format!("id {}", input.student_id),
            ));
        }
        let known_exam = exam::Entity::find_by_id(input.exam_id)
            .count(self.conn)
            .await?;
        if known_exam == 0 {
            return Err(PortalError::not_found(
                "exam",
                format!("id {}", input.exam_id),
            ));
        }

        let duplicate = grade::Entity::find()
            .filter(grade::Column::StudentId.eq(input.student_id))
            .filter(grade::Column::ExamId.eq(input.exam_id))
            .count(self.conn)
            .await?;
        if duplicate > 0 {
            return Err(PortalError::conflict(
                "grade",
                format!("student {}, exam {}", input.student_id, input.exam_id),
            ));
        }

        let row = grade::ActiveModel {
            student_id: Set(input.student_id),
            exam_id: Set(input.exam_id),
            marks_obtained: Set(input.marks_obtained),
            is_absent: Set(input.is_absent),
            remarks: Set(input.remarks),
            ..Default::default()
        }
        .insert(self.conn)
        .await?;
        log::debug!(
            "recorded grade {} (student {}, exam {})",
            row.id,
            row.student_id,
            row.exam_id
        );
        Ok(row)
    }

    pub async fn update(&self, id: i32, patch: GradePatch) -> PortalResult<grade::Model> {
        if let Some(marks) = patch.marks_obtained {
            check_marks(marks)?;
        }
        let current = self.get(id).await?;
        let mut row: grade::ActiveModel = current.into();
        if let Some(v) = patch.marks_obtained {
            row.marks_obtained = Set(v);
        }
        if let Some(v) = patch.is_absent {
            row.is_absent = Set(v);
        }
        if let Some(v) = patch.remarks {
            row.remarks = Set(v);
        }
        Ok(row.update(self.conn).await?)
    }

    pub async fn get(&self, id: i32) -> PortalResult<grade::Model> {
        grade::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_else(|| PortalError::not_found("grade", format!("id {id}")))
    }

    /// All grades for one exam.
    pub async fn for_exam(&self, exam_id: i32) -> PortalResult<Vec<grade::Model>> {
        Ok(grade::Entity::find()
            .filter(grade::Column::ExamId.eq(exam_id))
            .all(self.conn)
            .await?)
    }

    /// A student's grades across exams, most recent exam first.
    pub async fn for_student(&self, student_id: i32) -> PortalResult<Vec<grade::Model>> {
        Ok(grade::Entity::find()
            .filter(grade::Column::StudentId.eq(student_id))
            .join(JoinType::InnerJoin, grade::Relation::Exam.def())
            .order_by_desc(exam::Column::ExamDate)
            .all(self.conn)
            .await?)
    }

    /// One grade with its derived values, recomputed from the rows.
    pub async fn report(&self, id: i32) -> PortalResult<GradeReport> {
        let row = self.get(id).await?;
        let exam = row
            .find_related(exam::Entity)
            .one(self.conn)
            .await?
            .ok_or_else(|| PortalError::not_found("exam", format!("id {}", row.exam_id)))?;
        GradeReport::new(&row, &exam)
    }

    /// The full result sheet for one exam.
    pub async fn reports_for_exam(&self, exam_id: i32) -> PortalResult<Vec<GradeReport>> {
        let exam = exam::Entity::find_by_id(exam_id)
            .one(self.conn)
            .await?
            .ok_or_else(|| PortalError::not_found("exam", format!("id {exam_id}")))?;
        let rows = self.for_exam(exam_id).await?;
        rows.iter().map(|row| GradeReport::new(row, &exam)).collect()
    }

    pub async fn delete(&self, id: i32) -> PortalResult<()> {
        let res = grade::Entity::delete_by_id(id).exec(self.conn).await?;
        if res.rows_affected == 0 {
            return Err(PortalError::not_found("grade", format!("id {id}")));
        }
        Ok(())
    }
}
