//! Ownership teardown, children first.
//!
//! The schema carries cascading foreign keys, but ownership is also enforced
//! here so the rules hold on engines where FK enforcement is off and the
//! order of deletion stays explicit. Callers hold the transaction.

use sea_orm::{ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QuerySelect};

use crate::entities::{class, class_teacher, enrollment, exam, grade, subject, subject_teacher};
use crate::error::PortalResult;

/// Delete every grade recorded against one exam.
pub(crate) async fn delete_exam_grades(txn: &DatabaseTransaction, exam_id: i32) -> PortalResult<u64> {
    let res = grade::Entity::delete_many()
        .filter(grade::Column::ExamId.eq(exam_id))
        .exec(txn)
        .await?;
    Ok(res.rows_affected)
}

/// Delete a subject with its exams, their grades, and its teaching links.
pub(crate) async fn delete_subject_tree(
    txn: &DatabaseTransaction,
    subject_id: i32,
) -> PortalResult<()> {
    let exam_ids: Vec<i32> = exam::Entity::find()
        .select_only()
        .column(exam::Column::Id)
        .filter(exam::Column::SubjectId.eq(subject_id))
        .into_tuple()
        .all(txn)
        .await?;
    for exam_id in &exam_ids {
        delete_exam_grades(txn, *exam_id).await?;
    }
    exam::Entity::delete_many()
        .filter(exam::Column::SubjectId.eq(subject_id))
        .exec(txn)
        .await?;
    subject_teacher::Entity::delete_many()
        .filter(subject_teacher::Column::SubjectId.eq(subject_id))
        .exec(txn)
        .await?;
    subject::Entity::delete_by_id(subject_id).exec(txn).await?;
    log::debug!("deleted subject {subject_id} with {} exams", exam_ids.len());
    Ok(())
}

/// Delete a class with its subjects (and below), exams, enrollments, and
/// staff links.
pub(crate) async fn delete_class_tree(txn: &DatabaseTransaction, class_id: i32) -> PortalResult<()> {
    let subject_ids: Vec<i32> = subject::Entity::find()
        .select_only()
        .column(subject::Column::Id)
        .filter(subject::Column::ClassId.eq(class_id))
        .into_tuple()
        .all(txn)
        .await?;
    for subject_id in subject_ids {
        delete_subject_tree(txn, subject_id).await?;
    }
    // Exams keyed to this class directly, in case a subject was reassigned.
    let exam_ids: Vec<i32> = exam::Entity::find()
        .select_only()
        .column(exam::Column::Id)
        .filter(exam::Column::ClassId.eq(class_id))
        .into_tuple()
        .all(txn)
        .await?;
    for exam_id in exam_ids {
        delete_exam_grades(txn, exam_id).await?;
    }
    exam::Entity::delete_many()
        .filter(exam::Column::ClassId.eq(class_id))
        .exec(txn)
        .await?;
    enrollment::Entity::delete_many()
        .filter(enrollment::Column::ClassId.eq(class_id))
        .exec(txn)
        .await?;
    class_teacher::Entity::delete_many()
        .filter(class_teacher::Column::ClassId.eq(class_id))
        .exec(txn)
        .await?;
    class::Entity::delete_by_id(class_id).exec(txn).await?;
    log::debug!("deleted class {class_id} and its subtree");
    Ok(())
}
