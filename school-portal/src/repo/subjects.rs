use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};

use crate::entities::{class, subject, subject_teacher, teacher};
use crate::error::{PortalError, PortalResult};
use crate::repo::cascade;

pub struct SubjectRepo<'a> {
    pub(crate) conn: &'a DatabaseConnection,
}

#[derive(Debug, Clone)]
pub struct NewSubject {
    pub subject_name: String,
    pub class_id: i32,
    pub teacher_ids: Vec<i32>,
}

impl SubjectRepo<'_> {
    pub async fn create(&self, input: NewSubject) -> PortalResult<subject::Model> {
        let known_class = class::Entity::find_by_id(input.class_id)
            .count(self.conn)
            .await?;
        if known_class == 0 {
            return Err(PortalError::not_found(
                "class",
                format!("id {}", input.class_id),
            ));
        }

        let mut teachers = input.teacher_ids;
        teachers.sort_unstable();
        teachers.dedup();
        for teacher_id in &teachers {
            let known = teacher::Entity::find_by_id(*teacher_id)
                .count(self.conn)
                .await?;
            if known == 0 {
                return Err(PortalError::not_found("teacher", format!("id {teacher_id}")));
            }
        }

        let txn = self.conn.begin().await?;
        let row = subject::ActiveModel {
            subject_name: Set(input.subject_name),
            class_id: Set(input.class_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        for teacher_id in &teachers {
            subject_teacher::ActiveModel {
                subject_id: Set(row.id),
                teacher_id: Set(*teacher_id),
            }
            .insert(&txn)
            .await?;
        }
        txn.commit().await?;
        Ok(row)
    }

    pub async fn get(&self, id: i32) -> PortalResult<subject::Model> {
        subject::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_else(|| PortalError::not_found("subject", format!("id {id}")))
    }

    /// Subjects taught in one class, as the class screen lists them.
    pub async fn for_class(&self, class_id: i32) -> PortalResult<Vec<subject::Model>> {
        Ok(subject::Entity::find()
            .filter(subject::Column::ClassId.eq(class_id))
            .order_by_asc(subject::Column::SubjectName)
            .all(self.conn)
            .await?)
    }

    pub async fn teachers(&self, id: i32) -> PortalResult<Vec<teacher::Model>> {
        let row = self.get(id).await?;
        Ok(row
            .find_related(teacher::Entity)
            .order_by_asc(teacher::Column::LastName)
            .all(self.conn)
            .await?)
    }

    pub async fn assign_teacher(&self, subject_id: i32, teacher_id: i32) -> PortalResult<()> {
        self.get(subject_id).await?;
        let known = teacher::Entity::find_by_id(teacher_id)
            .count(self.conn)
            .await?;
        if known == 0 {
            return Err(PortalError::not_found("teacher", format!("id {teacher_id}")));
        }
        let already = subject_teacher::Entity::find()
            .filter(subject_teacher::Column::SubjectId.eq(subject_id))
            .filter(subject_teacher::Column::TeacherId.eq(teacher_id))
            .count(self.conn)
            .await?;
        if already > 0 {
            return Err(PortalError::conflict(
                "subject teacher",
                format!("subject {subject_id}, teacher {teacher_id}"),
            ));
        }
        subject_teacher::ActiveModel {
            subject_id: Set(subject_id),
            teacher_id: Set(teacher_id),
        }
        .insert(self.conn)
        .await?;
        Ok(())
    }

    pub async fn withdraw_teacher(&self, subject_id: i32, teacher_id: i32) -> PortalResult<()> {
        let res = subject_teacher::Entity::delete_many()
            .filter(subject_teacher::Column::SubjectId.eq(subject_id))
            .filter(subject_teacher::Column::TeacherId.eq(teacher_id))
            .exec(self.conn)
            .await?;
        if res.rows_affected == 0 {
            return Err(PortalError::not_found(
                "subject teacher",
                format!("subject {subject_id}, teacher {teacher_id}"),
            ));
        }
        Ok(())
    }

    /// Delete the subject along with its exams and their grades.
    pub async fn delete(&self, id: i32) -> PortalResult<()> {
        self.get(id).await?;
        let txn = self.conn.begin().await?;
        cascade::delete_subject_tree(&txn, id).await?;
        txn.commit().await?;
        Ok(())
    }
}
