use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};

use crate::entities::{class, class_teacher, subject_teacher, teacher};
use crate::enums::BloodGroup;
use crate::error::{PortalError, PortalResult};
use crate::repo::cascade;

pub struct TeacherRepo<'a> {
    pub(crate) conn: &'a DatabaseConnection,
}

#[derive(Debug, Clone)]
pub struct NewTeacher {
    pub first_name: String,
    pub last_name: String,
    pub teacher_id: i32,
    pub teacher_nid: String,
    pub phone_number: Option<String>,
    pub email: String,
    pub photo: Option<String>,
    pub blood_group: Option<BloodGroup>,
    pub hire_date: sea_orm::prelude::Date,
}

#[derive(Debug, Clone, Default)]
pub struct TeacherPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub teacher_id: Option<i32>,
    pub teacher_nid: Option<String>,
    pub phone_number: Option<Option<String>>,
    pub email: Option<String>,
    pub photo: Option<Option<String>>,
    pub blood_group: Option<Option<BloodGroup>>,
    pub hire_date: Option<sea_orm::prelude::Date>,
}

impl TeacherRepo<'_> {
    pub async fn create(&self, input: NewTeacher) -> PortalResult<teacher::Model> {
        let id_taken = teacher::Entity::find()
            .filter(teacher::Column::TeacherId.eq(input.teacher_id))
            .count(self.conn)
            .await?;
        if id_taken > 0 {
            return Err(PortalError::conflict(
                "teacher",
                format!("teacher_id {}", input.teacher_id),
            ));
        }
        let email_taken = teacher::Entity::find()
            .filter(teacher::Column::Email.eq(input.email.as_str()))
            .count(self.conn)
            .await?;
        if email_taken > 0 {
            return Err(PortalError::conflict(
                "teacher",
                format!("email {}", input.email),
            ));
        }

        let row = teacher::ActiveModel {
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            teacher_id: Set(input.teacher_id),
            teacher_nid: Set(input.teacher_nid),
            phone_number: Set(input.phone_number),
            email: Set(input.email),
            photo: Set(input.photo),
            blood_group: Set(input.blood_group),
            hire_date: Set(input.hire_date),
            ..Default::default()
        }
        .insert(self.conn)
        .await?;
        log::debug!("created teacher {} (teacher_id {})", row.id, row.teacher_id);
        Ok(row)
    }

    pub async fn update(&self, id: i32, patch: TeacherPatch) -> PortalResult<teacher::Model> {
        let current = self.get(id).await?;
        if let Some(new_teacher_id) = patch.teacher_id {
            if new_teacher_id != current.teacher_id {
                let taken = teacher::Entity::find()
                    .filter(teacher::Column::TeacherId.eq(new_teacher_id))
                    .filter(teacher::Column::Id.ne(id))
                    .count(self.conn)
                    .await?;
                if taken > 0 {
                    return Err(PortalError::conflict(
                        "teacher",
                        format!("teacher_id {new_teacher_id}"),
                    ));
                }
            }
        }
        if let Some(new_email) = patch.email.as_deref() {
            if new_email != current.email {
                let taken = teacher::Entity::find()
                    .filter(teacher::Column::Email.eq(new_email))
                    .filter(teacher::Column::Id.ne(id))
                    .count(self.conn)
                    .await?;
                if taken > 0 {
                    return Err(PortalError::conflict(
                        "teacher",
                        format!("email {new_email}"),
                    ));
                }
            }
        }

        let mut row: teacher::ActiveModel = current.into();
        if let Some(v) = patch.first_name {
            row.first_name = Set(v);
        }
        if let Some(v) = patch.last_name {
            row.last_name = Set(v);
        }
        if let Some(v) = patch.teacher_id {
            row.teacher_id = Set(v);
        }
        if let Some(v) = patch.teacher_nid {
            row.teacher_nid = Set(v);
        }
        if let Some(v) = patch.phone_number {
            row.phone_number = Set(v);
        }
        if let Some(v) = patch.email {
            row.email = Set(v);
        }
        if let Some(v) = patch.photo {
            row.photo = Set(v);
        }
        if let Some(v) = patch.blood_group {
            row.blood_group = Set(v);
        }
        if let Some(v) = patch.hire_date {
            row.hire_date = Set(v);
        }
        Ok(row.update(self.conn).await?)
    }

    pub async fn get(&self, id: i32) -> PortalResult<teacher::Model> {
        teacher::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_else(|| PortalError::not_found("teacher", format!("id {id}")))
    }

    pub async fn get_by_teacher_id(&self, teacher_id: i32) -> PortalResult<teacher::Model> {
        teacher::Entity::find()
            .filter(teacher::Column::TeacherId.eq(teacher_id))
            .one(self.conn)
            .await?
            .ok_or_else(|| PortalError::not_found("teacher", format!("teacher_id {teacher_id}")))
    }

    pub async fn list(&self) -> PortalResult<Vec<teacher::Model>> {
        Ok(teacher::Entity::find()
            .order_by_asc(teacher::Column::LastName)
            .all(self.conn)
            .await?)
    }

    /// Classes where this teacher is the designated lead.
    pub async fn lead_classes(&self, id: i32) -> PortalResult<Vec<class::Model>> {
        Ok(class::Entity::find()
            .filter(class::Column::ClassTeacherId.eq(id))
            .all(self.conn)
            .await?)
    }

    /// Remove a teacher. Every class they lead is torn down first, then
    /// their staff and teaching links; a class cannot outlive its lead
    /// teacher.
    pub async fn delete(&self, id: i32) -> PortalResult<()> {
        let txn = self.conn.begin().await?;
        let led: Vec<i32> = class::Entity::find()
            .select_only()
            .column(class::Column::Id)
            .filter(class::Column::ClassTeacherId.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;
        for class_id in &led {
            cascade::delete_class_tree(&txn, *class_id).await?;
        }
        class_teacher::Entity::delete_many()
            .filter(class_teacher::Column::TeacherId.eq(id))
            .exec(&txn)
            .await?;
        subject_teacher::Entity::delete_many()
            .filter(subject_teacher::Column::TeacherId.eq(id))
            .exec(&txn)
            .await?;
        let res = teacher::Entity::delete_by_id(id).exec(&txn).await?;
        if res.rows_affected == 0 {
            txn.rollback().await?;
            return Err(PortalError::not_found("teacher", format!("id {id}")));
        }
        txn.commit().await?;
        log::debug!("deleted teacher {id} and {} led classes", led.len());
        Ok(())
    }
}
