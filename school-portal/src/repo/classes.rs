use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};

use crate::entities::{class, class_teacher, teacher};
use crate::enums::Section;
use crate::error::{PortalError, PortalResult};
use crate::repo::cascade;

pub struct ClassRepo<'a> {
    pub(crate) conn: &'a DatabaseConnection,
}

#[derive(Debug, Clone)]
pub struct NewClass {
    pub class_name: String,
    pub section: Section,
    /// The designated lead; the class is deleted with them.
    pub class_teacher_id: i32,
    /// Initial teaching staff. The lead is not implicitly a member.
    pub teacher_ids: Vec<i32>,
}

impl ClassRepo<'_> {
    pub async fn create(&self, input: NewClass) -> PortalResult<class::Model> {
        let lead = teacher::Entity::find_by_id(input.class_teacher_id)
            .one(self.conn)
            .await?
            .ok_or_else(|| {
                PortalError::not_found("teacher", format!("id {}", input.class_teacher_id))
            })?;

        let mut staff = input.teacher_ids;
        staff.sort_unstable();
        staff.dedup();
        for teacher_id in &staff {
            let known = teacher::Entity::find_by_id(*teacher_id)
                .count(self.conn)
                .await?;
            if known == 0 {
                return Err(PortalError::not_found("teacher", format!("id {teacher_id}")));
            }
        }

        let txn = self.conn.begin().await?;
        let row = class::ActiveModel {
            class_name: Set(input.class_name),
            section: Set(input.section),
            class_teacher_id: Set(lead.id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        for teacher_id in &staff {
            class_teacher::ActiveModel {
                class_id: Set(row.id),
                teacher_id: Set(*teacher_id),
            }
            .insert(&txn)
            .await?;
        }
        txn.commit().await?;
        log::debug!("created class {} with {} staff", row.id, staff.len());
        Ok(row)
    }

    pub async fn get(&self, id: i32) -> PortalResult<class::Model> {
        class::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_else(|| PortalError::not_found("class", format!("id {id}")))
    }

    pub async fn list(&self) -> PortalResult<Vec<class::Model>> {
        Ok(class::Entity::find()
            .order_by_asc(class::Column::ClassName)
            .order_by_asc(class::Column::Section)
            .all(self.conn)
            .await?)
    }

    pub async fn lead_teacher(&self, id: i32) -> PortalResult<teacher::Model> {
        let row = self.get(id).await?;
        teacher::Entity::find_by_id(row.class_teacher_id)
            .one(self.conn)
            .await?
            .ok_or_else(|| {
                PortalError::not_found("teacher", format!("id {}", row.class_teacher_id))
            })
    }

    /// The teaching staff assigned to this class.
    pub async fn staff(&self, id: i32) -> PortalResult<Vec<teacher::Model>> {
        let row = self.get(id).await?;
        Ok(row
            .find_related(teacher::Entity)
            .order_by_asc(teacher::Column::LastName)
            .all(self.conn)
            .await?)
    }

    pub async fn add_teacher(&self, class_id: i32, teacher_id: i32) -> PortalResult<()> {
        self.get(class_id).await?;
        let known = teacher::Entity::find_by_id(teacher_id)
            .count(self.conn)
            .await?;
        if known == 0 {
            return Err(PortalError::not_found("teacher", format!("id {teacher_id}")));
        }
        let already = class_teacher::Entity::find()
            .filter(class_teacher::Column::ClassId.eq(class_id))
            .filter(class_teacher::Column::TeacherId.eq(teacher_id))
            .count(self.conn)
            .await?;
        if already > 0 {
            return Err(PortalError::conflict(
                "class staff",
                format!("class {class_id}, teacher {teacher_id}"),
            ));
        }
        class_teacher::ActiveModel {
            class_id: Set(class_id),
            teacher_id: Set(teacher_id),
        }
        .insert(self.conn)
        .await?;
        Ok(())
    }

    pub async fn remove_teacher(&self, class_id: i32, teacher_id: i32) -> PortalResult<()> {
        let res = class_teacher::Entity::delete_many()
            .filter(class_teacher::Column::ClassId.eq(class_id))
            .filter(class_teacher::Column::TeacherId.eq(teacher_id))
            .exec(self.conn)
            .await?;
        if res.rows_affected == 0 {
            return Err(PortalError::not_found(
                "class staff",
                format!("class {class_id}, teacher {teacher_id}"),
            ));
        }
        Ok(())
    }

    /// Delete the class and everything it owns: subjects, exams, grades,
    /// enrollments, staff links.
    pub async fn delete(&self, id: i32) -> PortalResult<()> {
        self.get(id).await?;
        let txn = self.conn.begin().await?;
        cascade::delete_class_tree(&txn, id).await?;
        txn.commit().await?;
        Ok(())
    }
}
