use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};

use crate::entities::{enrollment, grade, student};
use crate::enums::BloodGroup;
use crate::error::{PortalError, PortalResult};

pub struct StudentRepo<'a> {
    pub(crate) conn: &'a DatabaseConnection,
}

/// Intake record for a new student.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: sea_orm::prelude::Date,
    pub nationality: String,
    pub student_id: i32,
    pub roll_number: i16,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub photo: Option<String>,
    pub blood_group: Option<BloodGroup>,
    pub birth_certificate_id: Option<i32>,
    pub fathers_name: String,
    pub fathers_nid: String,
    pub mothers_name: String,
    pub mothers_nid: String,
}

/// Administrative update; `None` leaves a field untouched, the inner
/// `Option` clears a nullable one.
#[derive(Debug, Clone, Default)]
pub struct StudentPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<sea_orm::prelude::Date>,
    pub nationality: Option<String>,
    pub student_id: Option<i32>,
    pub roll_number: Option<i16>,
    pub phone_number: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub photo: Option<Option<String>>,
    pub blood_group: Option<Option<BloodGroup>>,
    pub birth_certificate_id: Option<Option<i32>>,
    pub fathers_name: Option<String>,
    pub fathers_nid: Option<String>,
    pub mothers_name: Option<String>,
    pub mothers_nid: Option<String>,
}

impl StudentRepo<'_> {
    pub async fn create(&self, input: NewStudent) -> PortalResult<student::Model> {
        let taken = student::Entity::find()
            .filter(student::Column::StudentId.eq(input.student_id))
            .count(self.conn)
            .await?;
        if taken > 0 {
            return Err(PortalError::conflict(
                "student",
                format!("student_id {}", input.student_id),
            ));
        }

        let row = student::ActiveModel {
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            date_of_birth: Set(input.date_of_birth),
            nationality: Set(input.nationality),
            student_id: Set(input.student_id),
            roll_number: Set(input.roll_number),
            phone_number: Set(input.phone_number),
            email: Set(input.email),
            photo: Set(input.photo),
            blood_group: Set(input.blood_group),
            birth_certificate_id: Set(input.birth_certificate_id),
            fathers_name: Set(input.fathers_name),
            fathers_nid: Set(input.fathers_nid),
            mothers_name: Set(input.mothers_name),
            mothers_nid: Set(input.mothers_nid),
            ..Default::default()
        }
        .insert(self.conn)
        .await?;
        log::debug!("created student {} (student_id {})", row.id, row.student_id);
        Ok(row)
    }

    pub async fn update(&self, id: i32, patch: StudentPatch) -> PortalResult<student::Model> {
        let current = self.get(id).await?;
        if let Some(new_student_id) = patch.student_id {
            if new_student_id != current.student_id {
                let taken = student::Entity::find()
                    .filter(student::Column::StudentId.eq(new_student_id))
                    .filter(student::Column::Id.ne(id))
                    .count(self.conn)
                    .await?;
                if taken > 0 {
                    return Err(PortalError::conflict(
                        "student",
                        format!("student_id {new_student_id}"),
                    ));
                }
            }
        }

        let mut row: student::ActiveModel = current.into();
        if let Some(v) = patch.first_name {
            row.first_name = Set(v);
        }
        if let Some(v) = patch.last_name {
            row.last_name = Set(v);
        }
        if let Some(v) = patch.date_of_birth {
            row.date_of_birth = Set(v);
        }
        if let Some(v) = patch.nationality {
            row.nationality = Set(v);
        }
        if let Some(v) = patch.student_id {
            row.student_id = Set(v);
        }
        if let Some(v) = patch.roll_number {
            row.roll_number = Set(v);
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
        if let Some(v) = patch.birth_certificate_id {
            row.birth_certificate_id = Set(v);
        }
        if let Some(v) = patch.fathers_name {
            row.fathers_name = Set(v);
        }
        if let Some(v) = patch.fathers_nid {
            row.fathers_nid = Set(v);
        }
        if let Some(v) = patch.mothers_name {
            row.mothers_name = Set(v);
        }
        if let Some(v) = patch.mothers_nid {
            row.mothers_nid = Set(v);
        }
        Ok(row.update(self.conn).await?)
    }

    pub async fn get(&self, id: i32) -> PortalResult<student::Model> {
        student::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_else(|| PortalError::not_found("student", format!("id {id}")))
    }

    /// Lookup by the public registry number.
    pub async fn get_by_student_id(&self, student_id: i32) -> PortalResult<student::Model> {
        student::Entity::find()
            .filter(student::Column::StudentId.eq(student_id))
            .one(self.conn)
            .await?
            .ok_or_else(|| PortalError::not_found("student", format!("student_id {student_id}")))
    }

    /// All students, (last name, first name) ascending.
    pub async fn list(&self) -> PortalResult<Vec<student::Model>> {
        Ok(student::Entity::find()
            .order_by_asc(student::Column::LastName)
            .order_by_asc(student::Column::FirstName)
            .all(self.conn)
            .await?)
    }

    /// Remove a student together with the grades and enrollments they own.
    pub async fn delete(&self, id: i32) -> PortalResult<()> {
        let txn = self.conn.begin().await?;
        let grades = grade::Entity::delete_many()
            .filter(grade::Column::StudentId.eq(id))
            .exec(&txn)
            .await?;
        let enrollments = enrollment::Entity::delete_many()
            .filter(enrollment::Column::StudentId.eq(id))
            .exec(&txn)
            .await?;
        let res = student::Entity::delete_by_id(id).exec(&txn).await?;
        if res.rows_affected == 0 {
            txn.rollback().await?;
            return Err(PortalError::not_found("student", format!("id {id}")));
        }
        txn.commit().await?;
        log::debug!(
            "deleted student {id} ({} grades, {} enrollments)",
            grades.rows_affected,
            enrollments.rows_affected
        );
        Ok(())
    }
}
