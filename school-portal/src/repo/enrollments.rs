use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::academic_year::AcademicYear;
use crate::entities::{class, enrollment, student};
use crate::enums::EnrollmentStatus;
use crate::error::{PortalError, PortalResult};

pub struct EnrollmentRepo<'a> {
    pub(crate) conn: &'a DatabaseConnection,
}

#[derive(Debug, Clone)]
pub struct NewEnrollment {
    pub student_id: i32,
    pub class_id: i32,
    pub academic_year: AcademicYear,
    pub enrollment_date: sea_orm::prelude::Date,
    /// Defaults to `Active`.
    pub status: Option<EnrollmentStatus>,
}

impl EnrollmentRepo<'_> {
    /// Enroll a student in a class for one academic year. A student can hold
    /// at most one enrollment per (class, year).
    pub async fn enroll(&self, input: NewEnrollment) -> PortalResult<enrollment::Model> {
        let known_student = student::Entity::find_by_id(input.student_id)
            .count(self.conn)
            .await?;
        if known_student == 0 {
            return Err(PortalError::not_found(
                "student",
                format!("id {}", input.student_id),
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

        let duplicate = enrollment::Entity::find()
            .filter(enrollment::Column::StudentId.eq(input.student_id))
            .filter(enrollment::Column::ClassId.eq(input.class_id))
            .filter(enrollment::Column::AcademicYear.eq(input.academic_year.as_str()))
            .count(self.conn)
            .await?;
        if duplicate > 0 {
            return Err(PortalError::conflict(
                "enrollment",
                format!(
                    "student {}, class {}, year {}",
                    input.student_id, input.class_id, input.academic_year
                ),
            ));
        }

        let row = enrollment::ActiveModel {
            student_id: Set(input.student_id),
            class_id: Set(input.class_id),
            academic_year: Set(input.academic_year.as_str().to_owned()),
            enrollment_date: Set(input.enrollment_date),
            status: Set(input.status.unwrap_or_default()),
            ..Default::default()
        }
        .insert(self.conn)
        .await?;
        log::debug!(
            "enrolled student {} in class {} for {}",
            row.student_id,
            row.class_id,
            row.academic_year
        );
        Ok(row)
    }

    pub async fn get(&self, id: i32) -> PortalResult<enrollment::Model> {
        enrollment::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_else(|| PortalError::not_found("enrollment", format!("id {id}")))
    }

    pub async fn set_status(
        &self,
        id: i32,
        status: EnrollmentStatus,
    ) -> PortalResult<enrollment::Model> {
        let current = self.get(id).await?;
        let mut row: enrollment::ActiveModel = current.into();
        row.status = Set(status);
        Ok(row.update(self.conn).await?)
    }

    /// A student's enrollment history, newest first.
    pub async fn for_student(&self, student_id: i32) -> PortalResult<Vec<enrollment::Model>> {
        Ok(enrollment::Entity::find()
            .filter(enrollment::Column::StudentId.eq(student_id))
            .order_by_desc(enrollment::Column::EnrollmentDate)
            .all(self.conn)
            .await?)
    }

    /// A class roster, optionally narrowed to one academic year.
    pub async fn for_class(
        &self,
        class_id: i32,
        academic_year: Option<&AcademicYear>,
    ) -> PortalResult<Vec<enrollment::Model>> {
        let mut query = enrollment::Entity::find()
            .filter(enrollment::Column::ClassId.eq(class_id));
        if let Some(year) = academic_year {
            query = query.filter(enrollment::Column::AcademicYear.eq(year.as_str()));
        }
        Ok(query
            .order_by_desc(enrollment::Column::EnrollmentDate)
            .all(self.conn)
            .await?)
    }

    pub async fn withdraw(&self, id: i32) -> PortalResult<()> {
        let res = enrollment::Entity::delete_by_id(id).exec(self.conn).await?;
        if res.rows_affected == 0 {
            return Err(PortalError::not_found("enrollment", format!("id {id}")));
        }
        Ok(())
    }
}
