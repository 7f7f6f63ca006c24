//! The public student directory: the one read surface exposed outside the
//! administrative screens. Listing is ordered by (last name, first name),
//! searchable, and paginated at a fixed ten records per page.

use sea_orm::sea_query::{Alias, Condition, Expr, Func};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::Serialize;

use crate::entities::student;
use crate::error::{PortalError, PortalResult};

pub const PAGE_SIZE: u64 = 10;

/// One page of the directory listing. `page` is 1-based.
#[derive(Debug, Serialize)]
pub struct DirectoryPage {
    pub students: Vec<student::Model>,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
}

pub struct Directory<'a> {
    conn: &'a DatabaseConnection,
}

impl<'a> Directory<'a> {
    pub fn new(conn: &'a DatabaseConnection) -> Self {
        Self { conn }
    }

    /// List students, optionally narrowed by a search term. The term matches
    /// case-insensitively as a substring of the first or last name; an
    /// all-digit term also matches against the registry number.
    pub async fn list_students(
        &self,
        page: u64,
        query: Option<&str>,
    ) -> PortalResult<DirectoryPage> {
        let mut select = student::Entity::find();
        if let Some(term) = query.map(str::trim).filter(|term| !term.is_empty()) {
            let needle = format!("%{}%", term.to_lowercase());
            let mut cond = Condition::any()
                .add(
                    Expr::expr(Func::lower(Expr::col((
                        student::Entity,
                        student::Column::FirstName,
                    ))))
                    .like(needle.clone()),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col((
                        student::Entity,
                        student::Column::LastName,
                    ))))
                    .like(needle.clone()),
                );
            if term.bytes().all(|b| b.is_ascii_digit()) {
                cond = cond.add(
                    Expr::expr(
                        Expr::col((student::Entity, student::Column::StudentId))
                            .cast_as(Alias::new("TEXT")),
                    )
                    .like(needle),
                );
            }
            select = select.filter(cond);
        }

        let paginator = select
            .order_by_asc(student::Column::LastName)
            .order_by_asc(student::Column::FirstName)
            .paginate(self.conn, PAGE_SIZE);
        let counts = paginator.num_items_and_pages().await?;
        let page = page.max(1);
        let students = paginator.fetch_page(page - 1).await?;
        Ok(DirectoryPage {
            students,
            total: counts.number_of_items,
            page,
            pages: counts.number_of_pages,
        })
    }

    /// Single-student lookup by registry number; the caller renders the
    /// not-found error as its 404.
    pub async fn find_student(&self, student_id: i32) -> PortalResult<student::Model> {
        student::Entity::find()
            .filter(student::Column::StudentId.eq(student_id))
            .one(self.conn)
            .await?
            .ok_or_else(|| PortalError::not_found("student", format!("student_id {student_id}")))
    }
}
