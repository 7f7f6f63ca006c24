//! Record types and their relations.
//!
//! Each entity lives in its own module with the sea-orm `Model`, `Relation`
//! and `Related` plumbing. Timestamped entities stamp `updated_at` (and on
//! insert `created_at`) in `before_save`, so every write path refreshes them
//! without the repositories having to remember to.

fn touch_timestamps(
    created_at: &mut sea_orm::ActiveValue<sea_orm::prelude::DateTimeWithTimeZone>,
    updated_at: &mut sea_orm::ActiveValue<sea_orm::prelude::DateTimeWithTimeZone>,
    insert: bool,
) {
    let now = chrono::Utc::now().fixed_offset();
    if insert && created_at.is_not_set() {
        *created_at = sea_orm::ActiveValue::Set(now);
    }
    *updated_at = sea_orm::ActiveValue::Set(now);
}

pub mod student {
    use async_trait::async_trait;
    use sea_orm::entity::prelude::*;
    use sea_orm::ConnectionTrait;
    use serde::{Deserialize, Serialize};

    use crate::enums::BloodGroup;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "students")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub first_name: String,
        pub last_name: String,
        pub date_of_birth: Date,
        pub nationality: String,
        /// Public registry number, distinct from the surrogate `id`.
        #[sea_orm(unique)]
        pub student_id: i32,
        pub roll_number: i16,
        #[sea_orm(nullable)]
        pub phone_number: Option<String>,
        #[sea_orm(nullable)]
        pub email: Option<String>,
        /// Stored path of the photo; upload handling lives outside this crate.
        #[sea_orm(nullable)]
        pub photo: Option<String>,
        #[sea_orm(nullable)]
        pub blood_group: Option<BloodGroup>,
        #[sea_orm(nullable)]
        pub birth_certificate_id: Option<i32>,
        pub fathers_name: String,
        pub fathers_nid: String,
        pub mothers_name: String,
        pub mothers_nid: String,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    impl Model {
        pub fn full_name(&self) -> String {
            format!("{} {}", self.first_name, self.last_name)
        }
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            has_many = "super::enrollment::Entity",
            from = "Column::Id",
            to = "super::enrollment::Column::StudentId"
        )]
        Enrollments,
        #[sea_orm(
            has_many = "super::grade::Entity",
            from = "Column::Id",
            to = "super::grade::Column::StudentId"
        )]
        Grades,
    }

    impl Related<super::enrollment::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Enrollments.def()
        }
    }

    impl Related<super::grade::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Grades.def()
        }
    }

    #[async_trait]
    impl ActiveModelBehavior for ActiveModel {
        async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
        where
            C: ConnectionTrait,
        {
            super::touch_timestamps(&mut self.created_at, &mut self.updated_at, insert);
            Ok(self)
        }
    }
}

pub mod teacher {
    use async_trait::async_trait;
    use sea_orm::entity::prelude::*;
    use sea_orm::ConnectionTrait;
    use serde::{Deserialize, Serialize};

    use crate::enums::BloodGroup;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "teachers")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub first_name: String,
        pub last_name: String,
        #[sea_orm(unique)]
        pub teacher_id: i32,
        pub teacher_nid: String,
        #[sea_orm(nullable)]
        pub phone_number: Option<String>,
        #[sea_orm(unique)]
        pub email: String,
        #[sea_orm(nullable)]
        pub photo: Option<String>,
        #[sea_orm(nullable)]
        pub blood_group: Option<BloodGroup>,
        pub hire_date: Date,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    impl Model {
        pub fn full_name(&self) -> String {
            format!("{} {}", self.first_name, self.last_name)
        }
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        /// Classes where this teacher is the designated lead. A class cannot
        /// outlive its lead teacher.
        #[sea_orm(
            has_many = "super::class::Entity",
            from = "Column::Id",
            to = "super::class::Column::ClassTeacherId"
        )]
        LeadClasses,
    }

    // Staff membership goes through the join table; the lead-class relation
    // above is queried directly by the repositories.
    impl Related<super::class::Entity> for Entity {
        fn to() -> RelationDef {
            super::class_teacher::Relation::Class.def()
        }

        fn via() -> Option<RelationDef> {
            Some(super::class_teacher::Relation::Teacher.def().rev())
        }
    }

    impl Related<super::subject::Entity> for Entity {
        fn to() -> RelationDef {
            super::subject_teacher::Relation::Subject.def()
        }

        fn via() -> Option<RelationDef> {
            Some(super::subject_teacher::Relation::Teacher.def().rev())
        }
    }

    #[async_trait]
    impl ActiveModelBehavior for ActiveModel {
        async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
        where
            C: ConnectionTrait,
        {
            super::touch_timestamps(&mut self.created_at, &mut self.updated_at, insert);
            Ok(self)
        }
    }
}

pub mod class {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    use crate::enums::Section;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "classes")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub class_name: String,
        pub section: Section,
        pub class_teacher_id: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::teacher::Entity",
            from = "Column::ClassTeacherId",
            to = "super::teacher::Column::Id",
            on_update = "Cascade",
            on_delete = "Cascade"
        )]
        LeadTeacher,
        #[sea_orm(
            has_many = "super::subject::Entity",
            from = "Column::Id",
            to = "super::subject::Column::ClassId"
        )]
        Subjects,
        #[sea_orm(
            has_many = "super::enrollment::Entity",
            from = "Column::Id",
            to = "super::enrollment::Column::ClassId"
        )]
        Enrollments,
        #[sea_orm(
            has_many = "super::exam::Entity",
            from = "Column::Id",
            to = "super::exam::Column::ClassId"
        )]
        Exams,
    }

    impl Related<super::subject::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Subjects.def()
        }
    }

    impl Related<super::enrollment::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Enrollments.def()
        }
    }

    impl Related<super::exam::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Exams.def()
        }
    }

    impl Related<super::teacher::Entity> for Entity {
        fn to() -> RelationDef {
            super::class_teacher::Relation::Teacher.def()
        }

        fn via() -> Option<RelationDef> {
            Some(super::class_teacher::Relation::Class.def().rev())
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod subject {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "subjects")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub subject_name: String,
        pub class_id: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::class::Entity",
            from = "Column::ClassId",
            to = "super::class::Column::Id",
            on_update = "Cascade",
            on_delete = "Cascade"
        )]
        Class,
        #[sea_orm(
            has_many = "super::exam::Entity",
            from = "Column::Id",
            to = "super::exam::Column::SubjectId"
        )]
        Exams,
    }

    impl Related<super::class::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Class.def()
        }
    }

    impl Related<super::exam::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Exams.def()
        }
    }

    impl Related<super::teacher::Entity> for Entity {
        fn to() -> RelationDef {
            super::subject_teacher::Relation::Teacher.def()
        }

        fn via() -> Option<RelationDef> {
            Some(super::subject_teacher::Relation::Subject.def().rev())
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod enrollment {
    use async_trait::async_trait;
    use sea_orm::entity::prelude::*;
    use sea_orm::ConnectionTrait;
    use serde::{Deserialize, Serialize};

    use crate::enums::EnrollmentStatus;

    /// One student in one class for one academic year. The
    /// (student, class, academic_year) triple is unique.
    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "enrollments")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub student_id: i32,
        pub class_id: i32,
        pub academic_year: String,
        pub enrollment_date: Date,
        pub status: EnrollmentStatus,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::student::Entity",
            from = "Column::StudentId",
            to = "super::student::Column::Id",
            on_update = "Cascade",
            on_delete = "Cascade"
        )]
        Student,
        #[sea_orm(
            belongs_to = "super::class::Entity",
            from = "Column::ClassId",
            to = "super::class::Column::Id",
            on_update = "Cascade",
            on_delete = "Cascade"
        )]
        Class,
    }

    impl Related<super::student::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Student.def()
        }
    }

    impl Related<super::class::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Class.def()
        }
    }

    #[async_trait]
    impl ActiveModelBehavior for ActiveModel {
        async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
        where
            C: ConnectionTrait,
        {
            super::touch_timestamps(&mut self.created_at, &mut self.updated_at, insert);
            Ok(self)
        }
    }
}

pub mod exam {
    use async_trait::async_trait;
    use sea_orm::entity::prelude::*;
    use sea_orm::ConnectionTrait;
    use serde::{Deserialize, Serialize};

    use crate::enums::ExamType;

    /// A sitting of one subject for one class. The
    /// (exam_name, subject, class, academic_year) quadruple is unique.
    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "exams")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub exam_name: String,
        pub exam_type: ExamType,
        pub subject_id: i32,
        pub class_id: i32,
        pub academic_year: String,
        pub exam_date: Date,
        pub total_marks: i32,
        pub pass_marks: i32,
        pub duration_minutes: i32,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::subject::Entity",
            from = "Column::SubjectId",
            to = "super::subject::Column::Id",
            on_update = "Cascade",
            on_delete = "Cascade"
        )]
        Subject,
        #[sea_orm(
            belongs_to = "super::class::Entity",
            from = "Column::ClassId",
            to = "super::class::Column::Id",
            on_update = "Cascade",
            on_delete = "Cascade"
        )]
        Class,
        #[sea_orm(
            has_many = "super::grade::Entity",
            from = "Column::Id",
            to = "super::grade::Column::ExamId"
        )]
        Grades,
    }

    impl Related<super::subject::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Subject.def()
        }
    }

    impl Related<super::class::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Class.def()
        }
    }

    impl Related<super::grade::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Grades.def()
        }
    }

    #[async_trait]
    impl ActiveModelBehavior for ActiveModel {
        async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
        where
            C: ConnectionTrait,
        {
            super::touch_timestamps(&mut self.created_at, &mut self.updated_at, insert);
            Ok(self)
        }
    }
}

pub mod grade {
    use async_trait::async_trait;
    use sea_orm::entity::prelude::*;
    use sea_orm::ConnectionTrait;
    use serde::{Deserialize, Serialize};

    /// One student's marks for one exam; at most one row per (student, exam).
    /// `student_id` and `exam_id` are fixed once the row exists.
    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "grades")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub student_id: i32,
        pub exam_id: i32,
        #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
        pub marks_obtained: Decimal,
        #[sea_orm(column_type = "Text", nullable)]
        pub remarks: Option<String>,
        pub is_absent: bool,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::student::Entity",
            from = "Column::StudentId",
            to = "super::student::Column::Id",
            on_update = "Cascade",
            on_delete = "Cascade"
        )]
        Student,
        #[sea_orm(
            belongs_to = "super::exam::Entity",
            from = "Column::ExamId",
            to = "super::exam::Column::Id",
            on_update = "Cascade",
            on_delete = "Cascade"
        )]
        Exam,
    }

    impl Related<super::student::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Student.def()
        }
    }

    impl Related<super::exam::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Exam.def()
        }
    }

    #[async_trait]
    impl ActiveModelBehavior for ActiveModel {
        async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
        where
            C: ConnectionTrait,
        {
            super::touch_timestamps(&mut self.created_at, &mut self.updated_at, insert);
            Ok(self)
        }
    }
}

pub mod class_teacher {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    /// Staff membership link between a class and a teacher.
    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "class_teachers")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub class_id: i32,
        #[sea_orm(primary_key, auto_increment = false)]
        pub teacher_id: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::class::Entity",
            from = "Column::ClassId",
            to = "super::class::Column::Id",
            on_update = "Cascade",
            on_delete = "Cascade"
        )]
        Class,
        #[sea_orm(
            belongs_to = "super::teacher::Entity",
            from = "Column::TeacherId",
            to = "super::teacher::Column::Id",
            on_update = "Cascade",
            on_delete = "Cascade"
        )]
        Teacher,
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod subject_teacher {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    /// Teaching assignment link between a subject and a teacher.
    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "subject_teachers")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub subject_id: i32,
        #[sea_orm(primary_key, auto_increment = false)]
        pub teacher_id: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::subject::Entity",
            from = "Column::SubjectId",
            to = "super::subject::Column::Id",
            on_update = "Cascade",
            on_delete = "Cascade"
        )]
        Subject,
        #[sea_orm(
            belongs_to = "super::teacher::Entity",
            from = "Column::TeacherId",
            to = "super::teacher::Column::Id",
            on_update = "Cascade",
            on_delete = "Cascade"
        )]
        Teacher,
    }

    impl ActiveModelBehavior for ActiveModel {}
}
