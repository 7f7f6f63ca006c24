//! Closed vocabularies shared across the record types. Each persisted enum
//! is stored under its legacy string code so existing rows keep reading.

use std::fmt;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum BloodGroup {
    #[sea_orm(string_value = "A_POS")]
    APositive,
    #[sea_orm(string_value = "A_NEG")]
    ANegative,
    #[sea_orm(string_value = "B_POS")]
    BPositive,
    #[sea_orm(string_value = "B_NEG")]
    BNegative,
    #[sea_orm(string_value = "AB_POS")]
    AbPositive,
    #[sea_orm(string_value = "AB_NEG")]
    AbNegative,
    #[sea_orm(string_value = "O_POS")]
    OPositive,
    #[sea_orm(string_value = "O_NEG")]
    ONegative,
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::AbPositive => "AB+",
            BloodGroup::AbNegative => "AB-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(15))")]
pub enum Section {
    #[sea_orm(string_value = "SEC A")]
    A,
    #[sea_orm(string_value = "SEC B")]
    B,
    #[sea_orm(string_value = "SEC C")]
    C,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Section::A => "Section A",
            Section::B => "Section B",
            Section::C => "Section C",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(15))")]
pub enum EnrollmentStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "INACTIVE")]
    Inactive,
    #[sea_orm(string_value = "GRADUATED")]
    Graduated,
    #[sea_orm(string_value = "TRANSFERRED")]
    Transferred,
    #[sea_orm(string_value = "DROPPED")]
    Dropped,
}

impl Default for EnrollmentStatus {
    fn default() -> Self {
        EnrollmentStatus::Active
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ExamType {
    #[sea_orm(string_value = "MIDTERM")]
    Midterm,
    #[sea_orm(string_value = "FINAL")]
    Final,
    #[sea_orm(string_value = "FIRST_CLASS_TEST")]
    FirstClassTest,
    #[sea_orm(string_value = "SECOND_CLASS_TEST")]
    SecondClassTest,
    #[sea_orm(string_value = "PRACTICAL")]
    Practical,
}

/// Derived-only letter band. Never persisted; always recomputed from the
/// marks on the grade snapshot. `Absent` renders as the "AB" mark sheets use.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LetterGrade {
    #[serde(rename = "A+")]
    APlus,
    A,
    #[serde(rename = "A-")]
    AMinus,
    B,
    C,
    D,
    F,
    #[serde(rename = "AB")]
    Absent,
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LetterGrade::APlus => "A+",
            LetterGrade::A => "A",
            LetterGrade::AMinus => "A-",
            LetterGrade::B => "B",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
            LetterGrade::Absent => "AB",
        };
        write!(f, "{label}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveEnum;

    #[test]
    fn persisted_codes_match_legacy_values() {
        assert_eq!(BloodGroup::APositive.to_value(), "A_POS");
        assert_eq!(BloodGroup::ONegative.to_value(), "O_NEG");
        assert_eq!(Section::B.to_value(), "SEC B");
        assert_eq!(EnrollmentStatus::Transferred.to_value(), "TRANSFERRED");
        assert_eq!(ExamType::SecondClassTest.to_value(), "SECOND_CLASS_TEST");
    }

    #[test]
    fn letter_grades_render_report_labels() {
        assert_eq!(LetterGrade::APlus.to_string(), "A+");
        assert_eq!(LetterGrade::AMinus.to_string(), "A-");
        assert_eq!(LetterGrade::Absent.to_string(), "AB");
    }

    #[test]
    fn enrollment_status_defaults_to_active() {
        assert_eq!(EnrollmentStatus::default(), EnrollmentStatus::Active);
    }
}
