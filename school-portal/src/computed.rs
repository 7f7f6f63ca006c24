//! Derived attributes.
//!
//! Pure functions over immutable snapshots of a record plus whatever it
//! references. Nothing here is persisted; callers recompute on every read so
//! the values can never drift from the underlying rows.

use chrono::Datelike;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use sea_orm::prelude::Date;
use serde::Serialize;

use crate::entities::{exam, grade};
use crate::enums::LetterGrade;
use crate::error::{PortalError, PortalResult};

/// Letter bands over absolute marks, highest threshold first. Bands are
/// deliberately independent of the exam's `total_marks`; first match wins.
static GRADE_BANDS: Lazy<[(Decimal, LetterGrade); 6]> = Lazy::new(|| {
    [
        (Decimal::from(80), LetterGrade::APlus),
        (Decimal::from(70), LetterGrade::A),
        (Decimal::from(60), LetterGrade::AMinus),
        (Decimal::from(50), LetterGrade::B),
        (Decimal::from(40), LetterGrade::C),
        (Decimal::from(33), LetterGrade::D),
    ]
});

/// Whole calendar years between `date_of_birth` and `today`, minus one when
/// the birthday has not yet come around this year.
pub fn age(date_of_birth: Date, today: Date) -> PortalResult<i32> {
    if today < date_of_birth {
        return Err(PortalError::validation(
            "student",
            format!("date of birth {date_of_birth} is after {today}"),
        ));
    }
    let mut years = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years -= 1;
    }
    Ok(years)
}

/// Marks as a percentage of the exam's `total_marks`; absent scores as zero.
///
/// A zero `total_marks` cannot produce a number here and is reported as a
/// mark-scheme error rather than dividing.
pub fn percentage(grade: &grade::Model, exam: &exam::Model) -> PortalResult<Decimal> {
    debug_assert_eq!(grade.exam_id, exam.id);
    if grade.is_absent {
        return Ok(Decimal::ZERO);
    }
    if exam.total_marks <= 0 {
        return Err(PortalError::MarkScheme {
            message: format!("exam {} has total_marks {}", exam.id, exam.total_marks),
        });
    }
    Ok(grade.marks_obtained / Decimal::from(exam.total_marks) * Decimal::from(100))
}

/// Pass/fail against the exam's `pass_marks`; the boundary is inclusive and
/// an absent student never passes.
pub fn is_passed(grade: &grade::Model, exam: &exam::Model) -> bool {
    debug_assert_eq!(grade.exam_id, exam.id);
    !grade.is_absent && grade.marks_obtained >= Decimal::from(exam.pass_marks)
}

/// Letter band for the obtained marks; `Absent` when the student was absent.
pub fn letter_grade(grade: &grade::Model) -> LetterGrade {
    if grade.is_absent {
        return LetterGrade::Absent;
    }
    for (threshold, letter) in GRADE_BANDS.iter() {
        if grade.marks_obtained >= *threshold {
            return *letter;
        }
    }
    LetterGrade::F
}

/// Read-only view of one grade with its derived values, ready for a result
/// screen or API response. Built fresh from the rows on every request.
#[derive(Debug, Clone, Serialize)]
pub struct GradeReport {
    pub grade_id: i32,
    pub student_id: i32,
    pub exam_id: i32,
    pub marks_obtained: Decimal,
    pub total_marks: i32,
    pub is_absent: bool,
    pub percentage: Decimal,
    pub letter: LetterGrade,
    pub passed: bool,
    pub remarks: Option<String>,
}

impl GradeReport {
    pub fn new(grade: &grade::Model, exam: &exam::Model) -> PortalResult<Self> {
        Ok(GradeReport {
            grade_id: grade.id,
            student_id: grade.student_id,
            exam_id: grade.exam_id,
            marks_obtained: grade.marks_obtained,
            total_marks: exam.total_marks,
            is_absent: grade.is_absent,
            percentage: percentage(grade, exam)?,
            letter: letter_grade(grade),
            passed: is_passed(grade, exam),
            remarks: grade.remarks.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> Date {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn exam_row(total_marks: i32, pass_marks: i32) -> exam::Model {
        let stamp = chrono::Utc::now().fixed_offset();
        exam::Model {
            id: 1,
            exam_name: "Mid-Term".to_owned(),
            exam_type: crate::enums::ExamType::Midterm,
            subject_id: 1,
            class_id: 1,
            academic_year: "2024-2025".to_owned(),
            exam_date: date(2024, 11, 12),
            total_marks,
            pass_marks,
            duration_minutes: 90,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    fn grade_row(marks: Decimal, is_absent: bool) -> grade::Model {
        let stamp = chrono::Utc::now().fixed_offset();
        grade::Model {
            id: 1,
            student_id: 1,
            exam_id: 1,
            marks_obtained: marks,
            remarks: None,
            is_absent,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[test]
    fn age_counts_whole_years() {
        let born = date(2010, 6, 15);
        assert_eq!(age(born, date(2024, 6, 14)).unwrap(), 13);
        assert_eq!(age(born, date(2024, 6, 15)).unwrap(), 14);
        assert_eq!(age(born, date(2024, 12, 31)).unwrap(), 14);
        assert_eq!(age(born, date(2010, 6, 15)).unwrap(), 0);
    }

    #[test]
    fn age_is_monotonic_over_a_year() {
        let born = date(2010, 6, 15);
        let mut previous = age(born, date(2024, 1, 1)).unwrap();
        let mut today = date(2024, 1, 2);
        while today <= date(2025, 1, 1) {
            let current = age(born, today).unwrap();
            assert!(current >= previous, "age regressed at {today}");
            previous = current;
            today = today.succ_opt().unwrap();
        }
    }

    #[test]
    fn age_rejects_birth_in_the_future() {
        assert!(age(date(2030, 1, 1), date(2024, 6, 15)).is_err());
    }

    #[test]
    fn pass_boundary_is_inclusive() {
        let exam = exam_row(100, 40);
        let grade = grade_row(Decimal::new(4000, 2), false);
        assert_eq!(percentage(&grade, &exam).unwrap(), Decimal::from(40));
        assert_eq!(letter_grade(&grade), LetterGrade::C);
        assert!(is_passed(&grade, &exam));
    }

    #[test]
    fn absence_overrides_marks() {
        let exam = exam_row(100, 40);
        let grade = grade_row(Decimal::from(95), true);
        assert_eq!(percentage(&grade, &exam).unwrap(), Decimal::ZERO);
        assert_eq!(letter_grade(&grade), LetterGrade::Absent);
        assert!(!is_passed(&grade, &exam));
    }

    #[test]
    fn bands_are_absolute_marks_not_percentage() {
        // 45/50 is 90% but still lands in the C band.
        let exam = exam_row(50, 20);
        let grade = grade_row(Decimal::from(45), false);
        assert_eq!(percentage(&grade, &exam).unwrap(), Decimal::from(90));
        assert_eq!(letter_grade(&grade), LetterGrade::C);
    }

    #[test]
    fn band_boundaries() {
        let cases = [
            (Decimal::from(80), LetterGrade::APlus),
            (Decimal::new(7975, 2), LetterGrade::A),
            (Decimal::from(70), LetterGrade::A),
            (Decimal::from(60), LetterGrade::AMinus),
            (Decimal::from(50), LetterGrade::B),
            (Decimal::from(40), LetterGrade::C),
            (Decimal::from(33), LetterGrade::D),
            (Decimal::new(3275, 2), LetterGrade::F),
            (Decimal::ZERO, LetterGrade::F),
            (Decimal::from(150), LetterGrade::APlus),
        ];
        for (marks, expected) in cases {
            assert_eq!(letter_grade(&grade_row(marks, false)), expected, "marks {marks}");
        }
    }

    #[test]
    fn every_mark_maps_to_exactly_one_band() {
        // Sweep [0, 120] in quarter-mark steps; the banding must be total.
        let mut marks = Decimal::ZERO;
        let step = Decimal::new(25, 2);
        while marks <= Decimal::from(120) {
            let _ = letter_grade(&grade_row(marks, false));
            marks += step;
        }
    }

    #[test]
    fn zero_total_marks_fails_fast() {
        let exam = exam_row(0, 0);
        let grade = grade_row(Decimal::from(10), false);
        assert!(matches!(
            percentage(&grade, &exam),
            Err(PortalError::MarkScheme { .. })
        ));
        // Absence still short-circuits to zero before the scheme is consulted.
        let absent = grade_row(Decimal::from(10), true);
        assert_eq!(percentage(&absent, &exam).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn report_bundles_derived_values() {
        let exam = exam_row(100, 40);
        let grade = grade_row(Decimal::new(8550, 2), false);
        let report = GradeReport::new(&grade, &exam).unwrap();
        assert_eq!(report.percentage, Decimal::new(8550, 2));
        assert_eq!(report.letter, LetterGrade::APlus);
        assert!(report.passed);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["letter"], "A+");
        assert_eq!(json["passed"], true);
    }
}
