use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PortalError, PortalResult};

/// A validated academic-year label such as `2024-2025`.
///
/// The wire format is fixed at nine characters: four digits, a hyphen, four
/// digits, with the second year exactly one after the first. Enrollments and
/// exams store the raw label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AcademicYear {
    label: String,
    start: i32,
}

impl AcademicYear {
    pub fn parse(label: &str) -> PortalResult<Self> {
        let bytes = label.as_bytes();
        let well_formed = bytes.len() == 9
            && bytes[4] == b'-'
            && bytes[..4].iter().all(u8::is_ascii_digit)
            && bytes[5..].iter().all(u8::is_ascii_digit);
        if !well_formed {
            return Err(PortalError::validation(
                "academic year",
                format!("expected YYYY-YYYY, got {label:?}"),
            ));
        }
        let (start, end) = match (label[..4].parse::<i32>(), label[5..].parse::<i32>()) {
            (Ok(start), Ok(end)) => (start, end),
            _ => {
                return Err(PortalError::validation(
                    "academic year",
                    format!("expected YYYY-YYYY, got {label:?}"),
                ))
            }
        };
        if end != start + 1 {
            return Err(PortalError::validation(
                "academic year",
                format!("{label:?} does not span consecutive years"),
            ));
        }
        Ok(AcademicYear {
            label: label.to_owned(),
            start,
        })
    }

    pub fn start_year(&self) -> i32 {
        self.start
    }

    pub fn end_year(&self) -> i32 {
        self.start + 1
    }

    pub fn as_str(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl FromStr for AcademicYear {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AcademicYear::parse(s)
    }
}

impl TryFrom<String> for AcademicYear {
    type Error = PortalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        AcademicYear::parse(&value)
    }
}

impl From<AcademicYear> for String {
    fn from(year: AcademicYear) -> String {
        year.label
    }
}
