//! Defaulter report: percentages, highlight bands and the XLSX rendering
//!
//! Layout of the sheet:
//!
//! | Name | PRN | Email | OS (2 cols)   | DBMS (2 cols) |
//! |      |     |       | 40    | 100   | 30    | 100   |
//! | ...  | A1  | ...   | 31    | 77.5  | 12    | 40    |
//!
//! The subject header spans the attended and percentage columns. Percentage
//! cells are filled red below 50 and orange below 75.

use anyhow::{Context, Result};
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, XlsxError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{error::ApiError, models::attendance::AggregatedAttendance};

const DANGER_FILL: u32 = 0xFF0000;
const CAUTION_FILL: u32 = 0xFFA500;
const FIRST_SUBJECT_COLUMN: u16 = 3;
const FIRST_DATA_ROW: u32 = 2;

/// Fill applied to a percentage cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Danger,
    Caution,
    None,
}

impl Highlight {
    pub fn for_percentage(percentage: f64) -> Self {
        if percentage < 50.0 {
            Highlight::Danger
        } else if percentage < 75.0 {
            Highlight::Caution
        } else {
            Highlight::None
        }
    }

    fn format(self) -> Option<Format> {
        let fill = match self {
            Highlight::Danger => DANGER_FILL,
            Highlight::Caution => CAUTION_FILL,
            Highlight::None => return None,
        };
        Some(Format::new().set_background_color(Color::RGB(fill)))
    }
}

/// `attended / total * 100`, or 0 when no lectures were declared
pub fn percentage(attended: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::from(attended) / f64::from(total) * 100.0
}

/// Lecture count the caller declares for a subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectTotal {
    pub subject: String,
    #[serde(rename = "totallectures", alias = "totalLectures")]
    pub total_lectures: u32,
}

/// Decode the JSON-encoded `subjectandtotallectures` field
pub fn parse_subject_totals(encoded: &str) -> Result<Vec<SubjectTotal>, ApiError> {
    let totals: Vec<SubjectTotal> = serde_json::from_str(encoded)
        .map_err(|e| ApiError::BadRequest(format!("Invalid subjectandtotallectures: {}", e)))?;

    if totals.is_empty() {
        return Err(ApiError::BadRequest(
            "subjectandtotallectures must not be empty".to_string(),
        ));
    }
    Ok(totals)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectScore {
    pub subject: String,
    pub attended_lectures: u32,
    pub total_lectures: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentReport {
    pub prn: String,
    pub name: String,
    pub email: String,
    /// One score per declared subject, in declaration order
    pub scores: Vec<SubjectScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefaulterReport {
    pub subjects: Vec<SubjectTotal>,
    /// Ordered by prn
    pub students: Vec<StudentReport>,
}

impl DefaulterReport {
    /// Combine aggregated rows with declared totals
    ///
    /// Every student appearing in `rows` gets a score for every declared
    /// subject; subjects without a row count as 0 attended.
    pub fn build(rows: &[AggregatedAttendance], subjects: &[SubjectTotal]) -> Self {
        let mut by_prn: BTreeMap<&str, (&AggregatedAttendance, BTreeMap<&str, u32>)> =
            BTreeMap::new();

        for row in rows {
            by_prn
                .entry(row.prn.as_str())
                .or_insert_with(|| (row, BTreeMap::new()))
                .1
                .insert(row.subject.as_str(), row.attended_lectures);
        }

        let students = by_prn
            .into_values()
            .map(|(identity, attended)| StudentReport {
                prn: identity.prn.clone(),
                name: identity.name.clone(),
                email: identity.email.clone(),
                scores: subjects
                    .iter()
                    .map(|s| {
                        let attended_lectures =
                            attended.get(s.subject.as_str()).copied().unwrap_or(0);
                        SubjectScore {
                            subject: s.subject.clone(),
                            attended_lectures,
                            total_lectures: s.total_lectures,
                            percentage: percentage(attended_lectures, s.total_lectures),
                        }
                    })
                    .collect(),
            })
            .collect();

        Self {
            subjects: subjects.to_vec(),
            students,
        }
    }

    pub fn to_workbook(&self) -> Result<Workbook, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Defaulters")?;

        let header = Format::new().set_bold().set_align(FormatAlign::Center);

        for (col, title) in ["Name", "PRN", "Email"].into_iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, title, &header)?;
        }

        for (i, subject) in self.subjects.iter().enumerate() {
            let col = FIRST_SUBJECT_COLUMN + 2 * i as u16;
            worksheet.merge_range(0, col, 0, col + 1, &subject.subject, &header)?;
            worksheet.write_number(1, col, f64::from(subject.total_lectures))?;
            worksheet.write_number(1, col + 1, 100.0)?;
        }

        for (i, student) in self.students.iter().enumerate() {
            let row = FIRST_DATA_ROW + i as u32;
            worksheet.write_string(row, 0, &student.name)?;
            worksheet.write_string(row, 1, &student.prn)?;
            worksheet.write_string(row, 2, &student.email)?;

            for (j, score) in student.scores.iter().enumerate() {
                let col = FIRST_SUBJECT_COLUMN + 2 * j as u16;
                worksheet.write_number(row, col, f64::from(score.attended_lectures))?;
                match Highlight::for_percentage(score.percentage).format() {
                    Some(fill) => {
                        worksheet.write_number_with_format(row, col + 1, score.percentage, &fill)?
                    }
                    None => worksheet.write_number(row, col + 1, score.percentage)?,
                };
            }
        }

        Ok(workbook)
    }

    /// Render the workbook into XLSX bytes
    ///
    /// CPU bound; async callers run it on the blocking pool.
    pub fn to_xlsx(&self) -> Result<Vec<u8>> {
        self.to_workbook()
            .and_then(|mut workbook| workbook.save_to_buffer())
            .context("Failed to render defaulter report")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(prn: &str, subject: &str, attended: u32) -> AggregatedAttendance {
        AggregatedAttendance {
            prn: prn.to_string(),
            name: format!("Student {}", prn),
            email: format!("{}@college.edu", prn.to_lowercase()),
            subject: subject.to_string(),
            attended_lectures: attended,
        }
    }

    fn total(subject: &str, total_lectures: u32) -> SubjectTotal {
        SubjectTotal {
            subject: subject.to_string(),
            total_lectures,
        }
    }

    #[test]
    fn highlight_bands() {
        assert_eq!(Highlight::for_percentage(0.0), Highlight::Danger);
        assert_eq!(Highlight::for_percentage(49.99), Highlight::Danger);
        assert_eq!(Highlight::for_percentage(50.0), Highlight::Caution);
        assert_eq!(Highlight::for_percentage(74.99), Highlight::Caution);
        assert_eq!(Highlight::for_percentage(75.0), Highlight::None);
        assert_eq!(Highlight::for_percentage(100.0), Highlight::None);
    }

    #[test]
    fn percentage_is_not_rounded() {
        assert_eq!(percentage(7, 10), 70.0);
        assert_eq!(percentage(3, 10), 30.0);
        assert_eq!(percentage(1, 3), 1.0 / 3.0 * 100.0);
        assert_eq!(percentage(4, 0), 0.0);
    }

    #[test]
    fn declared_totals_drive_percentages_and_bands() {
        let report = DefaulterReport::build(
            &[row("A1", "OS", 7), row("A2", "OS", 3)],
            &[total("OS", 10)],
        );

        let a1 = &report.students[0].scores[0];
        let a2 = &report.students[1].scores[0];
        assert_eq!(a1.percentage, 70.0);
        assert_eq!(Highlight::for_percentage(a1.percentage), Highlight::Caution);
        assert_eq!(a2.percentage, 30.0);
        assert_eq!(Highlight::for_percentage(a2.percentage), Highlight::Danger);

        let full = DefaulterReport::build(&[row("A1", "OS", 8)], &[total("OS", 10)]);
        assert_eq!(
            Highlight::for_percentage(full.students[0].scores[0].percentage),
            Highlight::None
        );
    }

    #[test]
    fn rows_are_ordered_by_prn_and_zero_filled() {
        let report = DefaulterReport::build(
            &[row("B7", "DBMS", 4), row("A2", "OS", 5), row("A10", "OS", 1)],
            &[total("OS", 10), total("DBMS", 8)],
        );

        let prns: Vec<&str> = report.students.iter().map(|s| s.prn.as_str()).collect();
        assert_eq!(prns, vec!["A10", "A2", "B7"]);

        let b7 = &report.students[2];
        assert_eq!(b7.scores[0].subject, "OS");
        assert_eq!(b7.scores[0].attended_lectures, 0);
        assert_eq!(b7.scores[0].percentage, 0.0);
        assert_eq!(b7.scores[1].attended_lectures, 4);
        assert_eq!(b7.scores[1].percentage, 50.0);
    }

    #[test]
    fn subject_totals_accept_both_spellings() {
        let totals =
            parse_subject_totals(r#"[{"subject":"OS","totallectures":40},{"subject":"CN","totalLectures":12}]"#)
                .unwrap();
        assert_eq!(totals, vec![total("OS", 40), total("CN", 12)]);

        assert!(matches!(parse_subject_totals("[]"), Err(ApiError::BadRequest(_))));
        assert!(matches!(parse_subject_totals("{"), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn renders_an_xlsx_archive() {
        let report = DefaulterReport::build(
            &[row("A1", "OS", 7), row("A1", "DBMS", 2)],
            &[total("OS", 10), total("DBMS", 10)],
        );

        let bytes = report.to_xlsx().unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
