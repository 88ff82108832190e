//! Importing a class roll list from an uploaded XLSX file
//!
//! The first two rows are titles. From the third row on, column B holds the
//! registration number, column C the name and column E the email.

use anyhow::{Context, Result};
use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
use std::io::Cursor;
use tracing::warn;

use crate::models::student::NewStudent;

const FIRST_ROW: u32 = 2;
const PRN_COLUMN: u32 = 1;
const NAME_COLUMN: u32 = 2;
const EMAIL_COLUMN: u32 = 4;
/// Cohorts graduate four years after joining
const PROGRAM_YEARS: i32 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollListRow {
    pub prn: String,
    pub name: String,
    pub email: String,
}

fn cell_text(cell: Option<&Data>) -> Option<String> {
    match cell? {
        Data::Empty | Data::Error(_) => None,
        value => {
            let text = value.to_string().trim().to_string();
            (!text.is_empty()).then_some(text)
        }
    }
}

/// Read student rows from the first worksheet, skipping incomplete rows
pub fn parse_roll_list(bytes: &[u8]) -> Result<Vec<RollListRow>> {
    let mut workbook: Xlsx<_> =
        open_workbook_from_rs(Cursor::new(bytes)).context("Roll list is not an XLSX file")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("Roll list has no worksheet")?
        .context("Failed to read roll list worksheet")?;

    let Some((last_row, _)) = range.end() else {
        return Ok(Vec::new());
    };

    let mut rows = Vec::new();
    for row in FIRST_ROW..=last_row {
        let cell = |col: u32| cell_text(range.get_value((row, col)));
        match (cell(PRN_COLUMN), cell(NAME_COLUMN), cell(EMAIL_COLUMN)) {
            (Some(prn), Some(name), Some(email)) => rows.push(RollListRow { prn, name, email }),
            _ => warn!("Skipping incomplete roll list row {}", row + 1),
        }
    }

    Ok(rows)
}

/// Students for a cohort joining in `joinyear`
pub fn new_students(
    rows: Vec<RollListRow>,
    joinyear: i32,
    department: &str,
    password_hash: &str,
) -> Vec<NewStudent> {
    rows.into_iter()
        .map(|row| NewStudent {
            name: row.name,
            email: row.email,
            prn: row.prn,
            date_of_joining: joinyear.to_string(),
            date_of_leaving: (joinyear + PROGRAM_YEARS).to_string(),
            department: department.to_string(),
            password_hash: password_hash.to_string(),
        })
        .collect()
}
