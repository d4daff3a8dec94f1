use crate::domain::model::Course;
use crate::utils::error::{AuditError, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TranscriptRow {
    code: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    term: Option<String>,
    #[serde(default)]
    year: Option<String>,
    #[serde(default)]
    credits: Option<String>,
    #[serde(default)]
    grade: Option<String>,
    #[serde(default)]
    types: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn split_types(cell: &str) -> Vec<String> {
    cell.split([';', '|', ' '])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads a transcript with the header `code,title,term,year,credits,grade,types`.
///
/// Rows whose code has no department separator (`-`) are section headings or
/// totals and are skipped. A blank grade is read as `N/A`; a row without a
/// term is treated as transfer credit.
pub fn read_transcript(data: &[u8]) -> Result<Vec<Course>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(data);

    let mut courses = Vec::new();
    for (index, record) in reader.deserialize::<TranscriptRow>().enumerate() {
        let row = record?;
        // header is line 1
        let line = index + 2;

        if !row.code.contains('-') {
            tracing::debug!("Skipping transcript line {} ('{}')", line, row.code);
            continue;
        }

        let credits = match non_blank(row.credits) {
            Some(text) => text.parse::<f32>().map_err(|_| AuditError::TranscriptError {
                row: line,
                message: format!("credits '{}' is not a number", text),
            })?,
            None => 0.0,
        };

        let term = non_blank(row.term);
        let year = non_blank(row.year);
        let grade = non_blank(row.grade);

        let mut course = if term.is_none() && grade.is_none() {
            Course::transfer(row.code.as_str(), credits)
        } else {
            Course::new(row.code.as_str(), grade.unwrap_or_else(|| "N/A".to_string()))
                .with_credits(credits)
        };
        if let Some(term) = term {
            course = course.with_term(term, year.unwrap_or_default());
        }
        if let Some(title) = non_blank(row.title) {
            course = course.with_title(title);
        }
        if let Some(types) = non_blank(row.types) {
            course = course.with_types(split_types(&types));
        }

        courses.push(course);
    }

    tracing::debug!("Read {} course(s) from transcript", courses.len());
    Ok(courses)
}
