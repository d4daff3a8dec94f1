use crate::catalog::CatalogRow;
use crate::utils::error::Result;

/// Reads catalog rows from CSV with the header
/// `concentration,courses,num_needed,title,number_requirements,type_requirements,grade_requirement`.
/// The last three columns may be blank or missing.
pub fn read_catalog_rows(data: &[u8]) -> Result<Vec<CatalogRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(data);

    let mut rows = Vec::new();
    for record in reader.deserialize::<CatalogRow>() {
        let row = record?;
        if row.concentration.is_empty() && row.courses.is_empty() {
            continue;
        }
        rows.push(row);
    }

    tracing::debug!("Read {} catalog row(s)", rows.len());
    Ok(rows)
}
