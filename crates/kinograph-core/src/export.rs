//! Flat tabular export of result rows
//!
//! One CSV row per (item x linked-entity) combination. Absent fields
//! serialize as empty strings. Extras keys vary by run, so the header is
//! the fixed ResultRow columns followed by the sorted union of extras keys
//! observed across all rows.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::knowledge::ResultRow;

/// Fixed leading columns of the export
const BASE_COLUMNS: [&str; 7] = [
    "query_name",
    "entity_id",
    "entity_label",
    "description",
    "target_entity_id",
    "target_name",
    "relation_description",
];

/// Write the row set to a CSV file
pub fn write_csv(path: &Path, rows: &[ResultRow]) -> Result<()> {
    let extras_columns = collect_extras_columns(rows);

    let mut writer = csv::Writer::from_path(path)?;

    let header: Vec<&str> = BASE_COLUMNS
        .iter()
        .copied()
        .chain(extras_columns.iter().map(String::as_str))
        .collect();
    writer.write_record(&header)?;

    for row in rows {
        let mut record: Vec<&str> = vec![
            &row.query_name,
            row.entity_id.as_deref().unwrap_or(""),
            row.entity_label.as_deref().unwrap_or(""),
            row.description.as_deref().unwrap_or(""),
            row.target_entity_id.as_deref().unwrap_or(""),
            row.target_name.as_deref().unwrap_or(""),
            row.relation_description.as_deref().unwrap_or(""),
        ];
        for key in &extras_columns {
            record.push(row.extras.get(key).map(String::as_str).unwrap_or(""));
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    info!(path = %path.display(), rows = rows.len(), "Result rows exported");
    Ok(())
}

/// Sorted union of extras keys across all rows
fn collect_extras_columns(rows: &[ResultRow]) -> Vec<String> {
    rows.iter()
        .flat_map(|row| row.extras.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
