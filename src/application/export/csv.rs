//! CSV writers for flat tables and raw sheet dumps.

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{FlatTable, SheetRow};

/// Flat table as CSV with a header row; absent values are empty fields.
pub fn table_to_csv(table: &FlatTable) -> ApplicationResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.header()).map_err(csv_error)?;

    for record in &table.records {
        let mut fields: Vec<String> = (0..table.width)
            .map(|level| record.level(level).unwrap_or_default().to_string())
            .collect();
        fields.push(record.value.clone());
        fields.push(record.description.clone().unwrap_or_default());
        fields.push(record.amount.map(|a| a.to_string()).unwrap_or_default());
        fields.push(record.depth().to_string());
        fields.push(record.full_path());
        writer.write_record(&fields).map_err(csv_error)?;
    }

    into_string(writer)
}

/// Every sheet row's cell text, one CSV line per row.
///
/// Rows are padded to the widest row so the output is rectangular.
pub fn rows_to_csv(rows: &[SheetRow]) -> ApplicationResult<String> {
    let width = rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
    let mut writer = csv::Writer::from_writer(Vec::new());

    for row in rows {
        let fields = (0..width).map(|col| row.cell(col).map(|c| c.text.as_str()).unwrap_or(""));
        writer.write_record(fields).map_err(csv_error)?;
    }

    into_string(writer)
}

fn into_string(writer: csv::Writer<Vec<u8>>) -> ApplicationResult<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ApplicationError::export("CSV", e.error()))?;
    String::from_utf8(bytes).map_err(|e| ApplicationError::export("CSV", e))
}

fn csv_error(e: csv::Error) -> ApplicationError {
    ApplicationError::export("CSV", e)
}
