//! CSV export of the annotated source table.

use std::fs::File;
use std::io::BufWriter;

use csv::WriterBuilder;

use crate::annotate::AnnotatedTable;
use crate::error::ExportError;

pub fn export_to_csv(table: &AnnotatedTable, path: &str) -> Result<(), ExportError> {
    let file =
        File::create(path).map_err(|e| ExportError::Csv(format!("create {}: {}", path, e)))?;
    let buf_writer = BufWriter::with_capacity(512 * 1024, file);
    let mut w = WriterBuilder::new().from_writer(buf_writer);

    w.write_record(&table.headers)
        .map_err(|e| ExportError::Csv(e.to_string()))?;
    for row in &table.rows {
        w.write_record(row)
            .map_err(|e| ExportError::Csv(e.to_string()))?;
    }
    w.flush().map_err(|e| ExportError::Csv(e.to_string()))?;
    Ok(())
}
