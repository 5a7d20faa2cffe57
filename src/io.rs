//! CSV input: the reader half of the external I/O boundary.

use std::fs::File;
use std::io::BufReader;

use csv::ReaderBuilder;
use log::debug;

use crate::error::InputError;
use crate::models::Table;

/// Load a CSV file into an in-memory [`Table`]. The reader is flexible about
/// ragged rows; cell access handles the short ones.
pub fn read_csv_table(path: &str) -> Result<Table, InputError> {
    let file = File::open(path).map_err(|source| InputError::Io {
        path: path.to_string(),
        source,
    })?;
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(BufReader::new(file));

    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| InputError::Csv {
            path: path.to_string(),
            source,
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| InputError::Csv {
            path: path.to_string(),
            source,
        })?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }
    debug!("{}: {} rows, {} columns", path, rows.len(), headers.len());
    Ok(Table::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_headers_and_rows() {
        let path = "./target/test_read_table.csv";
        let mut f = File::create(path).unwrap();
        writeln!(f, "Name,City").unwrap();
        writeln!(f, "Acme,Springfield").unwrap();
        writeln!(f, "Globex").unwrap();
        drop(f);

        let t = read_csv_table(path).unwrap();
        assert_eq!(t.headers, vec!["Name", "City"]);
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.cell(0, 1), Some("Springfield"));
        assert_eq!(t.cell(1, 1), None); // ragged row
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            read_csv_table("./target/does_not_exist.csv"),
            Err(InputError::Io { .. })
        ));
    }
}
