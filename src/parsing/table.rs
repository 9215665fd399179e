use std::io::{Read, Write};
use std::path::Path;

use thiserror::Error;

use crate::core::dataset::{Cell, Dataset, Record};
use crate::utils::validation::{row_limit_reached, MAX_ROWS};

#[derive(Error, Debug)]
pub enum TableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Table is empty: {0}")]
    Empty(String),

    #[error("Too many rows: {0} exceeds maximum allowed ({MAX_ROWS})")]
    TooManyRows(usize),
}

/// Field delimiter implied by a file name: tab for `.tsv`/`.tab`, comma otherwise
#[must_use]
pub fn delimiter_for_path(path: &Path) -> u8 {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    match extension.as_deref() {
        Some("tsv" | "tab") => b'\t',
        _ => b',',
    }
}

/// Read a CSV/TSV file; the first row is kept as the header row
///
/// # Errors
///
/// Returns `TableError::Io` if the file cannot be read, `TableError::Csv` on
/// malformed quoting, `TableError::Empty` if it holds no rows, or
/// `TableError::TooManyRows` if the limit is exceeded.
pub fn read_table(path: &Path) -> Result<Dataset, TableError> {
    let file = std::fs::File::open(path)?;
    let dataset = read_table_from(file, delimiter_for_path(path))?;
    if dataset.is_empty() {
        return Err(TableError::Empty(path.display().to_string()));
    }
    Ok(dataset)
}

/// Parse delimited text into a dataset. Rows may differ in length.
///
/// # Errors
///
/// Returns `TableError::Csv` on malformed input or `TableError::TooManyRows`.
pub fn parse_table_text(text: &str, delimiter: u8) -> Result<Dataset, TableError> {
    read_table_from(text.as_bytes(), delimiter)
}

fn read_table_from<R: Read>(reader: R, delimiter: u8) -> Result<Dataset, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let mut rows: Vec<Record> = Vec::new();
    for result in reader.records() {
        let record = result?;

        // Check row limit for DOS protection
        if row_limit_reached(rows.len()) {
            return Err(TableError::TooManyRows(rows.len() + 1));
        }

        rows.push(record.iter().map(Cell::from_field).collect());
    }

    Ok(Dataset::new(rows))
}

/// Write every row, header included, as delimited text
///
/// # Errors
///
/// Returns `TableError::Csv` if writing fails.
pub fn write_table<W: Write>(dataset: &Dataset, writer: W, delimiter: u8) -> Result<(), TableError> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .delimiter(delimiter)
        .from_writer(writer);

    for row in &dataset.rows {
        writer.write_record(row.iter().map(ToString::to_string))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a dataset to `path`, choosing the delimiter from its extension
///
/// # Errors
///
/// Returns `TableError::Io` if the file cannot be created or `TableError::Csv`
/// if writing fails.
pub fn write_table_file(dataset: &Dataset, path: &Path) -> Result<(), TableError> {
    let file = std::fs::File::create(path)?;
    write_table(dataset, file, delimiter_for_path(path))
}

/// Render a dataset as delimited text
///
/// # Errors
///
/// Returns `TableError::Csv` if serialization fails.
pub fn table_to_string(dataset: &Dataset, delimiter: u8) -> Result<String, TableError> {
    let mut buffer = Vec::new();
    write_table(dataset, &mut buffer, delimiter)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_text() {
        let csv = "id,corp,man,name\n1,Acme,Acme Labs,\"Widget, large\"\n2,Beta,Beta Inc,007\n";
        let ds = parse_table_text(csv, b',').unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records()[0][3].to_string(), "Widget, large");
        assert_eq!(ds.records()[0][0], Cell::Number(1.0));
        assert_eq!(ds.records()[1][3], Cell::Text("007".to_string()));
    }

    #[test]
    fn test_ragged_rows() {
        let tsv = "a\tb\tc\nx\ny\tz\n";
        let ds = parse_table_text(tsv, b'\t').unwrap();
        assert_eq!(ds.rows[1].len(), 1);
        assert_eq!(ds.rows[2].len(), 2);
    }

    #[test]
    fn test_delimiter_for_path() {
        assert_eq!(delimiter_for_path(Path::new("a.TSV")), b'\t');
        assert_eq!(delimiter_for_path(Path::new("a.csv")), b',');
        assert_eq!(delimiter_for_path(Path::new("noext")), b',');
    }

    #[test]
    fn test_write_and_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        let ds = Dataset::from_text_rows([vec!["h1", "h2"], vec!["a b", "3"]]);

        write_table_file(&ds, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "h1\th2\na b\t3\n");
        assert_eq!(read_table(&path).unwrap(), ds);
    }

    #[test]
    fn test_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(read_table(&path), Err(TableError::Empty(_))));
    }
}
